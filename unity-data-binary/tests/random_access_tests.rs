//! Random access reader tests over synthesized objects

mod common;

use common::*;
use std::io::Write;
use std::sync::Arc;
use unity_data_binary::{
    BinaryError, ByteOrder, ByteSource, FileSource, LeafValue, MemorySource, Mesh, ObjectInfo,
    RandomAccessReader, ReaderConfig, ReaderContext, SchemaCatalog, TypeTreeNode, VertexFormat,
    open_object,
};
use unity_data_core::{UnityValue, class_ids};

fn game_object() -> (Arc<TypeTreeNode>, Vec<u8>) {
    let root = Arc::new(object(
        "GameObject",
        "Base",
        vec![
            unity_string("m_Name"),
            leaf("bool", "m_IsActive").aligned(),
            leaf("unsigned int", "m_Layer"),
            leaf("UInt16", "m_Tag").aligned(),
            vector("m_Scores", leaf("float", "data")),
            leaf("SInt64", "m_Id"),
        ],
    ));
    let mut p = Payload::new();
    p.string("TestObject").bool(true).align().u32(5).u16(7);
    p.align().u32(3).f32(1.0).f32(2.5).f32(-4.0);
    p.i64(-99);
    (root, p.finish())
}

#[test]
fn test_sibling_offsets_follow_encoded_sizes() -> anyhow::Result<()> {
    let (root, data) = game_object();
    let ctx = ReaderContext::new(&data);
    let reader = ctx.reader(root, 0);

    let count = reader.node().child_count();
    for index in 1..count {
        let previous = reader.child_at(index - 1)?;
        let current = reader.child_at(index)?;
        assert_eq!(
            current.offset(),
            previous.end_offset()?,
            "'{}' should start where '{}' ends",
            current.name(),
            previous.name()
        );
    }
    assert_eq!(reader.end_offset()?, data.len() as u64);
    Ok(())
}

#[test]
fn test_decode_game_object_fields() -> anyhow::Result<()> {
    let (root, data) = game_object();
    let ctx = ReaderContext::new(&data);
    let reader = ctx.reader(root, 0);

    assert_eq!(reader.field("m_Name")?.value::<String>()?, "TestObject");
    assert!(reader.field("m_IsActive")?.value::<bool>()?);
    assert_eq!(reader.field("m_Layer")?.value::<u32>()?, 5);
    assert_eq!(reader.field("m_Tag")?.value::<u16>()?, 7);
    assert_eq!(reader.field("m_Id")?.value::<i64>()?, -99);

    let scores = reader.field("m_Scores")?;
    assert_eq!(scores.count()?, 3);
    assert_eq!(scores.at(1)?.value::<f32>()?, 2.5);
    assert_eq!(reader.get("m_Scores/2")?.as_f64()?, -4.0);
    Ok(())
}

#[test]
fn test_index_past_count_is_out_of_range() -> anyhow::Result<()> {
    let (root, data) = game_object();
    let ctx = ReaderContext::new(&data);
    let scores = ctx.reader(root, 0).field("m_Scores")?;

    let count = scores.count()?;
    for index in 0..count {
        assert!(scores.at(index).is_ok());
    }
    for index in [count, count + 1, usize::MAX] {
        match scores.at(index) {
            Err(BinaryError::IndexOutOfRange { index: i, count: c }) => {
                assert_eq!(i, index);
                assert_eq!(c, count);
            }
            other => panic!("expected IndexOutOfRange, got {:?}", other),
        }
    }
    assert_eq!(scores.elements()?.len(), count);
    Ok(())
}

#[test]
fn test_access_errors() -> anyhow::Result<()> {
    let (root, data) = game_object();
    let ctx = ReaderContext::new(&data);
    let reader = ctx.reader(root, 0);

    assert!(matches!(
        reader.field("m_Missing"),
        Err(BinaryError::FieldNotFound { .. })
    ));
    assert!(matches!(reader.try_field("m_Missing"), Ok(None)));
    assert!(!reader.has_field("m_Missing"));
    assert!(reader.has_field("m_Layer"));

    // float leaves only read as floats
    assert!(matches!(
        reader.get("m_Scores/0")?.value::<u32>(),
        Err(BinaryError::TypeMismatch { .. })
    ));
    assert!(matches!(
        reader.field("m_Layer")?.value::<String>(),
        Err(BinaryError::TypeMismatch { .. })
    ));
    assert!(matches!(
        reader.field("m_Scores")?.value::<i32>(),
        Err(BinaryError::NotALeaf { .. })
    ));
    assert!(matches!(
        reader.field("m_Layer")?.count(),
        Err(BinaryError::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_integer_width_compatibility() -> anyhow::Result<()> {
    let (root, data) = game_object();
    let ctx = ReaderContext::new(&data);
    let reader = ctx.reader(root, 0);

    // same width, different signedness
    assert_eq!(reader.field("m_Layer")?.value::<i32>()?, 5);
    assert_eq!(reader.field("m_IsActive")?.value::<u8>()?, 1);
    assert!(matches!(
        reader.field("m_Layer")?.value::<u64>(),
        Err(BinaryError::TypeMismatch { .. })
    ));
    assert!(matches!(
        reader.field("m_Layer")?.value::<bool>(),
        Err(BinaryError::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_truncated_object() -> anyhow::Result<()> {
    let (root, data) = game_object();
    let truncated = data[..data.len() - 4].to_vec();
    let ctx = ReaderContext::new(&truncated);
    let reader = ctx.reader(root, 0);

    // fields before the cut still decode
    assert_eq!(reader.field("m_Layer")?.value::<u32>()?, 5);
    assert!(matches!(
        reader.field("m_Id")?.value::<i64>(),
        Err(BinaryError::TruncatedData { .. })
    ));
    Ok(())
}

#[test]
fn test_string_length_past_source() {
    let root = Arc::new(object("TextAsset", "Base", vec![unity_string("m_Name")]));
    let mut p = Payload::new();
    p.u32(200).raw(b"short");
    let data = p.finish();

    let ctx = ReaderContext::new(&data);
    let result = ctx.reader(root, 0).field("m_Name").and_then(|f| f.value::<String>());
    assert!(matches!(result, Err(BinaryError::TruncatedData { .. })));
}

#[test]
fn test_array_limit_from_config() -> anyhow::Result<()> {
    let (root, data) = game_object();
    let config = ReaderConfig::default().with_max_array_len(2);
    let ctx = ReaderContext::new(&data).with_config(config);
    let reader = ctx.reader(root, 0);

    assert!(matches!(
        reader.field("m_Scores")?.count(),
        Err(BinaryError::ResourceLimitExceeded(_))
    ));
    Ok(())
}

#[test]
fn test_big_endian_source() -> anyhow::Result<()> {
    let root = Arc::new(object(
        "Holder",
        "Base",
        vec![
            leaf("int", "m_Count"),
            leaf("UInt16", "m_Flags"),
            vector("m_Values", leaf("unsigned int", "data")),
        ],
    ));
    let mut data = Vec::new();
    data.extend_from_slice(&(-2i32).to_be_bytes());
    data.extend_from_slice(&0x0102u16.to_be_bytes());
    data.extend_from_slice(&2u32.to_be_bytes());
    data.extend_from_slice(&0xAABBCCDDu32.to_be_bytes());
    data.extend_from_slice(&7u32.to_be_bytes());

    let ctx = ReaderContext::new(&data).with_config(ReaderConfig::big_endian());
    let reader = ctx.reader(root, 0);
    assert_eq!(reader.field("m_Count")?.value::<i32>()?, -2);
    assert_eq!(reader.field("m_Flags")?.value::<u16>()?, 0x0102);

    // the UInt16 field is not aligned, so the vector starts right after it
    let values = reader.field("m_Values")?;
    assert_eq!(values.offset(), 6);
    assert_eq!(values.count()?, 2);
    assert_eq!(values.at(0)?.value::<u32>()?, 0xAABBCCDD);
    assert_eq!(values.at(1)?.value::<u32>()?, 7);
    Ok(())
}

#[test]
fn test_to_value_materializes_subtree() -> anyhow::Result<()> {
    let (root, data) = game_object();
    let ctx = ReaderContext::new(&data);
    let value = ctx.reader(root, 0).to_value()?;

    assert_eq!(
        value.get_path("m_Name").and_then(UnityValue::as_str),
        Some("TestObject")
    );
    assert_eq!(value.get_path("m_IsActive").and_then(UnityValue::as_bool), Some(true));
    assert_eq!(value.get_path("m_Id").and_then(UnityValue::as_i64), Some(-99));
    let scores = value
        .get_path("m_Scores")
        .and_then(UnityValue::as_array)
        .expect("scores");
    assert_eq!(scores.len(), 3);
    assert_eq!(scores[2].as_f64(), Some(-4.0));
    Ok(())
}

#[test]
fn test_lame_mesh_layout() -> anyhow::Result<()> {
    let data = mesh_payload(0);
    let ctx = ReaderContext::new(&data);
    let reader = ctx.reader(mesh_tree(), 0);

    assert_eq!(reader.field("m_Name")?.value::<String>()?, "Lame");
    assert_eq!(reader.get("m_SubMeshes/0/vertexCount")?.value::<u32>()?, 228);
    assert_eq!(reader.get("m_SubMeshes/0/localAABB/m_Center/y")?.value::<f32>()?, 0.5);
    assert_eq!(reader.get("m_Shapes/fullWeights/0")?.value::<f32>()?, 100.0);
    assert_eq!(reader.get("m_BoneNameHashes/1")?.value::<u32>()?, 22);
    assert_eq!(
        reader.field("m_IndexBuffer")?.bytes()?,
        vec![0, 0, 1, 0, 2, 0, 2, 0, 1, 0, 3, 0]
    );
    assert_eq!(reader.get("m_VertexData/m_DataSize")?.bytes()?, vec![1, 2, 3, 4]);
    assert_eq!(reader.end_offset()?, data.len() as u64);
    Ok(())
}

#[test]
fn test_reader_at_nonzero_offset() -> anyhow::Result<()> {
    let payload = mesh_payload(0);
    let mut data = vec![0xEE; 12];
    data.extend_from_slice(&payload);

    let source = MemorySource::new(data);
    let ctx = ReaderContext::new(&source);
    let mesh = Mesh::read(&ctx.reader(mesh_tree(), 12))?;
    assert_eq!(mesh.name, "Lame");
    assert_eq!(mesh.vertices, 228);
    assert_eq!(mesh.indices, 6);
    Ok(())
}

#[test]
fn test_open_object_from_file() -> anyhow::Result<()> {
    let payload = mesh_payload(0);
    let header = vec![0u8; 32];

    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(&header)?;
    file.write_all(&payload)?;
    file.flush()?;

    let source = FileSource::open(file.path())?;
    assert_eq!(source.len(), (header.len() + payload.len()) as u64);

    let mut catalog = SchemaCatalog::new();
    catalog
        .add_type(class_ids::MESH, mesh_tree())
        .add_object(ObjectInfo::new(
            7,
            header.len() as u64,
            payload.len() as u64,
            class_ids::MESH,
        ));

    let reader = open_object(&catalog, &source, ReaderConfig::default(), 7)?;
    let mesh = Mesh::read(&reader)?;
    assert_eq!(mesh.name, "Lame");
    assert_eq!(mesh.channels.len(), 2);
    assert_eq!(mesh.channels[1].format, VertexFormat::Float16);

    assert!(matches!(
        open_object(&catalog, &source, ReaderConfig::default(), 8),
        Err(BinaryError::ObjectNotFound(8))
    ));
    Ok(())
}

#[test]
fn test_open_object_outside_source() {
    let data = mesh_payload(0);
    let mut catalog = SchemaCatalog::new();
    catalog
        .add_type(class_ids::MESH, mesh_tree())
        .add_object(ObjectInfo::new(1, 16, data.len() as u64, class_ids::MESH));

    let result = open_object(&catalog, &data, ReaderConfig::default(), 1);
    assert!(matches!(result, Err(BinaryError::TruncatedData { .. })));
}

#[test]
fn test_hex_fixture_with_tracing() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();

    let root = Arc::new(object(
        "AnimationClip",
        "Base",
        vec![
            unity_string("m_Name"),
            leaf("bool", "m_Legacy").aligned(),
            vector("m_Events", leaf("float", "data")),
        ],
    ));
    let data = hex::decode("0300000052756e000100000000000000")?;

    let ctx = ReaderContext::new(&data);
    let reader = ctx.reader(root, 0);
    assert_eq!(reader.field("m_Name")?.value::<String>()?, "Run");
    assert_eq!(reader.field("m_Legacy")?.offset(), 8);
    assert_eq!(reader.field("m_Events")?.count()?, 0);
    assert_eq!(reader.byte_len()?, 16);
    Ok(())
}

#[test]
fn test_fixed_stride_array_past_source() -> anyhow::Result<()> {
    let root = Arc::new(vector("m_Values", leaf("int", "data")));
    let mut p = Payload::new();
    p.u32(1000).i32(1).i32(2).i32(3).i32(4);
    let data = p.finish();

    let ctx = ReaderContext::new(&data);
    let values = ctx.reader(root, 0);
    assert_eq!(values.count()?, 1000);
    assert_eq!(values.at(3)?.value::<i32>()?, 4);
    for index in [4, 999] {
        assert!(matches!(
            values.at(index),
            Err(BinaryError::TruncatedData { .. })
        ));
    }
    assert!(matches!(
        values.byte_len(),
        Err(BinaryError::TruncatedData { .. })
    ));
    Ok(())
}

#[test]
fn test_negative_string_length() {
    let root = Arc::new(object("TextAsset", "Base", vec![unity_string("m_Name")]));
    let data = (-8i32).to_le_bytes().to_vec();

    let ctx = ReaderContext::new(&data);
    let name = ctx.reader(root, 0).field("m_Name");
    assert!(matches!(
        name.as_ref().map(|n| n.value::<String>()),
        Ok(Err(BinaryError::InvalidData(_)))
    ));
    assert!(matches!(
        name.and_then(|n| n.byte_len()),
        Err(BinaryError::InvalidData(_))
    ));
}

#[test]
fn test_unknown_leaf_type_is_not_materialized() {
    let root = Arc::new(object(
        "Holder",
        "Base",
        vec![TypeTreeNode::new("GUID128", "m_Guid", 16)],
    ));
    let data = vec![0u8; 16];

    let ctx = ReaderContext::new(&data);
    assert!(matches!(
        ctx.reader(root, 0).to_value(),
        Err(BinaryError::TypeMismatch { .. })
    ));
}

/// Decode the named leaf and check it encodes back to its source bytes
fn assert_round_trip<T>(
    reader: &RandomAccessReader<'_>,
    name: &str,
    order: ByteOrder,
    data: &[u8],
    expected: T,
) -> anyhow::Result<()>
where
    T: LeafValue + PartialEq + std::fmt::Debug,
{
    let field = reader.field(name)?;
    let value = field.value::<T>()?;
    assert_eq!(value, expected, "{}", name);

    let encoded = value.encode(order);
    let start = field.offset() as usize;
    assert_eq!(encoded, &data[start..start + encoded.len()], "{}", name);
    Ok(())
}

#[test]
fn test_leaf_values_encode_to_source_bytes() -> anyhow::Result<()> {
    let root = Arc::new(object(
        "Primitives",
        "Base",
        vec![
            leaf("SInt8", "m_I8"),
            leaf("UInt8", "m_U8"),
            leaf("bool", "m_Bool"),
            leaf("SInt16", "m_I16"),
            leaf("UInt16", "m_U16"),
            leaf("int", "m_I32"),
            leaf("unsigned int", "m_U32"),
            leaf("SInt64", "m_I64"),
            leaf("UInt64", "m_U64"),
            leaf("float", "m_F32"),
            leaf("double", "m_F64"),
            unity_string("m_Text"),
        ],
    ));

    for order in [ByteOrder::Little, ByteOrder::Big] {
        let mut data = Vec::new();
        data.extend((-5i8).encode(order));
        data.extend(200u8.encode(order));
        data.extend(true.encode(order));
        data.extend((-300i16).encode(order));
        data.extend(0xBEEFu16.encode(order));
        data.extend((-70_000i32).encode(order));
        data.extend(0xDEAD_BEEFu32.encode(order));
        data.extend(i64::MIN.encode(order));
        data.extend(u64::MAX.encode(order));
        data.extend(1.25f32.encode(order));
        data.extend((-2.5e10f64).encode(order));
        data.extend("Ripe".to_string().encode(order));

        let config = match order {
            ByteOrder::Little => ReaderConfig::default(),
            ByteOrder::Big => ReaderConfig::big_endian(),
        };
        let ctx = ReaderContext::new(&data).with_config(config);
        let reader = ctx.reader(Arc::clone(&root), 0);

        assert_round_trip(&reader, "m_I8", order, &data, -5i8)?;
        assert_round_trip(&reader, "m_U8", order, &data, 200u8)?;
        assert_round_trip(&reader, "m_Bool", order, &data, true)?;
        assert_round_trip(&reader, "m_I16", order, &data, -300i16)?;
        assert_round_trip(&reader, "m_U16", order, &data, 0xBEEFu16)?;
        assert_round_trip(&reader, "m_I32", order, &data, -70_000i32)?;
        assert_round_trip(&reader, "m_U32", order, &data, 0xDEAD_BEEFu32)?;
        assert_round_trip(&reader, "m_I64", order, &data, i64::MIN)?;
        assert_round_trip(&reader, "m_U64", order, &data, u64::MAX)?;
        assert_round_trip(&reader, "m_F32", order, &data, 1.25f32)?;
        assert_round_trip(&reader, "m_F64", order, &data, -2.5e10f64)?;
        assert_round_trip(&reader, "m_Text", order, &data, "Ripe".to_string())?;
    }
    Ok(())
}
