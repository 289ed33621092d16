//! Shared fixtures for integration tests
//!
//! Unity-built files are not redistributable, so objects are synthesized: a
//! type tree shaped like the one Unity emits plus a little-endian payload
//! written field by field.

#![allow(dead_code)]

use std::sync::Arc;
use unity_data_binary::{SchemaCatalog, TypeTreeNode};

pub const ASSEMBLY: &str = "Assembly-CSharp";

/// Sequential little-endian payload writer
#[derive(Debug, Default)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.bytes.push(value);
        self
    }

    pub fn i8(&mut self, value: i8) -> &mut Self {
        self.u8(value as u8)
    }

    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(u8::from(value))
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i64(&mut self, value: i64) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Length-prefixed string followed by its alignment padding
    pub fn string(&mut self, value: &str) -> &mut Self {
        self.u32(value.len() as u32);
        self.bytes.extend_from_slice(value.as_bytes());
        self.align()
    }

    pub fn align(&mut self) -> &mut Self {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

pub fn leaf(type_name: &str, name: &str) -> TypeTreeNode {
    TypeTreeNode::leaf(type_name, name)
}

pub fn object(type_name: &str, name: &str, children: Vec<TypeTreeNode>) -> TypeTreeNode {
    TypeTreeNode::object(type_name, name, children)
}

pub fn vector(name: &str, element: TypeTreeNode) -> TypeTreeNode {
    TypeTreeNode::vector(name, element)
}

/// `string` node the way Unity emits it: an aligned `Array` of `char`
pub fn unity_string(name: &str) -> TypeTreeNode {
    let mut node = TypeTreeNode::string(name);
    node.children = vec![Arc::new(
        TypeTreeNode::array("Array", leaf("char", "data")).aligned(),
    )];
    node.aligned()
}

/// Byte blob node (`TypelessData`)
pub fn typeless(name: &str) -> TypeTreeNode {
    let mut node = TypeTreeNode::array(name, leaf("UInt8", "data"));
    node.type_name = "TypelessData".to_string();
    node.aligned()
}

pub fn pptr(name: &str) -> TypeTreeNode {
    object(
        "PPtr<Object>",
        name,
        vec![leaf("int", "m_FileID"), leaf("SInt64", "m_PathID")],
    )
}

pub fn streaming_info(name: &str) -> TypeTreeNode {
    object(
        "StreamingInfo",
        name,
        vec![
            leaf("UInt64", "offset"),
            leaf("unsigned int", "size"),
            unity_string("path"),
        ],
    )
}

fn vector3(name: &str) -> TypeTreeNode {
    object(
        "Vector3f",
        name,
        vec![leaf("float", "x"), leaf("float", "y"), leaf("float", "z")],
    )
}

fn packed_bit_vector(name: &str) -> TypeTreeNode {
    object(
        "PackedBitVector",
        name,
        vec![
            leaf("unsigned int", "m_NumItems"),
            vector("m_Data", leaf("UInt8", "data")),
            leaf("UInt8", "m_BitSize").aligned(),
        ],
    )
}

pub fn mesh_tree() -> Arc<TypeTreeNode> {
    let sub_mesh = object(
        "SubMesh",
        "data",
        vec![
            leaf("unsigned int", "firstByte"),
            leaf("unsigned int", "indexCount"),
            leaf("int", "topology"),
            leaf("unsigned int", "baseVertex"),
            leaf("unsigned int", "firstVertex"),
            leaf("unsigned int", "vertexCount"),
            object("AABB", "localAABB", vec![vector3("m_Center"), vector3("m_Extent")]),
        ],
    );
    let blend_shape = object(
        "MeshBlendShape",
        "data",
        vec![
            leaf("unsigned int", "firstVertex"),
            leaf("unsigned int", "vertexCount"),
            leaf("bool", "hasNormals"),
            leaf("bool", "hasTangents").aligned(),
        ],
    );
    let channel = object(
        "ChannelInfo",
        "data",
        vec![
            leaf("UInt8", "stream"),
            leaf("UInt8", "offset"),
            leaf("UInt8", "format"),
            leaf("UInt8", "dimension"),
        ],
    );

    Arc::new(object(
        "Mesh",
        "Base",
        vec![
            unity_string("m_Name"),
            vector("m_SubMeshes", sub_mesh),
            object(
                "BlendShapeData",
                "m_Shapes",
                vec![
                    vector("shapes", blend_shape),
                    vector("fullWeights", leaf("float", "data")),
                ],
            ),
            vector("m_BoneNameHashes", leaf("unsigned int", "data")),
            leaf("UInt8", "m_MeshCompression"),
            leaf("bool", "m_IsReadable"),
            leaf("bool", "m_KeepVertices"),
            leaf("bool", "m_KeepIndices").aligned(),
            leaf("int", "m_IndexFormat"),
            vector("m_IndexBuffer", leaf("UInt8", "data")),
            object(
                "VertexData",
                "m_VertexData",
                vec![
                    leaf("unsigned int", "m_VertexCount"),
                    vector("m_Channels", channel),
                    typeless("m_DataSize"),
                ],
            ),
            object(
                "CompressedMesh",
                "m_CompressedMesh",
                vec![packed_bit_vector("m_Vertices"), packed_bit_vector("m_Triangles")],
            ),
            streaming_info("m_StreamData"),
        ],
    ))
}

/// The "Lame" mesh: one sub-mesh of 228 vertices, not readable.
///
/// A non-zero `compression` stores 12 packed vertices and 18 packed indices
/// instead of the raw buffers.
pub fn mesh_payload(compression: u8) -> Vec<u8> {
    let mut p = Payload::new();
    p.string("Lame");

    // m_SubMeshes
    p.u32(1);
    p.u32(0).u32(6).i32(0).u32(0).u32(0).u32(228);
    for value in [0.0, 0.5, 0.0, 1.0, 1.0, 1.0] {
        p.f32(value);
    }

    // m_Shapes
    p.u32(1).u32(0).u32(10).bool(true).bool(false).align();
    p.u32(1).f32(100.0);

    // m_BoneNameHashes
    p.u32(2).u32(11).u32(22);

    p.u8(compression).bool(false).bool(true).bool(true).align();
    p.i32(0);

    // m_IndexBuffer
    if compression == 0 {
        p.u32(12).raw(&[0, 0, 1, 0, 2, 0, 2, 0, 1, 0, 3, 0]).align();
    } else {
        p.u32(0);
    }

    // m_VertexData
    p.u32(if compression == 0 { 228 } else { 0 });
    p.u32(3);
    p.raw(&[0, 0, 0, 3]);
    p.raw(&[0, 12, 0, 0]);
    p.raw(&[0, 12, 1, 0x14]);
    p.u32(4).raw(&[1, 2, 3, 4]).align();

    // m_CompressedMesh
    let (vertices, triangles) = if compression == 0 { (0, 0) } else { (36, 18) };
    p.u32(vertices).u32(0).u8(0).align();
    p.u32(triangles).u32(0).u8(0).align();

    // m_StreamData
    p.u64(0).u32(0).string("");
    p.finish()
}

fn managed_type() -> TypeTreeNode {
    object(
        "ReferencedManagedType",
        "type",
        vec![unity_string("class"), unity_string("ns"), unity_string("asm")],
    )
}

pub fn apple_tree() -> Arc<TypeTreeNode> {
    Arc::new(object(
        "Apple",
        "Base",
        vec![leaf("int", "m_Data"), unity_string("m_Description")],
    ))
}

pub fn banana_tree() -> Arc<TypeTreeNode> {
    Arc::new(object(
        "Banana",
        "Base",
        vec![leaf("int", "m_Data"), leaf("bool", "m_IsRound").aligned()],
    ))
}

/// Resolver knowing the fruit types stored in the registry fixtures
pub fn fruit_catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    catalog
        .add_ref_type("Apple", "Fruits", ASSEMBLY, apple_tree())
        .add_ref_type("Banana", "Fruits", ASSEMBLY, banana_tree());
    catalog
}

fn write_type(p: &mut Payload, class: &str, namespace: &str, assembly: &str) {
    p.string(class).string(namespace).string(assembly);
}

/// Registry owner in the version 2 layout: `m_Item` -> rid 1000 (Apple),
/// `m_Item2` -> rid 1001 (Banana), with a null entry between them
pub fn registry_v2() -> (Arc<TypeTreeNode>, Vec<u8>) {
    let entry = object(
        "ReferencedObject",
        "data",
        vec![
            leaf("SInt64", "rid"),
            managed_type(),
            TypeTreeNode::referenced_object_data("data"),
        ],
    );
    let reference = |name: &str| object("managedReference", name, vec![leaf("SInt64", "rid")]);
    let root = Arc::new(object(
        "MonoBehaviour",
        "Base",
        vec![
            unity_string("m_Name"),
            reference("m_Item"),
            reference("m_Item2"),
            object(
                "ManagedReferencesRegistry",
                "references",
                vec![leaf("int", "version"), vector("RefIds", entry)],
            ),
        ],
    ));

    let mut p = Payload::new();
    p.string("Bowl").i64(1000).i64(1001);
    p.i32(2).u32(3);

    p.i64(1000);
    write_type(&mut p, "Apple", "Fruits", ASSEMBLY);
    p.i32(1).string("Ripe");

    p.i64(1002);
    write_type(&mut p, "", "", "");

    p.i64(1001);
    write_type(&mut p, "Banana", "Fruits", ASSEMBLY);
    p.i32(1).bool(true).align();

    (root, p.finish())
}

/// Registry owner in the version 1 layout: `m_Item` -> id 0 (Apple),
/// `m_Item2` -> id 1 (Banana).
///
/// The schema declares one `ReferencedObject` template; the data repeats it
/// per entry and ends with the terminator entry.
pub fn registry_v1() -> (Arc<TypeTreeNode>, Vec<u8>) {
    let entry = object(
        "ReferencedObject",
        "00000000",
        vec![managed_type(), TypeTreeNode::referenced_object_data("data")],
    );
    let reference = |name: &str| object("managedReference", name, vec![leaf("int", "id")]);
    let root = Arc::new(object(
        "MonoBehaviour",
        "Base",
        vec![
            reference("m_Item"),
            reference("m_Item2"),
            object(
                "ManagedReferencesRegistry",
                "references",
                vec![leaf("int", "version"), entry],
            ),
        ],
    ));

    let mut p = Payload::new();
    p.i32(0).i32(1);
    p.i32(1);
    write_type(&mut p, "Apple", "Fruits", ASSEMBLY);
    p.i32(1).string("Ripe");
    write_type(&mut p, "Banana", "Fruits", ASSEMBLY);
    p.i32(1).bool(true).align();
    write_type(&mut p, "Terminus", "UnityEngine.DMAT", "FAKE_ASM");

    (root, p.finish())
}

/// Version 1 registry followed by a sibling field, to check that the whole
/// entry sequence is skipped
pub fn registry_v1_with_tail() -> (Arc<TypeTreeNode>, Vec<u8>) {
    let (root, mut data) = registry_v1();
    let mut children = root.children.clone();
    children.push(Arc::new(leaf("int", "m_Tail")));
    let root = Arc::new(TypeTreeNode {
        children,
        ..(*root).clone()
    });
    data.extend_from_slice(&77i32.to_le_bytes());
    (root, data)
}

/// One compiled sub-program: blob, keyword indices, tier, GPU program type
pub type SubProgramFixture = (u32, &'static [u16], i8, i8);

pub const VERTEX_PROGRAMS: &[SubProgramFixture] = &[(0, &[0], 0, 15), (1, &[], 0, 5)];

pub const FRAGMENT_PROGRAMS: &[SubProgramFixture] =
    &[(2, &[1], 1, 17), (3, &[0, 1], 0, 5), (4, &[], 0, 15)];

pub fn shader_tree() -> Arc<TypeTreeNode> {
    let sub_program = object(
        "SerializedSubProgram",
        "data",
        vec![
            leaf("unsigned int", "m_BlobIndex"),
            vector("m_KeywordIndices", leaf("UInt16", "data")),
            leaf("SInt8", "m_ShaderHardwareTier"),
            leaf("SInt8", "m_GpuProgramType").aligned(),
        ],
    );
    let program = |name: &str| {
        object(
            "SerializedProgram",
            name,
            vec![vector("m_SubPrograms", sub_program.clone())],
        )
    };
    let pass = object(
        "SerializedPass",
        "data",
        vec![
            TypeTreeNode::map("m_NameIndices", unity_string("first"), leaf("int", "second")),
            program("progVertex"),
            program("progFragment"),
            object("SerializedShaderState", "m_State", vec![unity_string("m_Name")]),
        ],
    );
    let sub_shader = object("SerializedSubShader", "data", vec![vector("m_Passes", pass)]);

    Arc::new(object(
        "Shader",
        "Base",
        vec![
            object(
                "SerializedShader",
                "m_ParsedForm",
                vec![vector("m_SubShaders", sub_shader), unity_string("m_Name")],
            ),
            vector(
                "decompressedLengths",
                vector("data", leaf("unsigned int", "data")),
            ),
        ],
    ))
}

fn write_sub_programs(p: &mut Payload, programs: &[SubProgramFixture]) {
    p.u32(programs.len() as u32);
    for (blob, keywords, tier, api) in programs {
        p.u32(*blob).u32(keywords.len() as u32);
        for keyword in keywords.iter() {
            p.u16(*keyword);
        }
        p.align().i8(*tier).i8(*api).align();
    }
}

pub fn shader_payload() -> Vec<u8> {
    let mut p = Payload::new();
    p.u32(1).u32(1);
    p.u32(2).string("FOG").i32(0).string("SHADOWS").i32(1);
    write_sub_programs(&mut p, VERTEX_PROGRAMS);
    write_sub_programs(&mut p, FRAGMENT_PROGRAMS);
    p.string("FORWARD");
    p.string("Custom/Fruit");
    p.u32(2).u32(1).u32(100).u32(2).u32(20).u32(30);
    p.finish()
}

pub fn texture_tree(with_mip_count: bool) -> Arc<TypeTreeNode> {
    let mip = if with_mip_count {
        leaf("int", "m_MipCount")
    } else {
        leaf("bool", "m_MipMap").aligned()
    };
    Arc::new(object(
        "Texture2D",
        "Base",
        vec![
            unity_string("m_Name"),
            leaf("int", "m_ForcedFallbackFormat"),
            leaf("bool", "m_DownscaleFallback").aligned(),
            leaf("int", "m_Width"),
            leaf("int", "m_Height"),
            leaf("int", "m_CompleteImageSize"),
            leaf("int", "m_TextureFormat"),
            mip,
            leaf("bool", "m_IsReadable").aligned(),
            leaf("int", "m_ImageCount"),
            typeless("image data"),
            streaming_info("m_StreamData"),
        ],
    ))
}

/// 256x128 texture; `streamed` moves its pixels to a resource file
pub fn texture_payload(with_mip_count: bool, streamed: bool) -> Vec<u8> {
    let mut p = Payload::new();
    p.string("Leaf").i32(4).bool(false).align();
    p.i32(256).i32(128).i32(16).i32(25);
    if with_mip_count {
        p.i32(9);
    } else {
        p.bool(true).align();
    }
    p.bool(true).align().i32(1);
    if streamed {
        p.u32(0);
        p.u64(0).u32(4096).string("archive:/CAB-1/CAB-1.resS");
    } else {
        p.u32(16).raw(&[0xAB; 16]);
        p.u64(0).u32(0).string("");
    }
    p.finish()
}

pub fn audio_tree() -> Arc<TypeTreeNode> {
    Arc::new(object(
        "AudioClip",
        "Base",
        vec![
            unity_string("m_Name"),
            leaf("int", "m_LoadType"),
            leaf("int", "m_Channels"),
            leaf("int", "m_Frequency"),
            leaf("int", "m_BitsPerSample"),
            leaf("float", "m_Length"),
            leaf("bool", "m_IsTrackerFormat").aligned(),
            leaf("int", "m_SubsoundIndex"),
            leaf("bool", "m_PreloadAudioData"),
            leaf("bool", "m_LoadInBackground"),
            leaf("bool", "m_Legacy3D").aligned(),
            object(
                "StreamedResource",
                "m_Resource",
                vec![
                    unity_string("m_Source"),
                    leaf("UInt64", "m_Offset"),
                    leaf("UInt64", "m_Size"),
                ],
            ),
            leaf("int", "m_CompressionFormat"),
        ],
    ))
}

pub fn audio_payload() -> Vec<u8> {
    let mut p = Payload::new();
    p.string("Chime").i32(1).i32(2).i32(44100).i32(16).f32(1.5);
    p.bool(false).align().i32(0).bool(true).bool(false).bool(false).align();
    p.string("archive:/CAB-2/CAB-2.resource").u64(64).u64(35_000);
    p.i32(1);
    p.finish()
}

pub fn animation_tree() -> Arc<TypeTreeNode> {
    let event = object(
        "AnimationEvent",
        "data",
        vec![leaf("float", "time"), unity_string("functionName")],
    );
    Arc::new(object(
        "AnimationClip",
        "Base",
        vec![
            unity_string("m_Name"),
            leaf("bool", "m_Legacy"),
            leaf("bool", "m_Compressed").aligned(),
            vector("m_Events", event),
        ],
    ))
}

pub fn animation_payload() -> Vec<u8> {
    let mut p = Payload::new();
    p.string("Walk").bool(true).bool(false).align();
    p.u32(2).f32(0.25).string("OnStep").f32(0.75).string("OnStep");
    p.finish()
}

pub fn asset_bundle_tree() -> Arc<TypeTreeNode> {
    let asset_info = object(
        "AssetInfo",
        "second",
        vec![
            leaf("int", "preloadIndex"),
            leaf("int", "preloadSize"),
            pptr("asset"),
        ],
    );
    Arc::new(object(
        "AssetBundle",
        "Base",
        vec![
            unity_string("m_Name"),
            vector("m_PreloadTable", pptr("data")),
            TypeTreeNode::map("m_Container", unity_string("first"), asset_info),
        ],
    ))
}

pub fn asset_bundle_payload() -> Vec<u8> {
    let mut p = Payload::new();
    p.string("fruits");
    p.u32(1).i32(0).i64(-1234);
    p.u32(2);
    p.string("assets/apple.prefab").i32(0).i32(1).i32(0).i64(-1234);
    p.string("assets/bowl.mat").i32(1).i32(0).i32(1).i64(5678);
    p.finish()
}
