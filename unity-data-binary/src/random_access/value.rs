//! Typed leaf decoding

use crate::error::Result;
use crate::reader::{BinaryReader, ByteOrder};
use crate::typetree::PrimitiveKind;

/// A Rust type that a primitive leaf can be decoded into
pub trait LeafValue: Sized {
    /// Name reported in `TypeMismatch` errors
    const TYPE_NAME: &'static str;

    /// Whether a leaf of `kind` may be read as this type
    fn accepts(kind: PrimitiveKind) -> bool;

    /// Decode from the leaf's encoded bytes
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self>;

    /// Encode back into the on-disk representation.
    ///
    /// Strings are encoded without their trailing alignment padding.
    fn encode(&self, byte_order: ByteOrder) -> Vec<u8>;
}

macro_rules! numeric_leaf {
    ($ty:ty, $read:ident, $accepts:expr) => {
        impl LeafValue for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn accepts(kind: PrimitiveKind) -> bool {
                let accepts: fn(PrimitiveKind) -> bool = $accepts;
                accepts(kind)
            }

            fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
                reader.$read()
            }

            fn encode(&self, byte_order: ByteOrder) -> Vec<u8> {
                match byte_order {
                    ByteOrder::Big => self.to_be_bytes().to_vec(),
                    ByteOrder::Little => self.to_le_bytes().to_vec(),
                }
            }
        }
    };
}

fn integral_of_width(kind: PrimitiveKind, width: usize) -> bool {
    kind.is_integral() && kind.width() == Some(width)
}

numeric_leaf!(u8, read_u8, |kind| integral_of_width(kind, 1));
numeric_leaf!(i8, read_i8, |kind| integral_of_width(kind, 1));
numeric_leaf!(u16, read_u16, |kind| integral_of_width(kind, 2));
numeric_leaf!(i16, read_i16, |kind| integral_of_width(kind, 2));
numeric_leaf!(u32, read_u32, |kind| integral_of_width(kind, 4));
numeric_leaf!(i32, read_i32, |kind| integral_of_width(kind, 4));
numeric_leaf!(u64, read_u64, |kind| integral_of_width(kind, 8));
numeric_leaf!(i64, read_i64, |kind| integral_of_width(kind, 8));
numeric_leaf!(f32, read_f32, |kind| kind == PrimitiveKind::F32);
numeric_leaf!(f64, read_f64, |kind| kind == PrimitiveKind::F64);

impl LeafValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn accepts(kind: PrimitiveKind) -> bool {
        integral_of_width(kind, 1)
    }

    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_bool()
    }

    fn encode(&self, _byte_order: ByteOrder) -> Vec<u8> {
        vec![u8::from(*self)]
    }
}

impl LeafValue for String {
    const TYPE_NAME: &'static str = "string";

    fn accepts(kind: PrimitiveKind) -> bool {
        kind == PrimitiveKind::String
    }

    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let len = reader.read_u32()? as usize;
        let bytes = reader.read_bytes(len)?;
        Ok(String::from_utf8(bytes)?)
    }

    fn encode(&self, byte_order: ByteOrder) -> Vec<u8> {
        let mut out = (self.len() as u32).encode(byte_order);
        out.extend_from_slice(self.as_bytes());
        out
    }
}
