//! Texture format definitions
//!
//! Values match Unity's TextureFormat enum.

use crate::macros::code_enum;

code_enum! {
    /// Unity texture formats
    #[allow(non_camel_case_types)]
    pub enum TextureFormat {
        Alpha8 = 1,
        ARGB4444 = 2,
        RGB24 = 3,
        RGBA32 = 4,
        ARGB32 = 5,
        RGB565 = 7,
        R16 = 9,
        DXT1 = 10,
        DXT5 = 12,
        RGBA4444 = 13,
        BGRA32 = 14,
        RHalf = 15,
        RGHalf = 16,
        RGBAHalf = 17,
        RFloat = 18,
        RGFloat = 19,
        RGBAFloat = 20,
        YUY2 = 21,
        RGB9e5Float = 22,
        BC6H = 24,
        BC7 = 25,
        BC4 = 26,
        BC5 = 27,
        DXT1Crunched = 28,
        DXT5Crunched = 29,
        PVRTC_RGB2 = 30,
        PVRTC_RGBA2 = 31,
        PVRTC_RGB4 = 32,
        PVRTC_RGBA4 = 33,
        ETC_RGB4 = 34,
        EAC_R = 41,
        EAC_R_SIGNED = 42,
        EAC_RG = 43,
        EAC_RG_SIGNED = 44,
        ETC2_RGB = 45,
        ETC2_RGBA1 = 46,
        ETC2_RGBA8 = 47,
        ASTC_RGB_4x4 = 48,
        ASTC_RGB_5x5 = 49,
        ASTC_RGB_6x6 = 50,
        ASTC_RGB_8x8 = 51,
        ASTC_RGB_10x10 = 52,
        ASTC_RGB_12x12 = 53,
        ASTC_RGBA_4x4 = 54,
        ASTC_RGBA_5x5 = 55,
        ASTC_RGBA_6x6 = 56,
        ASTC_RGBA_8x8 = 57,
        ASTC_RGBA_10x10 = 58,
        ASTC_RGBA_12x12 = 59,
        ETC_RGB4_3DS = 60,
        ETC_RGBA8_3DS = 61,
        RG16 = 62,
        R8 = 63,
        ETC_RGB4Crunched = 64,
        ETC2_RGBA8Crunched = 65,
        RG32 = 72,
        RGB48 = 73,
        RGBA64 = 74,
    }
}

impl TextureFormat {
    /// Block-compressed formats
    pub fn is_compressed(self) -> bool {
        matches!(
            self.code(),
            10 | 12 | 24..=34 | 41..=61 | 64 | 65
        )
    }

    /// Crunch-compressed formats
    pub fn is_crunched(self) -> bool {
        matches!(
            self,
            TextureFormat::DXT1Crunched
                | TextureFormat::DXT5Crunched
                | TextureFormat::ETC_RGB4Crunched
                | TextureFormat::ETC2_RGBA8Crunched
        )
    }

    /// Bits per pixel of uncompressed formats
    pub fn bits_per_pixel(self) -> Option<u32> {
        let bits = match self {
            TextureFormat::Alpha8 | TextureFormat::R8 => 8,
            TextureFormat::ARGB4444
            | TextureFormat::RGBA4444
            | TextureFormat::RGB565
            | TextureFormat::R16
            | TextureFormat::RHalf
            | TextureFormat::RG16
            | TextureFormat::YUY2 => 16,
            TextureFormat::RGB24 => 24,
            TextureFormat::RGBA32
            | TextureFormat::ARGB32
            | TextureFormat::BGRA32
            | TextureFormat::RGHalf
            | TextureFormat::RFloat
            | TextureFormat::RGB9e5Float
            | TextureFormat::RG32 => 32,
            TextureFormat::RGB48 => 48,
            TextureFormat::RGBAHalf | TextureFormat::RGFloat | TextureFormat::RGBA64 => 64,
            TextureFormat::RGBAFloat => 128,
            _ => return None,
        };
        Some(bits)
    }
}
