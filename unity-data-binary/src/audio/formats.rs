//! Audio format definitions
//!
//! Values match Unity's AudioCompressionFormat and AudioClipLoadType enums.

use crate::macros::code_enum;

code_enum! {
    /// Unity audio compression formats
    pub enum AudioCompressionFormat {
        /// Uncompressed PCM audio
        PCM = 0,
        /// Ogg Vorbis compression
        Vorbis = 1,
        /// ADPCM compression
        ADPCM = 2,
        /// MP3 compression
        MP3 = 3,
        /// PlayStation VAG format
        VAG = 4,
        /// PlayStation HEVAG format
        HEVAG = 5,
        /// Xbox XMA format
        XMA = 6,
        /// AAC compression
        AAC = 7,
        /// GameCube ADPCM
        GCADPCM = 8,
        /// PlayStation ATRAC9
        ATRAC9 = 9,
    }
}

code_enum! {
    /// How the clip's samples are loaded at runtime
    pub enum AudioLoadType {
        DecompressOnLoad = 0,
        CompressedInMemory = 1,
        Streaming = 2,
    }
}

impl AudioCompressionFormat {
    /// Formats stored without lossy compression
    pub fn is_lossless(self) -> bool {
        matches!(self, AudioCompressionFormat::PCM)
    }
}
