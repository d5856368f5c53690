pub mod lzw;
mod dict;

pub use lzw::{pack_codes, unpack_codes, Lzw};

use thiserror::Error;

/// Width in bytes of one packed code.
pub const CODE_WIDTH: usize = 2;

/// Number of single-byte entries every dictionary starts with.
pub const SEED_ENTRIES: usize = 256;

/// Largest dictionary a 16-bit code can address.
pub const MAX_ENTRIES: usize = 1 << 16;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CompressorError {
    #[error("packed code buffer of {len} bytes is not a multiple of the code width")]
    MalformedInput { len: usize },

    #[error("code {code} at position {position} is not defined by the dictionary")]
    CorruptData { code: u16, position: usize },

    #[error("dictionary capacity of {limit} entries exceeded")]
    CapacityExceeded { limit: usize },
}

pub trait Compressor: Send + Sync {
    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CompressorError>;
    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CompressorError>;
}
