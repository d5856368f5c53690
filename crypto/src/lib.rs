pub mod threefish256;
pub mod cbc;
pub mod keyed;
mod padding;

pub use cbc::CbcProcessor;
pub use keyed::KeyedCipher;
pub use threefish256::Threefish256;

use thiserror::Error;

/// A fixed-size block permutation keyed at construction.
pub trait CipherBlock: Send + Sync {
    fn encrypt(&self, src: &[u8], dst: &mut [u8]) -> Result<(), CipherError>;
    fn decrypt(&self, src: &[u8], dst: &mut [u8]) -> Result<(), CipherError>;
    fn block_size(&self) -> usize;
}

/// Byte-string encryption under a caller-supplied key. `decrypt` must invert
/// `encrypt` exactly when given the same key.
pub trait SymmetricCipher: Send + Sync {
    fn encrypt(&self, src: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError>;
    fn decrypt(&self, src: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError>;
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("tweak must be {expected} bytes, got {actual}")]
    InvalidTweakLength { expected: usize, actual: usize },

    #[error("key must not be empty")]
    EmptyKey,

    #[error("block input must be {expected} bytes, got {actual}")]
    InvalidBlockLength { expected: usize, actual: usize },

    #[error("block output buffer of {actual} bytes is shorter than {expected}")]
    InvalidOutputLength { expected: usize, actual: usize },

    #[error("IV must be one block of {expected} bytes, got {actual}")]
    InvalidIVLength { expected: usize, actual: usize },

    #[error("ciphertext of {len} bytes is not a whole number of blocks after the IV")]
    InvalidCiphertextLength { len: usize },

    #[error("invalid padding, wrong key or damaged ciphertext")]
    InvalidPadding,
}
