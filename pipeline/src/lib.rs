pub mod shard;
pub mod batch;
mod utils;

pub use batch::{BatchReport, Direction, Job};
pub use shard::Shard;
pub use utils::collect_jobs;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use compressor::{Compressor, CompressorError, Lzw};
use crypto::{CipherError, KeyedCipher, SymmetricCipher};

/// Extension given to encoded files.
pub const SHARD_EXTENSION: &str = "rbs";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("compression failed: {0}")]
    Compress(#[from] CompressorError),

    #[error("cipher failed: {0}")]
    Cipher(#[from] CipherError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot compress encrypted data")]
    CompressingEncryptedData,

    #[error("cannot decompress encrypted data")]
    DecompressingEncryptedData,

    #[error("data is already compressed")]
    AlreadyCompressed,

    #[error("data is not compressed")]
    NotCompressed,

    #[error("data is already encrypted")]
    AlreadyEncrypted,

    #[error("data is not encrypted")]
    NotEncrypted,
}

impl PipelineError {
    pub(crate) fn io(path: &Path, source: io::Error) -> PipelineError {
        PipelineError::Io { path: path.to_path_buf(), source }
    }
}

/// Compress-then-encrypt, and back.
#[derive(Clone)]
pub struct Pipeline {
    compressor: Arc<dyn Compressor>,
    cipher: Arc<dyn SymmetricCipher>,
}

impl Default for Pipeline {
    fn default() -> Pipeline {
        Pipeline::new(Arc::new(Lzw::new()), Arc::new(KeyedCipher::new()))
    }
}

impl Pipeline {
    pub fn new(compressor: Arc<dyn Compressor>, cipher: Arc<dyn SymmetricCipher>) -> Pipeline {
        Pipeline { compressor, cipher }
    }

    pub fn encode(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>, PipelineError> {
        let shard = Shard::plain(data.to_vec())
            .compress(self.compressor.as_ref())?
            .encrypt(self.cipher.as_ref(), key)?;

        debug!(input = data.len(), output = shard.body_size(), "encoded");
        Ok(shard.take_body())
    }

    pub fn decode(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>, PipelineError> {
        let shard = Shard::sealed(data.to_vec())
            .decrypt(self.cipher.as_ref(), key)?
            .decompress(self.compressor.as_ref())?;

        debug!(input = data.len(), output = shard.body_size(), "decoded");
        Ok(shard.take_body())
    }

    pub fn save(&self, path: &Path, data: &[u8], key: &[u8]) -> Result<(), PipelineError> {
        let encoded = self.encode(data, key)?;
        fs::write(path, encoded).map_err(|e| PipelineError::io(path, e))
    }

    pub fn load(&self, path: &Path, key: &[u8]) -> Result<Vec<u8>, PipelineError> {
        let encoded = fs::read(path).map_err(|e| PipelineError::io(path, e))?;
        self.decode(&encoded, key)
    }
}
