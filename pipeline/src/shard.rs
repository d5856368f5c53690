use super::PipelineError;

use compressor::Compressor;
use crypto::SymmetricCipher;

/// A buffer moving through the pipeline, tagged with which steps it has
/// been through. Each step consumes the shard and refuses to run out of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    compressed: bool,
    encrypted: bool,
    body: Vec<u8>,
}

impl Shard {
    /// Raw input, neither compressed nor encrypted.
    pub fn plain(body: Vec<u8>) -> Shard {
        Shard::new(false, false, body)
    }

    /// Output of a full encode: compressed, then encrypted.
    pub fn sealed(body: Vec<u8>) -> Shard {
        Shard::new(true, true, body)
    }

    pub fn new(compressed: bool, encrypted: bool, body: Vec<u8>) -> Shard {
        Shard {
            compressed,
            encrypted,
            body,
        }
    }

    pub fn compress(self, compressor: &dyn Compressor) -> Result<Shard, PipelineError> {
        if self.is_encrypted() { return Err(PipelineError::CompressingEncryptedData); }
        if self.is_compressed() { return Err(PipelineError::AlreadyCompressed); }

        Ok(Shard {
            compressed: true,
            body: compressor.compress(&self.body)?,
            ..self
        })
    }

    pub fn decompress(self, compressor: &dyn Compressor) -> Result<Shard, PipelineError> {
        if self.is_encrypted() { return Err(PipelineError::DecompressingEncryptedData); }
        if !self.is_compressed() { return Err(PipelineError::NotCompressed); }

        Ok(Shard {
            compressed: false,
            body: compressor.decompress(&self.body)?,
            ..self
        })
    }

    pub fn encrypt(self, cipher: &dyn SymmetricCipher, key: &[u8]) -> Result<Shard, PipelineError> {
        if self.is_encrypted() { return Err(PipelineError::AlreadyEncrypted); }

        Ok(Shard {
            encrypted: true,
            body: cipher.encrypt(&self.body, key)?,
            ..self
        })
    }

    pub fn decrypt(self, cipher: &dyn SymmetricCipher, key: &[u8]) -> Result<Shard, PipelineError> {
        if !self.is_encrypted() { return Err(PipelineError::NotEncrypted); }

        Ok(Shard {
            encrypted: false,
            body: cipher.decrypt(&self.body, key)?,
            ..self
        })
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_size(&self) -> usize {
        self.body.len()
    }

    pub fn take_body(self) -> Vec<u8> {
        self.body
    }
}
