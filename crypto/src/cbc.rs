use super::padding::{pad, unpad};
use super::{CipherBlock, CipherError};

use std::sync::Arc;

/// CBC chaining over any [`CipherBlock`]. The IV travels as the first
/// ciphertext block and the plaintext is PKCS#7 padded.
#[derive(Clone)]
pub struct CbcProcessor {
    block: Arc<dyn CipherBlock>,
    block_size: usize,
}

impl CbcProcessor {
    pub fn new(block: Arc<dyn CipherBlock>) -> CbcProcessor {
        CbcProcessor {
            block_size: block.block_size(),
            block,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn encrypt_blocks(&self, iv: &[u8], src: &[u8]) -> Result<Vec<u8>, CipherError> {
        if iv.len() != self.block_size {
            return Err(CipherError::InvalidIVLength { expected: self.block_size, actual: iv.len() });
        }

        let padded = pad(src, self.block_size);

        let mut dst = Vec::with_capacity(self.block_size + padded.len());
        dst.extend_from_slice(iv);

        let mut state = iv.to_vec();
        let mut out = vec![0u8; self.block_size];
        for src_block in padded.chunks_exact(self.block_size) {
            state.iter_mut()
                .zip(src_block)
                .for_each(|(x1, x2)| *x1 ^= x2);

            self.block.encrypt(&state, &mut out)?;
            state.copy_from_slice(&out);
            dst.extend_from_slice(&out);
        }

        Ok(dst)
    }

    pub fn decrypt_blocks(&self, src: &[u8]) -> Result<Vec<u8>, CipherError> {
        if src.len() % self.block_size != 0 || src.len() < 2 * self.block_size {
            return Err(CipherError::InvalidCiphertextLength { len: src.len() });
        }

        let mut dst = Vec::with_capacity(src.len() - self.block_size);
        let mut out = vec![0u8; self.block_size];

        let blocks: Vec<&[u8]> = src.chunks_exact(self.block_size).collect();
        for pair in blocks.windows(2) {
            let (s1_block, s2_block) = (pair[0], pair[1]);

            self.block.decrypt(s2_block, &mut out)?;
            out.iter_mut()
                .zip(s1_block)
                .for_each(|(x1, x2)| *x1 ^= x2);

            dst.extend_from_slice(&out);
        }

        unpad(dst, self.block_size)
    }
}
