use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::trace;

use std::sync::Arc;

use super::cbc::CbcProcessor;
use super::threefish256::{Threefish256, BLOCK_SIZE, TWEAK_SIZE};
use super::{CipherBlock, CipherError, SymmetricCipher};

pub const DEFAULT_TWEAK: [u8; TWEAK_SIZE] = [61,76,51,71,52,61,75,88,13,7,3,1,5,241,177,23];

/// Threefish-256 in CBC mode behind a passphrase-style key.
///
/// Any non-empty key is accepted; it is hashed with SHA-256 into the cipher
/// key. Every `encrypt` draws a fresh IV, so equal inputs give different
/// ciphertexts.
#[derive(Debug, Clone)]
pub struct KeyedCipher {
    tweak: [u8; TWEAK_SIZE],
}

impl Default for KeyedCipher {
    fn default() -> KeyedCipher {
        KeyedCipher::with_tweak(DEFAULT_TWEAK)
    }
}

impl KeyedCipher {
    pub fn new() -> KeyedCipher {
        KeyedCipher::default()
    }

    pub fn with_tweak(tweak: [u8; TWEAK_SIZE]) -> KeyedCipher {
        KeyedCipher { tweak }
    }

    fn processor(&self, key: &[u8]) -> Result<CbcProcessor, CipherError> {
        if key.is_empty() {
            return Err(CipherError::EmptyKey);
        }

        let cipher = Threefish256::new(&hash_key(key), &self.tweak)?;
        let block: Arc<dyn CipherBlock> = Arc::new(cipher);

        Ok(CbcProcessor::new(block))
    }
}

impl SymmetricCipher for KeyedCipher {
    fn encrypt(&self, src: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
        let processor = self.processor(key)?;

        let mut rng = rand::thread_rng();
        let iv: Vec<u8> = (0..BLOCK_SIZE).map(|_| rng.gen()).collect();

        let dst = processor.encrypt_blocks(&iv, src)?;
        trace!(plaintext = src.len(), ciphertext = dst.len(), "encrypted");
        Ok(dst)
    }

    fn decrypt(&self, src: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
        let processor = self.processor(key)?;

        let dst = processor.decrypt_blocks(src)?;
        trace!(ciphertext = src.len(), plaintext = dst.len(), "decrypted");
        Ok(dst)
    }
}

pub fn hash_key(key: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(key);
    let result = hasher.finalize();

    let mut hash_array = [0u8; BLOCK_SIZE];
    hash_array.copy_from_slice(&result);
    hash_array
}


#[cfg(test)]
mod keyed_test {
    use super::*;

    #[test]
    fn hash_key_res() {
        // SHA-256("abc")
        let expected: [u8; 32] = [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea,
            0x41, 0x41, 0x40, 0xde, 0x5d, 0xae, 0x22, 0x23,
            0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c,
            0xb4, 0x10, 0xff, 0x61, 0xf2, 0x00, 0x15, 0xad,
        ];
        assert_eq!(hash_key(b"abc"), expected);
    }

    #[test]
    fn empty_key() {
        let cipher = KeyedCipher::new();

        assert_eq!(cipher.encrypt(b"data", b""), Err(CipherError::EmptyKey));
        assert_eq!(cipher.decrypt(&[0u8; 64], b""), Err(CipherError::EmptyKey));
    }

    #[test]
    fn encrypt_decrypt_same_value() {
        let cipher = KeyedCipher::new();
        let key = b"secretkey1234567";

        let ciphertext = cipher.encrypt(b"Hello rbshard!", key).unwrap();
        assert_eq!(ciphertext.len(), 64);
        assert_eq!(cipher.decrypt(&ciphertext, key).unwrap(), b"Hello rbshard!".to_vec());

        let ciphertext = cipher.encrypt(b"", key).unwrap();
        assert_eq!(cipher.decrypt(&ciphertext, key).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn fresh_iv_per_call() {
        let cipher = KeyedCipher::new();
        let key = b"k";

        let c1 = cipher.encrypt(b"same input", key).unwrap();
        let c2 = cipher.encrypt(b"same input", key).unwrap();
        assert_ne!(c1, c2);
    }

    #[test]
    fn tweak_changes_cipher() {
        let key = b"k";
        let c1 = KeyedCipher::new().encrypt(b"same input", key).unwrap();

        let other = KeyedCipher::with_tweak([0u8; TWEAK_SIZE]);
        let r = other.decrypt(&c1, key);
        assert_ne!(r, Ok(b"same input".to_vec()));
    }

    #[test]
    fn wrong_key() {
        let cipher = KeyedCipher::new();

        let ciphertext = cipher.encrypt(b"Hello rbshard!", b"right key").unwrap();
        let r = cipher.decrypt(&ciphertext, b"wrong key");
        assert_ne!(r, Ok(b"Hello rbshard!".to_vec()));
    }
}
