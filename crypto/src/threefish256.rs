use super::{CipherBlock, CipherError};

pub const BLOCK_SIZE: usize = 32;
pub const TWEAK_SIZE: usize = 16;

const NUM_WORDS: usize = 4;
const NUM_ROUNDS: usize = 72;
const SUBKEY_COUNT: usize = NUM_ROUNDS / 4 + 1;
const C240: u64 = 0x1bd11bdaa9fc1a22;

// Rotation constants for Threefish-256, indexed by round mod 8 and word pair.
const ROTATIONS: [[u32; 2]; 8] = [
    [14, 16],
    [52, 57],
    [23, 40],
    [5,  37],
    [25, 33],
    [46, 12],
    [58, 22],
    [32, 32],
];

type Words = [u64; NUM_WORDS];

/// Threefish with a 256-bit block, 256-bit key and 128-bit tweak.
#[derive(Debug, Clone)]
pub struct Threefish256 {
    subkeys: [Words; SUBKEY_COUNT],
}

impl Threefish256 {
    /// The key argument must be 32 bytes and the tweak argument must be 16 bytes.
    pub fn new(key: &[u8], tweak: &[u8]) -> Result<Threefish256, CipherError> {
        if key.len() != BLOCK_SIZE {
            return Err(CipherError::InvalidKeyLength { expected: BLOCK_SIZE, actual: key.len() });
        }

        if tweak.len() != TWEAK_SIZE {
            return Err(CipherError::InvalidTweakLength { expected: TWEAK_SIZE, actual: tweak.len() });
        }

        let t0 = load_word(&tweak[..8]);
        let t1 = load_word(&tweak[8..]);
        let t = [t0, t1, t0 ^ t1];

        // Extended key: the four key words plus their parity word.
        let mut k = [0u64; NUM_WORDS + 1];
        k[NUM_WORDS] = C240;
        for (i, chunk) in key.chunks_exact(8).enumerate() {
            k[i] = load_word(chunk);
            k[NUM_WORDS] ^= k[i];
        }

        let mut subkeys = [[0u64; NUM_WORDS]; SUBKEY_COUNT];
        for (s, subkey) in subkeys.iter_mut().enumerate() {
            for (i, word) in subkey.iter_mut().enumerate() {
                *word = k[(s + i) % (NUM_WORDS + 1)];
            }

            subkey[1] = subkey[1].wrapping_add(t[s % 3]);
            subkey[2] = subkey[2].wrapping_add(t[(s + 1) % 3]);
            subkey[3] = subkey[3].wrapping_add(s as u64);
        }

        Ok(Threefish256 { subkeys })
    }

    fn encrypt_words(&self, words: &mut Words) {
        let (rounds, last) = self.subkeys.split_at(SUBKEY_COUNT - 1);
        let last = &last[0];

        for (s, subkey) in rounds.iter().enumerate() {
            add_subkey(words, subkey);

            for r in 0..4 {
                let [r0, r1] = ROTATIONS[(s * 4 + r) % 8];
                mix(words, 0, 1, r0);
                mix(words, 2, 3, r1);
                words.swap(1, 3);
            }
        }

        add_subkey(words, last);
    }

    fn decrypt_words(&self, words: &mut Words) {
        let (rounds, last) = self.subkeys.split_at(SUBKEY_COUNT - 1);
        let last = &last[0];

        sub_subkey(words, last);

        for (s, subkey) in rounds.iter().enumerate().rev() {
            for r in (0..4).rev() {
                let [r0, r1] = ROTATIONS[(s * 4 + r) % 8];
                words.swap(1, 3);
                unmix(words, 2, 3, r1);
                unmix(words, 0, 1, r0);
            }

            sub_subkey(words, subkey);
        }
    }

    fn check_lengths(src: &[u8], dst: &[u8]) -> Result<(), CipherError> {
        if src.len() != BLOCK_SIZE {
            return Err(CipherError::InvalidBlockLength { expected: BLOCK_SIZE, actual: src.len() });
        }

        if dst.len() < BLOCK_SIZE {
            return Err(CipherError::InvalidOutputLength { expected: BLOCK_SIZE, actual: dst.len() });
        }

        Ok(())
    }
}

impl CipherBlock for Threefish256 {
    fn encrypt(&self, src: &[u8], dst: &mut [u8]) -> Result<(), CipherError> {
        Threefish256::check_lengths(src, dst)?;

        let mut words = load_block(src);
        self.encrypt_words(&mut words);
        store_block(&words, dst);

        Ok(())
    }

    fn decrypt(&self, src: &[u8], dst: &mut [u8]) -> Result<(), CipherError> {
        Threefish256::check_lengths(src, dst)?;

        let mut words = load_block(src);
        self.decrypt_words(&mut words);
        store_block(&words, dst);

        Ok(())
    }

    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}

fn mix(words: &mut Words, a: usize, b: usize, rotation: u32) {
    words[a] = words[a].wrapping_add(words[b]);
    words[b] = words[b].rotate_left(rotation) ^ words[a];
}

fn unmix(words: &mut Words, a: usize, b: usize, rotation: u32) {
    words[b] = (words[b] ^ words[a]).rotate_right(rotation);
    words[a] = words[a].wrapping_sub(words[b]);
}

fn add_subkey(words: &mut Words, subkey: &Words) {
    for (word, key) in words.iter_mut().zip(subkey) {
        *word = word.wrapping_add(*key);
    }
}

fn sub_subkey(words: &mut Words, subkey: &Words) {
    for (word, key) in words.iter_mut().zip(subkey) {
        *word = word.wrapping_sub(*key);
    }
}

fn load_word(src: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(src);
    u64::from_le_bytes(bytes)
}

fn load_block(src: &[u8]) -> Words {
    let mut words = [0u64; NUM_WORDS];
    for (word, chunk) in words.iter_mut().zip(src.chunks_exact(8)) {
        *word = load_word(chunk);
    }
    words
}

fn store_block(words: &Words, dst: &mut [u8]) {
    for (word, chunk) in words.iter().zip(dst.chunks_exact_mut(8)) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}
