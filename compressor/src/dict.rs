use std::collections::HashMap;

use super::{CompressorError, SEED_ENTRIES};

/// Hands out dictionary codes. Both dictionaries start at the same point and
/// grow by the same rule, which is what keeps them in lockstep.
#[derive(Debug)]
struct CodeSpace {
    next: usize,
    limit: usize,
}

impl CodeSpace {
    fn new(limit: usize) -> CodeSpace {
        CodeSpace {
            next: SEED_ENTRIES,
            limit,
        }
    }

    fn assign(&mut self) -> Result<u16, CompressorError> {
        if self.next >= self.limit {
            return Err(CompressorError::CapacityExceeded { limit: self.limit });
        }

        let code = self.next as u16;
        self.next += 1;
        Ok(code)
    }
}

/// String-to-code side. A string is stored as the code of its prefix plus
/// its last byte; single bytes are their own codes and are never stored.
#[derive(Debug)]
pub(crate) struct EncodeDict {
    links: HashMap<(u16, u8), u16>,
    space: CodeSpace,
}

impl EncodeDict {
    pub fn new(limit: usize) -> EncodeDict {
        EncodeDict {
            links: HashMap::new(),
            space: CodeSpace::new(limit),
        }
    }

    pub fn find(&self, prefix: u16, byte: u8) -> Option<u16> {
        self.links.get(&(prefix, byte)).copied()
    }

    pub fn insert(&mut self, prefix: u16, byte: u8) -> Result<u16, CompressorError> {
        let code = self.space.assign()?;
        self.links.insert((prefix, byte), code);
        Ok(code)
    }

    pub fn len(&self) -> usize {
        self.space.next
    }
}

/// Code-to-string side: a fixed table for the seed bytes and an arena of
/// byte strings indexed by `code - 256` for everything learned later.
#[derive(Debug)]
pub(crate) struct DecodeDict {
    seed: [u8; SEED_ENTRIES],
    entries: Vec<Vec<u8>>,
    space: CodeSpace,
}

impl DecodeDict {
    pub fn new(limit: usize) -> DecodeDict {
        DecodeDict {
            seed: std::array::from_fn(|i| i as u8),
            entries: Vec::new(),
            space: CodeSpace::new(limit),
        }
    }

    pub fn get(&self, code: u16) -> Option<&[u8]> {
        let code = usize::from(code);
        if code < SEED_ENTRIES {
            return Some(&self.seed[code..code + 1]);
        }

        self.entries.get(code - SEED_ENTRIES).map(Vec::as_slice)
    }

    pub fn insert(&mut self, word: Vec<u8>) -> Result<u16, CompressorError> {
        let code = self.space.assign()?;
        self.entries.push(word);
        Ok(code)
    }

    pub fn len(&self) -> usize {
        self.space.next
    }
}

#[cfg(test)]
impl EncodeDict {
    /// Rebuilds the byte string behind `code` by walking prefix links.
    pub fn expand(&self, code: u16) -> Vec<u8> {
        let parents: HashMap<u16, (u16, u8)> = self
            .links
            .iter()
            .map(|(&link, &code)| (code, link))
            .collect();

        let mut word = Vec::new();
        let mut code = code;
        while let Some(&(prefix, byte)) = parents.get(&code) {
            word.push(byte);
            code = prefix;
        }
        word.push(code as u8);
        word.reverse();
        word
    }
}
