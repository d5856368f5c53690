use super::dict::{DecodeDict, EncodeDict};
use super::{Compressor, CompressorError, CODE_WIDTH, MAX_ENTRIES, SEED_ENTRIES};

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

/// Greedy longest-match LZW over bytes with fixed 16-bit codes.
///
/// The dictionary is rebuilt on every call. When the input needs more entries
/// than `max_entries`, compression fails with
/// [`CompressorError::CapacityExceeded`] instead of wrapping codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lzw {
    max_entries: usize,
}

impl Default for Lzw {
    fn default() -> Lzw {
        Lzw::new()
    }
}

impl Lzw {
    pub fn new() -> Lzw {
        Lzw {
            max_entries: MAX_ENTRIES,
        }
    }

    /// Limits the dictionary to `max_entries` codes. Returns `None` unless
    /// there is room for at least one learned entry and every code still
    /// fits in 16 bits.
    pub fn with_max_entries(max_entries: usize) -> Option<Lzw> {
        if max_entries <= SEED_ENTRIES || max_entries > MAX_ENTRIES {
            return None;
        }

        Some(Lzw { max_entries })
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CompressorError> {
        Compressor::compress(self, src)
    }

    pub fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CompressorError> {
        Compressor::decompress(self, src)
    }

    pub fn encode_codes(&self, src: &[u8]) -> Result<Vec<u16>, CompressorError> {
        let mut dict = EncodeDict::new(self.max_entries);
        let codes = encode_with(&mut dict, src)?;

        debug!(input = src.len(), codes = codes.len(), dict = dict.len(), "lzw encoded");
        Ok(codes)
    }

    pub fn decode_codes(&self, codes: &[u16]) -> Result<Vec<u8>, CompressorError> {
        let mut dict = DecodeDict::new(self.max_entries);
        let result = decode_with(&mut dict, codes)?;

        debug!(codes = codes.len(), output = result.len(), dict = dict.len(), "lzw decoded");
        Ok(result)
    }
}

impl Compressor for Lzw {
    fn compress(&self, src: &[u8]) -> Result<Vec<u8>, CompressorError> {
        let codes = self.encode_codes(src)?;
        Ok(pack_codes(&codes))
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>, CompressorError> {
        let codes = unpack_codes(src)?;
        self.decode_codes(&codes)
    }
}

fn encode_with(dict: &mut EncodeDict, src: &[u8]) -> Result<Vec<u16>, CompressorError> {
    let mut symbols = src.iter().copied();

    let mut key = match symbols.next() {
        Some(symbol) => u16::from(symbol),
        None => return Ok(Vec::new()),
    };

    let mut codes = Vec::new();
    for symbol in symbols {
        match dict.find(key, symbol) {
            Some(code) => key = code,
            None => {
                codes.push(key);
                dict.insert(key, symbol)?;
                key = u16::from(symbol);
            }
        }
    }
    codes.push(key);

    Ok(codes)
}

fn decode_with(dict: &mut DecodeDict, codes: &[u16]) -> Result<Vec<u8>, CompressorError> {
    let (&first_code, rest) = match codes.split_first() {
        Some(split) => split,
        None => return Ok(Vec::new()),
    };

    let mut var = dict
        .get(first_code)
        .ok_or(CompressorError::CorruptData { code: first_code, position: 0 })?
        .to_vec();
    let mut result = var.clone();

    for (i, &code) in rest.iter().enumerate() {
        let entry = match dict.get(code) {
            Some(entry) => entry.to_vec(),
            None if usize::from(code) == dict.len() => {
                let mut entry = var.clone();
                entry.push(var[0]);
                entry
            }
            None => return Err(CompressorError::CorruptData { code, position: i + 1 }),
        };

        result.extend_from_slice(&entry);

        let mut new_entry = var;
        new_entry.push(entry[0]);
        dict.insert(new_entry)?;

        var = entry;
    }

    Ok(result)
}

/// Serializes codes as consecutive little-endian 16-bit integers.
pub fn pack_codes(codes: &[u16]) -> Vec<u8> {
    let mut dst = vec![0u8; codes.len() * CODE_WIDTH];
    LittleEndian::write_u16_into(codes, &mut dst);
    dst
}

/// Inverse of [`pack_codes`]. A trailing partial code is an error.
pub fn unpack_codes(src: &[u8]) -> Result<Vec<u16>, CompressorError> {
    if src.len() % CODE_WIDTH != 0 {
        return Err(CompressorError::MalformedInput { len: src.len() });
    }

    let mut codes = vec![0u16; src.len() / CODE_WIDTH];
    LittleEndian::read_u16_into(src, &mut codes);
    Ok(codes)
}


#[cfg(test)]
mod lzw_test {
    use super::*;

    const SEQUENCE: [u8; 60] = [
        0,1,2,3,4,5,6,7,8,9,
        0,1,2,3,4,3,4,5,6,7,
        0,1,2,3,4,5,6,7,8,9,
        4,5,2,3,3,4,3,4,5,6,
        6,7,8,9,3,5,6,7,8,9,
        2,4,5,5,5,5,5,5,5,1,
    ];

    const SEQUENCE_CODES: [u16; 35] = [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9,
        256, 258, 4, 259, 261, 7, 266, 269, 262, 264,
        260, 258, 259, 273, 274, 9, 3, 270, 264, 2,
        260, 5, 287, 288, 1,
    ];

    #[test]
    fn compress_res() {
        let lzw = Lzw::new();

        let codes = lzw.encode_codes(&SEQUENCE).unwrap();
        assert_eq!(codes, SEQUENCE_CODES.to_vec());

        let compressed = lzw.compress(&SEQUENCE).unwrap();
        assert_eq!(compressed.len(), 2 * 35);
        assert_eq!(&compressed[..4], &[0, 0, 1, 0]);
        assert_eq!(&compressed[20..24], &[0, 1, 2, 1]);
    }

    #[test]
    fn decompress_res() {
        let lzw = Lzw::new();

        let uncompressed = lzw.decode_codes(&SEQUENCE_CODES).unwrap();
        assert_eq!(uncompressed, SEQUENCE.to_vec());

        let packed = pack_codes(&SEQUENCE_CODES);
        assert_eq!(lzw.decompress(&packed).unwrap(), SEQUENCE.to_vec());
    }

    #[test]
    fn empty_input() {
        let lzw = Lzw::new();

        assert_eq!(lzw.compress(b"").unwrap(), Vec::<u8>::new());
        assert_eq!(lzw.decompress(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn single_byte() {
        let lzw = Lzw::new();

        let compressed = lzw.compress(b"a").unwrap();
        assert_eq!(compressed, vec![97, 0]);
        assert_eq!(lzw.decompress(&compressed).unwrap(), b"a".to_vec());

        let compressed = lzw.compress(&[255]).unwrap();
        assert_eq!(compressed, vec![255, 0]);
    }

    #[test]
    fn repetition_compresses() {
        let lzw = Lzw::new();

        let codes = lzw.encode_codes(b"aaaaaaaaaa").unwrap();
        assert_eq!(codes, vec![97, 256, 257, 258]);
        assert_eq!(lzw.decode_codes(&codes).unwrap(), b"aaaaaaaaaa".to_vec());

        let mut last_ratio = 1.0;
        for n in [10, 100, 1000, 10000] {
            let codes = lzw.encode_codes(&vec![b'a'; n]).unwrap();
            let ratio = codes.len() as f64 / n as f64;
            assert!(ratio <= last_ratio, "ratio grew at n={}", n);
            last_ratio = ratio;
        }
    }

    #[test]
    fn tobeornot() {
        let lzw = Lzw::new();
        let input = b"TOBEORNOTTOBEORTOBEORNOT";

        let codes = lzw.encode_codes(input).unwrap();
        let expected: Vec<u16> = vec![
            84, 79, 66, 69, 79, 82, 78, 79, 84,
            256, 258, 260, 265, 259, 261, 263,
        ];
        assert_eq!(codes, expected);
        assert!(codes.len() < input.len());

        assert_eq!(lzw.decode_codes(&codes).unwrap(), input.to_vec());
    }

    #[test]
    fn self_reference_case() {
        let lzw = Lzw::new();

        // "abababa": the fourth code is defined by the step that emits it.
        let codes = lzw.encode_codes(b"abababa").unwrap();
        assert_eq!(codes, vec![97, 98, 256, 258]);
        assert_eq!(lzw.decode_codes(&codes).unwrap(), b"abababa".to_vec());
    }

    #[test]
    fn decompress_errors() {
        let lzw = Lzw::new();

        let r = lzw.decompress(&[0, 0, 1, 0, 2]);
        assert_eq!(r, Err(CompressorError::MalformedInput { len: 5 }));

        let r = lzw.decompress(&[7]);
        assert_eq!(r, Err(CompressorError::MalformedInput { len: 1 }));

        let r = lzw.decompress(&[1, 0]);
        assert_eq!(r, Ok(vec![1]));
    }

    #[test]
    fn corrupt_codes_are_rejected() {
        let lzw = Lzw::new();

        let r = lzw.decode_codes(&[256]);
        assert_eq!(r, Err(CompressorError::CorruptData { code: 256, position: 0 }));

        // After two codes the next assignable code is 257, so 258 is a forward reference.
        let r = lzw.decode_codes(&[97, 98, 258]);
        assert_eq!(r, Err(CompressorError::CorruptData { code: 258, position: 2 }));

        let r = lzw.decode_codes(&[97, 98, 257]);
        assert_eq!(r, Ok(b"abbb".to_vec()));

        let r = lzw.decompress(&pack_codes(&[97, u16::MAX]));
        assert_eq!(r, Err(CompressorError::CorruptData { code: u16::MAX, position: 1 }));
    }

    #[test]
    fn max_entries_bounds() {
        assert!(Lzw::with_max_entries(256).is_none());
        assert!(Lzw::with_max_entries(MAX_ENTRIES + 1).is_none());
        assert_eq!(Lzw::with_max_entries(MAX_ENTRIES), Some(Lzw::new()));
        assert_eq!(Lzw::with_max_entries(300).unwrap().max_entries(), 300);
    }

    #[test]
    fn capacity_exceeded() {
        let lzw = Lzw::with_max_entries(258).unwrap();

        // "abc" learns "ab" and "bc", exactly filling the dictionary.
        let codes = lzw.encode_codes(b"abc").unwrap();
        assert_eq!(codes, vec![97, 98, 99]);
        assert_eq!(lzw.decode_codes(&codes).unwrap(), b"abc".to_vec());

        let r = lzw.compress(b"abcd");
        assert_eq!(r, Err(CompressorError::CapacityExceeded { limit: 258 }));

        let r = lzw.decode_codes(&[97, 98, 99, 100]);
        assert_eq!(r, Err(CompressorError::CapacityExceeded { limit: 258 }));
    }

    #[test]
    fn dictionaries_in_lockstep() {
        let inputs: [&[u8]; 4] = [
            b"TOBEORNOTTOBEORTOBEORNOT",
            b"abababababababab",
            &SEQUENCE,
            b"the rain in spain stays mainly in the plain",
        ];

        for input in inputs {
            let mut encode_dict = EncodeDict::new(MAX_ENTRIES);
            let codes = encode_with(&mut encode_dict, input).unwrap();

            let mut decode_dict = DecodeDict::new(MAX_ENTRIES);
            let output = decode_with(&mut decode_dict, &codes).unwrap();
            assert_eq!(output, input.to_vec());

            assert_eq!(decode_dict.len(), encode_dict.len());
            for code in SEED_ENTRIES..decode_dict.len() {
                let code = code as u16;
                assert_eq!(decode_dict.get(code), Some(encode_dict.expand(code).as_slice()));
            }
        }
    }

    #[test]
    fn emitted_codes_never_reference_forward() {
        let lzw = Lzw::new();
        let input = b"abracadabra abracadabra abracadabra";

        let codes = lzw.encode_codes(input).unwrap();
        for (i, &code) in codes.iter().enumerate() {
            assert!(usize::from(code) <= SEED_ENTRIES + i, "code {} at {}", code, i);
        }
    }
}
