use super::CipherError;

/// PKCS#7: always appends between 1 and `block_size` bytes, each holding the
/// pad length. `block_size` must be below 256.
pub(crate) fn pad(src: &[u8], block_size: usize) -> Vec<u8> {
    let padding_size = block_size - src.len() % block_size;

    let mut dst = Vec::with_capacity(src.len() + padding_size);
    dst.extend_from_slice(src);
    dst.resize(src.len() + padding_size, padding_size as u8);
    dst
}

pub(crate) fn unpad(mut src: Vec<u8>, block_size: usize) -> Result<Vec<u8>, CipherError> {
    let padding_size = match src.last() {
        Some(&last) => last as usize,
        None => return Err(CipherError::InvalidPadding),
    };

    if padding_size == 0 || padding_size > block_size || padding_size > src.len() {
        return Err(CipherError::InvalidPadding);
    }

    let offset = src.len() - padding_size;
    if src[offset..].iter().any(|&b| b as usize != padding_size) {
        return Err(CipherError::InvalidPadding);
    }

    src.truncate(offset);
    Ok(src)
}
