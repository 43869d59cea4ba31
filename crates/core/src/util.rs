use std::borrow::Cow;

pub(crate) fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Decodes stored source bytes. Invalid UTF-8 is replaced rather than
/// rejected; the flag reports whether any replacement happened.
pub(crate) fn decode_source(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => match String::from_utf8_lossy(err.as_bytes()) {
            Cow::Owned(text) => (text, true),
            Cow::Borrowed(text) => (text.to_string(), false),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a64_matches_reference_vectors() {
        assert_eq!(fnv1a64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a64(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn decode_source_replaces_invalid_utf8() {
        let (text, lossy) = decode_source(b"int a\xff;".to_vec());
        assert!(lossy);
        assert_eq!(text, "int a\u{fffd};");

        let (text, lossy) = decode_source("x = 1".as_bytes().to_vec());
        assert!(!lossy);
        assert_eq!(text, "x = 1");
    }
}
