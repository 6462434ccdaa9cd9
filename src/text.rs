//! Text utilities: whitespace tokenization, word validity, UTF-8 length, and hashing.

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Fixed seed so `hash64` is stable across processes and between build and query.
const HASH_SEED: u64 = 0x4E_41_4D_45_5F_4D_41_54; // "NAME_MAT" in ASCII, arbitrary but fixed

/// Split on the ASCII space character only; other whitespace is preserved within tokens.
pub fn split_words(s: &str) -> Vec<&str> {
    s.split(' ').filter(|w| !w.is_empty()).collect()
}

/// Number of Unicode code points in `s`.
pub fn utf8_length(s: &str) -> usize {
    s.chars().count()
}

/// A word is valid when it has at least 2 code points and does not start with an ASCII digit.
pub fn is_valid_word(w: &str) -> bool {
    if utf8_length(w) < 2 {
        return false;
    }
    match w.chars().next() {
        Some(c) => !c.is_ascii_digit(),
        None => false,
    }
}

/// Stable 64-bit hash of UTF-8 bytes, used for both NameIndex keys and query-side lookups.
pub fn hash64(s: &str) -> u64 {
    xxh3_64_with_seed(s.as_bytes(), HASH_SEED)
}
