//! Identifier generation.
//!
//! An identifier is the current Unix time in milliseconds written in base 36,
//! followed by [`RANDOM_SUFFIX_LEN`] random base-36 characters. The time part
//! keeps identifiers roughly ordered by creation; the suffix separates
//! identifiers minted within the same millisecond.
//!
//! Nothing here checks for collisions against existing records. Callers that
//! hold a collection (the order book) retry on collision.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// Number of random characters appended after the time component.
pub const RANDOM_SUFFIX_LEN: usize = 5;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate an identifier from the system clock and the thread RNG.
pub fn generate_id() -> String {
    generate_id_with(now_millis(), &mut rand::thread_rng())
}

/// Generate an identifier from an explicit time and random source.
pub fn generate_id_with<R: Rng + ?Sized>(millis: u64, rng: &mut R) -> String {
    let mut id = to_base36(millis);
    id.reserve(RANDOM_SUFFIX_LEN);
    for _ in 0..RANDOM_SUFFIX_LEN {
        id.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
    }
    id
}

/// Render a number in lowercase base 36.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Only ASCII bytes from ALPHABET were pushed.
    String::from_utf8(digits).unwrap_or_default()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
