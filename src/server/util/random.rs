//! Random identifiers and secrets.

use rand::Rng;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                              abcdefghijklmnopqrstuvwxyz\
                              0123456789";

/// Returns a random alphanumeric string of `length` characters.
pub fn alphanumeric(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHANUMERIC.len());
            ALPHANUMERIC[idx] as char
        })
        .collect()
}

/// Returns a random string of `length` decimal digits, leading zeros allowed.
pub fn digits(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
