// WHY: Identity-shape masking; the output keeps the exact length and
// character-class layout of the input so downstream format checks still pass

use rand::Rng;

const LOWERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Replace each character independently with a uniformly random character
/// of the same class: digits stay digits and letters stay letters of the
/// same case, while anything else is untouched. Output character count
/// always equals the input's.
pub fn shuffle_text<R: Rng>(rng: &mut R, text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_numeric() {
                pick(rng, DIGITS)
            } else if c.is_alphabetic() {
                if c.is_uppercase() {
                    pick(rng, UPPERS)
                } else {
                    pick(rng, LOWERS)
                }
            } else {
                c
            }
        })
        .collect()
}

fn pick<R: Rng>(rng: &mut R, alphabet: &[u8]) -> char {
    alphabet[rng.random_range(0..alphabet.len())] as char
}
