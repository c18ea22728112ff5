use bcrypt::{DEFAULT_COST, hash, verify};
use rand::seq::SliceRandom;
use rand::{Rng, thread_rng};

use crate::errors::AppError;

const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &[u8] = b"23456789";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}

/// Generates a random password of `len` characters (minimum 8).
///
/// Always contains at least one lowercase letter, one uppercase letter and one
/// digit. Ambiguous characters (0/O, 1/l/I) are excluded from the alphabets.
pub fn generate_password(len: usize) -> String {
    let len = len.max(8);
    let mut rng = thread_rng();

    let mut chars: Vec<u8> = vec![
        LOWER[rng.gen_range(0..LOWER.len())],
        UPPER[rng.gen_range(0..UPPER.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
    ];

    let all: Vec<u8> = [LOWER, UPPER, DIGITS].concat();
    while chars.len() < len {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);

    String::from_utf8(chars).expect("alphabets are ASCII")
}
