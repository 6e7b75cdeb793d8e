//! Random short code generation.
//!
//! Produces candidate codes only; uniqueness is enforced by the registry when
//! the candidate is inserted.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Case-sensitive alphanumeric alphabet (62 symbols).
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of symbols per code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generates fixed-length codes drawn uniformly from an alphabet.
///
/// # Examples
///
/// ```ignore
/// let generator = CodeGenerator::default();
/// let code = generator.generate();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl CodeGenerator {
    /// Builds a generator for `length`-symbol codes over `alphabet`.
    ///
    /// Duplicate symbols are collapsed so every distinct symbol is equally likely.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `length` is zero or the alphabet is empty.
    pub fn new(alphabet: &str, length: usize) -> Result<Self, AppError> {
        if length == 0 {
            return Err(AppError::bad_request(
                "Code length must be positive",
                json!({ "length": length }),
            ));
        }

        let mut symbols: Vec<char> = Vec::with_capacity(alphabet.len());
        for c in alphabet.chars() {
            if !symbols.contains(&c) {
                symbols.push(c);
            }
        }

        if symbols.is_empty() {
            return Err(AppError::bad_request(
                "Code alphabet must not be empty",
                json!({}),
            ));
        }

        Ok(Self {
            alphabet: symbols,
            length,
        })
    }

    /// Builds a generator over [`DEFAULT_ALPHABET`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `length` is zero.
    pub fn with_length(length: usize) -> Result<Self, AppError> {
        Self::new(DEFAULT_ALPHABET, length)
    }

    /// Produces one candidate code.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    /// Symbols per generated code.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of distinct codes this generator can produce, saturating at `u128::MAX`.
    pub fn keyspace(&self) -> u128 {
        let base = self.alphabet.len() as u128;
        (0..self.length).fold(1u128, |acc, _| acc.saturating_mul(base))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_CODE_LENGTH,
        }
    }
}
