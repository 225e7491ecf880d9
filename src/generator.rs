//! Candidate Record Generator
//!
//! Produces one random identity candidate per call: a 14-digit PINFL-like
//! identifier and a prefixed 7-digit passport designator. Stateless: a pure
//! function of the supplied random source, so callers can seed a
//! deterministic rng in tests and use `thread_rng` in handlers.
//!
//! NOTE: Output is synthetic and does not satisfy any real country's
//! checksum rules.

use rand::Rng;

// ============================================
// VALUE SPACE CONSTANTS
// ============================================

/// Allowed passport series prefixes
pub const PASSPORT_PREFIXES: [&str; 3] = ["BP", "GP", "CP"];

/// Identifier length in digits
pub const IDENTIFIER_LEN: usize = 14;

/// Largest passport number (7 digits, leading zeros allowed)
pub const PASSPORT_NUMBER_MAX: u32 = 9_999_999;

/// Total distinct passport full strings (prefixes x numbers).
/// This is the binding constraint on batch size: the identifier space
/// (~9x10^13) is effectively inexhaustible by comparison.
pub const PASSPORT_SPACE: usize = PASSPORT_PREFIXES.len() * (PASSPORT_NUMBER_MAX as usize + 1);

/// Largest batch the collector will attempt: one tenth of the passport
/// space. Collision-free generation becomes impractical well before the
/// theoretical maximum, so requests beyond this bound are rejected instead
/// of looping indefinitely.
pub const MAX_SAFE_COUNT: usize = PASSPORT_SPACE / 10;

// ============================================
// Passport candidate
// ============================================

/// One passport designator: series prefix + zero-padded 7-digit number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passport {
    /// Series prefix, one of [`PASSPORT_PREFIXES`]
    pub prefix: &'static str,
    /// 7-digit number with leading zeros preserved
    pub number: String,
    /// Prefix concatenated with number, e.g. "BP0012345"
    pub full: String,
}

/// Generate a synthetic PINFL-like identifier: 14 digits, first digit 1-9
pub fn generate_identifier(rng: &mut impl Rng) -> String {
    let mut s = String::with_capacity(IDENTIFIER_LEN);
    s.push(char::from(b'0' + rng.gen_range(1..=9u8)));
    for _ in 1..IDENTIFIER_LEN {
        s.push(char::from(b'0' + rng.gen_range(0..=9u8)));
    }
    s
}

/// Generate a passport candidate: uniform prefix + uniform 7-digit number
pub fn generate_passport(rng: &mut impl Rng) -> Passport {
    let prefix = PASSPORT_PREFIXES[rng.gen_range(0..PASSPORT_PREFIXES.len())];
    let number = format!("{:07}", rng.gen_range(0..=PASSPORT_NUMBER_MAX));
    let full = format!("{}{}", prefix, number);
    Passport {
        prefix,
        number,
        full,
    }
}
