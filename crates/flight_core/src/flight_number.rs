//! Flight-number respelling
//!
//! Some carriers publish under a three-letter ICAO code where callers type
//! the two-letter IATA one (e.g. "DL400" is tracked as "DLL400" once the
//! carrier letter is inserted). The transformation is kept isolated here so
//! the orchestration logic never needs to know the convention.

use once_cell::sync::Lazy;
use regex::Regex;

/// `<uppercase letters><digits>`, nothing else
static FLIGHT_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+)(\d+)$").unwrap());

/// Alternate spelling with the letter `L` inserted between the carrier code
/// and the flight digits
///
/// # Returns
/// * `Some(respelled)` when the input matches `<letters><digits>`
/// * `None` for anything else (no second pass is warranted)
pub fn alternate_spelling(flight_number: &str) -> Option<String> {
    FLIGHT_NUMBER_RE
        .captures(flight_number)
        .map(|caps| format!("{}L{}", &caps[1], &caps[2]))
}
