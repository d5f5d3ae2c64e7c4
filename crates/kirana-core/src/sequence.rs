//! # Bill Sequence Arithmetic
//!
//! Pure half of the bill sequencer. Persisting the counter is the db
//! crate's job; deciding which number comes next happens here.
//!
//! ```text
//!   counter stored?  ── no ──►  next = max(archive sequences) + 1
//!        │
//!       yes
//!        │
//!   counter > archive max?  ── no ──►  next = max + 1 (stale counter)
//!        │
//!       yes ──► next = counter
//!
//!   after issuing: store next + 1
//! ```

use crate::{BILL_NUMBER_PREFIX, BILL_NUMBER_WIDTH};

/// Formats a sequence as a bill number: `7` → `BILL-007`.
///
/// Sequences wider than three digits are written in full (`BILL-1234`).
pub fn format_bill_number(sequence: u64) -> String {
    format!(
        "{}{:0width$}",
        BILL_NUMBER_PREFIX,
        sequence,
        width = BILL_NUMBER_WIDTH
    )
}

/// Recovers a sequence from the digits embedded in a bill number.
///
/// All ASCII digits are taken in order, so `BILL-007` → 7 and `#12-A3` → 123.
/// Returns `None` if there are no digits or they overflow.
///
/// ## Example
/// ```rust
/// use kirana_core::sequence::parse_bill_sequence;
///
/// assert_eq!(parse_bill_sequence("BILL-007"), Some(7));
/// assert_eq!(parse_bill_sequence("BILL-"), None);
/// ```
pub fn parse_bill_sequence(bill_number: &str) -> Option<u64> {
    let digits: String = bill_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Chooses the next sequence to issue.
///
/// `stored` is the persisted counter, if any; `archive_max` is the highest
/// sequence present in the archive. The result is always greater than
/// `archive_max`, so a counter that fell behind the archive cannot hand out
/// a number that is already taken.
pub fn next_sequence(stored: Option<u64>, archive_max: Option<u64>) -> u64 {
    let floor = archive_max.map(|max| max.saturating_add(1)).unwrap_or(1);
    match stored {
        Some(counter) => counter.max(floor),
        None => floor,
    }
}

/// Whether `stored` had to be overridden by [`next_sequence`].
pub fn counter_is_stale(stored: Option<u64>, archive_max: Option<u64>) -> bool {
    match (stored, archive_max) {
        (Some(counter), Some(max)) => counter <= max,
        _ => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
