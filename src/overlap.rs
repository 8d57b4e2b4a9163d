//! Span overlap predicate.
//!
//! Two half-open spans overlap when they share a start or an end, or when
//! they interleave or nest. Spans that merely touch (`a.end == b.start`) do
//! not overlap. Zero-length spans follow the same rules.
//!
//! The predicate is symmetric: `overlaps(a, b) == overlaps(b, a)` for every
//! pair of well-formed spans.

use crate::error::ReconcileError;
use crate::types::Span;

/// Decide whether two spans overlap.
///
/// Returns [`ReconcileError::UnhandledOverlapCase`] when either span has
/// `start > end`; such input is a data error upstream and is never guessed
/// at.
pub fn overlaps(first: Span, second: Span) -> Result<bool, ReconcileError> {
    let unhandled = || ReconcileError::UnhandledOverlapCase { first, second };

    if !first.is_well_formed() || !second.is_well_formed() {
        return Err(unhandled());
    }

    // Same span, or nested against a shared boundary.
    if first.start == second.start || first.end == second.end {
        return Ok(true);
    }

    // Entirely before, including touching at the boundary.
    if first.end <= second.start {
        return Ok(false);
    }

    // Ends inside second.
    if first.end <= second.end && first.end > second.start {
        return Ok(true);
    }

    // Starts inside second, ends beyond it.
    if first.start >= second.start && first.start < second.end {
        return Ok(true);
    }

    // Entirely after.
    if first.start >= second.end {
        return Ok(false);
    }

    // Encloses second.
    if first.start < second.start && first.end > second.end {
        return Ok(true);
    }

    Err(unhandled())
}
