//! Sync correlation: a sliding dot-product between the soft-symbol buffer
//! and the 24-symbol sync pattern.
//!
//! Deliberately a free function rather than a correlator type with its own
//! state: the symbol processor owns three independent phase offsets
//! (primary, lag1, lag2) and calls this once per offset.

use crate::constants::sync_pattern_phases;
use crate::soft_symbol::{clamp_for_correlation, interpolate_phase};

/// Correlates the sync pattern starting at `(integer_p, fractional)` in
/// `buffer`, advancing by `sps` samples per symbol across all 24 taps.
///
/// Returns 0.0 (minimum possible score) if the window runs past the end of
/// the buffer, rather than panicking: callers query this continuously as
/// samples stream in, including near the buffer's live edge.
pub fn score(buffer: &[f64], integer_p: usize, fractional: f64, sps: f64) -> f64 {
    let pattern = sync_pattern_phases();
    let mut p = integer_p;
    let mut frac = fractional;
    let mut total = 0.0;

    for &target in &pattern {
        if p + 1 >= buffer.len() {
            return 0.0;
        }
        let interp = interpolate_phase(buffer[p], buffer[p + 1], frac);
        total += clamp_for_correlation(interp) * target;

        frac += sps;
        let carry = frac.floor();
        p += carry as usize;
        frac -= carry;
    }

    total
}
