//! Fixed constants for the P25 Phase 1 symbol/NID/framer pipeline.
//!
//! These mirror the magic numbers that drive buffer sizing, the 24-dibit sync
//! pattern, NID/BCH geometry, and the cadences that govern sync loss and
//! status-dibit skipping.

use core::f64::consts::PI;

/// Nominal symbol rate for P25 Phase 1 (baud).
pub const SYMBOL_RATE: f64 = 4800.0;

/// Dibits making up the 24-dibit (48-bit) frame sync pattern, transmitted
/// MSB-first, values in {+1, +3, -1, -3}.
pub const SYNC_PATTERN_DIBITS: [i8; 24] = [
    3, 3, 1, 3, 3, 3, 3, 3, 1, -1, 1, -1, 1, -3, 1, -3, -3, -3, -3, -3, -1, 3, 3, -3,
];

/// Length of the sync pattern in dibits.
pub const SYNC_DIBIT_LENGTH: usize = 24;

/// Ideal phase, in radians, for the symbol with dibit value `+1`.
pub const PHASE_PLUS1: f64 = PI / 4.0;
/// Ideal phase, in radians, for the symbol with dibit value `+3`.
pub const PHASE_PLUS3: f64 = 3.0 * PI / 4.0;
/// Ideal phase, in radians, for the symbol with dibit value `-1`.
pub const PHASE_MINUS1: f64 = -PI / 4.0;
/// Ideal phase, in radians, for the symbol with dibit value `-3`.
pub const PHASE_MINUS3: f64 = -3.0 * PI / 4.0;

/// Maps a dibit value in {+1, +3, -1, -3} to its ideal phase in radians.
pub fn dibit_value_to_phase(value: i8) -> f64 {
    match value {
        1 => PHASE_PLUS1,
        3 => PHASE_PLUS3,
        -1 => PHASE_MINUS1,
        -3 => PHASE_MINUS3,
        _ => panic!("invalid dibit value {value}"),
    }
}

/// Sync pattern expressed as ideal phases, one per symbol.
pub fn sync_pattern_phases() -> [f64; SYNC_DIBIT_LENGTH] {
    let mut phases = [0.0; SYNC_DIBIT_LENGTH];
    for (i, &v) in SYNC_PATTERN_DIBITS.iter().enumerate() {
        phases[i] = dibit_value_to_phase(v);
    }
    phases
}

/// Number of dibits of "protected" history retained in the soft-symbol buffer.
pub const BUFFER_PROTECTED_REGION_DIBITS: usize = 26;

/// Number of dibits of workspace appended before a compaction shift.
pub const BUFFER_WORKSPACE_DIBITS: usize = 25;

/// Dibits held in the delay line after a sync is accepted: the 24-dibit sync
/// pattern plus the 33 dibits that follow it (32 NID dibits + 1 interleaved
/// status dibit).
pub const NID_DIBIT_LENGTH: usize = 57;

/// Number of dibits following sync acceptance, counting from dibit 0 of sync,
/// at which NID processing is triggered (`NID_DIBIT_LENGTH - SYNC_DIBIT_LENGTH`).
pub const NID_TRIGGER_SYMBOLS_SINCE_SYNC: usize = NID_DIBIT_LENGTH - SYNC_DIBIT_LENGTH;

/// BCH(63,16,23) codeword length in bits.
pub const BCH_N: usize = 63;
/// BCH(63,16,23) information length in bits.
pub const BCH_K: usize = 16;
/// BCH(63,16,23) error-correction capability (t).
pub const BCH_T: usize = 11;

/// Total NID length in bits (63-bit BCH codeword plus one extra parity bit).
pub const NID_BIT_LENGTH: usize = 64;

/// Coarse acceptance threshold for the three sync correlators.
pub const SYNC_SCORE_ACCEPT_THRESHOLD: f64 = 65.0;

/// Final acceptance threshold after ternary-search optimization.
pub const SYNC_SCORE_OPTIMIZE_THRESHOLD: f64 = 95.0;

/// Symbol count after which sync lock is declared lost if no sync arrives.
pub const MAX_SYMBOLS_FOR_FINE_SYNC: u32 = 890;

/// Lower bound (inclusive) on the window, in symbols since last sync, during
/// which a successful optimizer adjustment is allowed to update the tracked
/// samples-per-symbol.
pub const TIMING_UPDATE_MIN_SYMBOLS: u32 = 72;
/// Upper bound (inclusive) on that same window.
pub const TIMING_UPDATE_MAX_SYMBOLS: u32 = 890;

/// Fraction of measured per-symbol drift applied to `observed_samples_per_symbol`
/// on each qualifying timing update.
pub const TIMING_UPDATE_GAIN: f64 = 0.2;

/// Clamp applied to a single optimizer adjustment when sync lock is held.
pub const LOCKED_ADJUSTMENT_CLAMP: f64 = 0.5;

/// Number of payload bits between interleaved status dibits.
pub const STATUS_DIBIT_BIT_INTERVAL: u32 = 70;

/// `status_symbol_bit_counter` value an assembler starts with: bits already
/// elapsed, since the last status dibit, by the time sync+NID have been
/// consumed and payload assembly begins.
pub const ASSEMBLER_INITIAL_STATUS_COUNTER: u32 = 42;

/// Dibits per second at the nominal P25 Phase 1 baud rate; one "second" of
/// idle time for sync-loss bookkeeping.
pub const DIBITS_PER_SECOND: u32 = 4800;

/// Dibits representing sync (48 bits) + NID (64 bits) + 2 status dibits +
/// the one dibit already elapsed when a sync event fires, subtracted from the
/// idle counter on `sync_detected`.
pub const SYNC_DETECTED_IDLE_DIBIT_CREDIT: u32 = 116;

/// Minimum valid sample rate accepted by `set_sample_rate` (`sr > 2 * 4800`).
pub const MIN_SAMPLE_RATE: f64 = 2.0 * SYMBOL_RATE;
