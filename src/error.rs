//! Error types for the symbol processor's configuration surface.
//!
//! Everything that is *not* a configuration error (uncorrectable NID, a full
//! assembler, sync loss) is a normal data-path outcome and never reaches here;
//! see `framer` and `assembler` for how those are surfaced instead.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SymbolProcessorError {
    #[snafu(display(
        "sample rate {sample_rate} Hz is too low; must exceed {min} Hz (2x symbol rate)"
    ))]
    InvalidSampleRate { sample_rate: f64, min: f64 },
}

pub type Result<T, E = SymbolProcessorError> = core::result::Result<T, E>;
