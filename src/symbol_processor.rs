//! The soft-symbol buffer, timing loop, and sync optimizer: the heart of the
//! pipeline, turning a stream of phase samples into decided dibits and
//! driving sync acquisition, NID decode, and the message framer.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::byte_assembler::ByteAssembler;
use crate::constants::{
    BUFFER_PROTECTED_REGION_DIBITS, BUFFER_WORKSPACE_DIBITS, LOCKED_ADJUSTMENT_CLAMP,
    MAX_SYMBOLS_FOR_FINE_SYNC, MIN_SAMPLE_RATE, NID_DIBIT_LENGTH, NID_TRIGGER_SYMBOLS_SINCE_SYNC,
    SYNC_SCORE_ACCEPT_THRESHOLD, SYNC_SCORE_OPTIMIZE_THRESHOLD, SYMBOL_RATE,
    TIMING_UPDATE_GAIN, TIMING_UPDATE_MAX_SYMBOLS, TIMING_UPDATE_MIN_SYMBOLS,
};
use crate::correlator;
use crate::dibit::Dibit;
use crate::duid::Duid;
use crate::error::{InvalidSampleRateSnafu, Result, SymbolProcessorError};
use crate::framer::MessageFramer;
use crate::message::Message;
use crate::nid::{self, NidOutcome};
use crate::soft_symbol::interpolate_phase;
use snafu::ensure;

/// Splits a float offset into a non-negative integer part and a fractional
/// remainder in `[0, 1)`. Negative offsets (possible transiently from a
/// lagging correlator's `additional_offset`) clamp the integer part to zero
/// rather than panicking on an out-of-range index; callers treat a clamp as
/// just another low-scoring candidate.
fn split(offset: f64) -> (usize, f64) {
    let p = offset.floor();
    let frac = offset - p;
    (p.max(0.0) as usize, frac)
}

pub struct SymbolProcessor {
    sample_rate: f64,
    observed_samples_per_symbol: f64,

    buffer: Vec<f64>,
    protected_samples: usize,
    workspace_samples: usize,
    load_pointer: usize,
    read_integer: usize,
    sample_point: f64,

    delay_line: VecDeque<Dibit>,
    byte_assembler: ByteAssembler,

    symbols_since_last_sync: u32,
    previous_message_symbol_length: u32,
    sync_lock: bool,
    previous_nac: u16,

    framer: MessageFramer,

    batch_timestamp: f64,
    samples_consumed_in_batch: usize,
}

impl SymbolProcessor {
    pub fn new(sample_rate: f64) -> Result<Self> {
        let mut processor = SymbolProcessor {
            sample_rate: 0.0,
            observed_samples_per_symbol: 0.0,
            buffer: Vec::new(),
            protected_samples: 0,
            workspace_samples: 0,
            load_pointer: 0,
            read_integer: 0,
            sample_point: 0.0,
            delay_line: VecDeque::with_capacity(NID_DIBIT_LENGTH),
            byte_assembler: ByteAssembler::new(),
            symbols_since_last_sync: 0,
            previous_message_symbol_length: 0,
            sync_lock: false,
            previous_nac: 0,
            framer: MessageFramer::new(),
            batch_timestamp: 0.0,
            samples_consumed_in_batch: 0,
        };
        processor.set_sample_rate(sample_rate)?;
        Ok(processor)
    }

    /// Changes the input sample rate, resetting all timing and buffer state.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        ensure!(
            sample_rate > MIN_SAMPLE_RATE,
            InvalidSampleRateSnafu { sample_rate, min: MIN_SAMPLE_RATE }
        );

        let sps = sample_rate / SYMBOL_RATE;
        let protected_samples = (BUFFER_PROTECTED_REGION_DIBITS as f64 * sps).ceil() as usize;
        let workspace_samples = (BUFFER_WORKSPACE_DIBITS as f64 * sps).ceil() as usize;

        self.sample_rate = sample_rate;
        self.observed_samples_per_symbol = sps;
        self.protected_samples = protected_samples;
        self.workspace_samples = workspace_samples;
        self.buffer = vec![0.0; protected_samples + workspace_samples];
        self.load_pointer = 0;
        self.read_integer = 0;
        self.sample_point = 0.0;
        self.delay_line.clear();
        self.byte_assembler = ByteAssembler::new();
        self.symbols_since_last_sync = 0;
        self.previous_message_symbol_length = 0;
        self.sync_lock = false;
        self.previous_nac = 0;
        self.framer = MessageFramer::new();

        debug!(sample_rate, sps, "sample rate configured");
        Ok(())
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn sync_lock(&self) -> bool {
        self.sync_lock
    }

    /// Drains bytes packed from dibits evicted off the back of the delay
    /// line, for optional raw-bitstream recording.
    pub fn drain_raw_bitstream(&mut self) -> Vec<u8> {
        self.byte_assembler.drain()
    }

    /// Feeds a batch of phase samples (radians) through the pipeline,
    /// invoking `on_message` inline for each message produced.
    pub fn receive(&mut self, samples: &[f64], timestamp: f64, on_message: &mut impl FnMut(Message)) {
        self.batch_timestamp = timestamp;
        self.samples_consumed_in_batch = 0;

        for &sample in samples {
            self.push_sample(sample);
            self.samples_consumed_in_batch += 1;

            while self.read_integer + 1 < self.load_pointer {
                let a = self.buffer[self.read_integer];
                let b = self.buffer[self.read_integer + 1];
                let phase = interpolate_phase(a, b, self.sample_point);

                let current_timestamp = self.current_timestamp();
                self.process_symbol(phase, current_timestamp, on_message);

                self.sample_point += self.observed_samples_per_symbol;
                let carry = self.sample_point.floor();
                self.read_integer += carry as usize;
                self.sample_point -= carry;
                debug_assert!((0.0..1.0).contains(&self.sample_point));

                if self.read_integer + 1 >= self.load_pointer {
                    break;
                }
            }
        }
    }

    fn current_timestamp(&self) -> f64 {
        self.batch_timestamp + self.samples_consumed_in_batch as f64 / self.sample_rate
    }

    fn push_sample(&mut self, sample: f64) {
        if self.load_pointer >= self.buffer.len() {
            let keep_from = self.load_pointer.saturating_sub(self.protected_samples);
            self.buffer.copy_within(keep_from..self.load_pointer, 0);
            let removed = keep_from;
            self.load_pointer -= removed;
            self.read_integer = self.read_integer.saturating_sub(removed);
            trace!(removed, "soft-symbol buffer compacted");
        }
        self.buffer[self.load_pointer] = sample;
        self.load_pointer += 1;
    }

    fn process_symbol(&mut self, phase: f64, timestamp: f64, on_message: &mut impl FnMut(Message)) {
        let dibit = Dibit::from_phase(phase);

        self.framer.receive(dibit, timestamp, on_message);

        self.delay_line.push_back(dibit);
        if self.delay_line.len() > NID_DIBIT_LENGTH {
            if let Some(evicted) = self.delay_line.pop_front() {
                self.byte_assembler.push(evicted);
            }
        }

        let sps = self.observed_samples_per_symbol;
        let lag1_offset = sps / 3.0;
        let lag2_offset = 2.0 * sps / 3.0;

        let primary_score = self.correlator_score(0.0);
        let lag1_score = self.correlator_score(-lag1_offset);
        let lag2_score = self.correlator_score(-lag2_offset);

        let accepted = if self.sync_lock
            && primary_score > SYNC_SCORE_ACCEPT_THRESHOLD
            && self.optimize(0.0)
        {
            true
        } else if lag1_score > primary_score
            && primary_score > lag2_score
            && lag1_score > SYNC_SCORE_ACCEPT_THRESHOLD
            && self.symbols_since_last_sync > 1
            && self.optimize(-lag1_offset)
        {
            true
        } else if lag2_score > primary_score
            && lag2_score > SYNC_SCORE_ACCEPT_THRESHOLD
            && self.optimize(-lag2_offset)
        {
            true
        } else {
            primary_score > SYNC_SCORE_ACCEPT_THRESHOLD && self.optimize(0.0)
        };

        if accepted {
            self.previous_message_symbol_length = self.symbols_since_last_sync;
            self.symbols_since_last_sync = 0;
        } else {
            self.symbols_since_last_sync = self.symbols_since_last_sync.saturating_add(1);
            if self.symbols_since_last_sync > MAX_SYMBOLS_FOR_FINE_SYNC {
                if self.sync_lock {
                    debug!("sync lock lost: no sync within max symbols");
                }
                self.sync_lock = false;
            }
        }

        if self.symbols_since_last_sync as usize == NID_TRIGGER_SYMBOLS_SINCE_SYNC {
            self.run_nid_decode(timestamp, on_message);
        }
    }

    fn correlator_score(&self, additional_offset: f64) -> f64 {
        let sps = self.observed_samples_per_symbol;
        let total = self.read_integer as f64 + self.sample_point + additional_offset - 23.0 * sps;
        let (p, frac) = split(total);
        correlator::score(&self.buffer, p, frac, sps)
    }

    /// Refines the sample offset around a provisional sync acceptance and
    /// rejects weak correlations.
    fn optimize(&mut self, additional_offset: f64) -> bool {
        let sps = self.observed_samples_per_symbol;
        let base = self.read_integer as f64 + self.sample_point + additional_offset - 23.0 * sps;

        let (mut p, mut frac) = split(base);
        let mut center_score = correlator::score(&self.buffer, p, frac, sps);
        let mut step = if self.sync_lock { sps / 40.0 } else { sps / 10.0 };

        loop {
            let current = p as f64 + frac;
            let (left_p, left_frac) = split(current - step);
            let (right_p, right_frac) = split(current + step);
            let left_score = correlator::score(&self.buffer, left_p, left_frac, sps);
            let right_score = correlator::score(&self.buffer, right_p, right_frac, sps);

            if left_score > center_score && left_score >= right_score {
                p = left_p;
                frac = left_frac;
                center_score = left_score;
            } else if right_score > center_score && right_score > left_score {
                p = right_p;
                frac = right_frac;
                center_score = right_score;
            } else {
                step /= 2.0;
            }

            let adjustment = (p as f64 + frac) - base;
            if step <= 0.03 || adjustment.abs() > sps / 2.0 {
                break;
            }
        }

        if center_score < SYNC_SCORE_OPTIMIZE_THRESHOLD {
            return false;
        }

        let mut adjustment = (p as f64 + frac) - base;
        if self.sync_lock {
            adjustment = adjustment.clamp(-LOCKED_ADJUSTMENT_CLAMP, LOCKED_ADJUSTMENT_CLAMP);
        }

        let new_total = self.read_integer as f64 + self.sample_point + adjustment;
        let (new_p, new_frac) = split(new_total);
        self.read_integer = new_p;
        self.sample_point = new_frac;

        if self.sync_lock
            && adjustment.abs() < 0.5
            && (TIMING_UPDATE_MIN_SYMBOLS..=TIMING_UPDATE_MAX_SYMBOLS)
                .contains(&self.symbols_since_last_sync)
        {
            let drift = (adjustment / self.symbols_since_last_sync as f64) * TIMING_UPDATE_GAIN;
            self.observed_samples_per_symbol += drift;
            trace!(drift, sps = self.observed_samples_per_symbol, "timing drift updated");
        }

        true
    }

    fn run_nid_decode(&mut self, timestamp: f64, on_message: &mut impl FnMut(Message)) {
        if self.delay_line.len() < NID_DIBIT_LENGTH {
            return;
        }
        let mut snapshot = [Dibit::Plus1; NID_DIBIT_LENGTH];
        for (slot, d) in snapshot.iter_mut().zip(self.delay_line.iter()) {
            *slot = *d;
        }

        match nid::decode_nid(&snapshot) {
            NidOutcome::Valid { nac, duid } => {
                self.sync_lock = true;
                self.previous_nac = nac;
                self.framer.sync_detected(nac, duid, true, timestamp, on_message);
            }
            NidOutcome::Invalid => {
                warn!(nac = self.previous_nac, "uncorrectable NID");
                self.framer.sync_detected(self.previous_nac, Duid::Placeholder, false, timestamp, on_message);
            }
        }
    }
}
