//! P25 Phase 1 receiver CLI.
//!
//! **Usage**:
//! ```bash
//! cargo run --bin p25rx -- input.wav
//! ```
//!
//! Reads a mono WAV file and runs it through the symbol processor, printing
//! each framed message and sync-loss event as it is produced.
//!
//! The WAV file is expected to already carry demodulated phase samples
//! (radians, one per symbol-rate-multiple sample) rather than raw RF or
//! audio content: the DQPSK discriminator and baseband filter that would sit
//! upstream of this pipeline are out-of-scope collaborators. `read_phase_wav`
//! below is a placeholder that treats normalized PCM amplitude as phase; a
//! real deployment replaces it with an actual discriminator.

use std::env;
use std::process::ExitCode;

use p25rx::message::{Message, Protocol};
use p25rx::tracing_init::init_tracing;
use p25rx::SymbolProcessor;
use tracing::info;

fn read_phase_wav(path: &str) -> Result<(Vec<f64>, u32), String> {
    let mut reader = hound::WavReader::open(path).map_err(|e| format!("failed to open '{path}': {e}"))?;
    let spec = reader.spec();

    let samples: Result<Vec<f64>, _> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| std::f64::consts::PI * (v as f64 / max)))
                .collect()
        }
        hound::SampleFormat::Float => {
            reader.samples::<f32>().map(|s| s.map(|v| std::f64::consts::PI * v as f64)).collect()
        }
    };

    let samples = samples.map_err(|e| format!("failed to read samples from '{path}': {e}"))?;
    Ok((samples, spec.sample_rate))
}

fn run(path: &str) -> Result<(), String> {
    let (samples, sample_rate) = read_phase_wav(path)?;
    info!(path, sample_rate, samples = samples.len(), "loaded WAV file");

    let mut processor = SymbolProcessor::new(sample_rate as f64)
        .map_err(|e| format!("failed to configure symbol processor: {e}"))?;

    let mut message_count = 0usize;
    processor.receive(&samples, 0.0, &mut |message| {
        message_count += 1;
        match message {
            Message::FramedPayload { nac, duid, valid_nid, bit_count, timestamp, .. } => {
                println!(
                    "[{timestamp:.3}s] FramedPayload nac=0x{nac:03x} duid={duid:?} valid_nid={valid_nid} bit_count={bit_count}"
                );
            }
            Message::SyncLoss { timestamp, bit_count, protocol } => {
                let protocol = match protocol {
                    Protocol::Apco25 => "APCO25",
                };
                println!("[{timestamp:.3}s] SyncLoss protocol={protocol} bit_count={bit_count}");
            }
        }
    });

    println!("processed {} samples, emitted {message_count} messages", samples.len());
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let input_path = match args.get(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: {} <input.wav>", args.first().map(String::as_str).unwrap_or("p25rx"));
            return ExitCode::FAILURE;
        }
    };

    match run(input_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
