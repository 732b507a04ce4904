//! Core sample-to-message pipeline for an APCO P25 Phase 1 receiver: soft
//! symbol timing, frame sync, BCH(63,16) NID decoding, and message framing.
//!
//! The entry point is [`symbol_processor::SymbolProcessor`]: feed it phase
//! samples via `receive`, get back [`message::Message`] values through an
//! inline callback.

pub mod assembler;
pub mod bch;
pub mod byte_assembler;
pub mod constants;
pub mod correlator;
pub mod dibit;
pub mod duid;
pub mod error;
pub mod framer;
pub mod message;
pub mod nid;
pub mod soft_symbol;
pub mod symbol_processor;
pub mod tracing_init;

pub use dibit::Dibit;
pub use duid::Duid;
pub use error::{Result, SymbolProcessorError};
pub use message::{Message, Protocol};
pub use symbol_processor::SymbolProcessor;
