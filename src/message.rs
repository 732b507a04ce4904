//! Output message types emitted by the message framer.

use bitvec::prelude::*;

use crate::duid::Duid;

/// Protocol tag carried on `SyncLoss` events; there is only one today, but the
/// field exists so downstream consumers can distinguish future protocols
/// sharing the same message bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Apco25,
}

/// One decoded message event emitted by the framer.
#[derive(Debug, Clone)]
pub enum Message {
    /// A complete message payload, delimited by two sync events (or one sync
    /// event and a reached payload length).
    FramedPayload {
        nac: u16,
        duid: Duid,
        valid_nid: bool,
        bits: BitVec<u8, Msb0>,
        bit_count: usize,
        timestamp: f64,
    },
    /// Emitted when no sync has been detected for a full second (4800 dibits)
    /// of dibit flow.
    SyncLoss { timestamp: f64, bit_count: u32, protocol: Protocol },
}
