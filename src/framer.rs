//! Glues sync events to assembler lifecycle and emits sync-loss messages
//! when a full second passes with no sync lock.

use tracing::{debug, trace};

use crate::assembler::MessageAssembler;
use crate::constants::{DIBITS_PER_SECOND, SYNC_DETECTED_IDLE_DIBIT_CREDIT};
use crate::dibit::Dibit;
use crate::duid::Duid;
use crate::message::{Message, Protocol};

pub struct MessageFramer {
    assembler: Option<MessageAssembler>,
    previous_duid: Duid,
    idle_dibit_counter: u32,
    running: bool,
}

impl Default for MessageFramer {
    fn default() -> Self {
        MessageFramer {
            assembler: None,
            previous_duid: Duid::Unknown,
            idle_dibit_counter: 0,
            running: true,
        }
    }
}

impl MessageFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advisory stop: the caller may keep pumping `receive`, but should wind
    /// down after the current buffer.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feeds one dibit of payload (or idle) flow.
    pub fn receive(&mut self, dibit: Dibit, timestamp: f64, emit: &mut impl FnMut(Message)) {
        if let Some(assembler) = self.assembler.as_mut() {
            assembler.receive(dibit);
            if assembler.is_complete() {
                let assembler = self.assembler.take().unwrap();
                self.complete(assembler, timestamp, emit);
            }
        } else {
            self.idle_dibit_counter += 1;
            if self.idle_dibit_counter >= DIBITS_PER_SECOND {
                self.idle_dibit_counter -= DIBITS_PER_SECOND;
                emit(Message::SyncLoss {
                    timestamp,
                    bit_count: DIBITS_PER_SECOND * 2,
                    protocol: Protocol::Apco25,
                });
            }
        }
    }

    /// Notifies the framer that a sync pattern was accepted and its NID
    /// decoded (possibly unsuccessfully).
    pub fn sync_detected(
        &mut self,
        nac: u16,
        duid: Duid,
        valid_nid: bool,
        timestamp: f64,
        emit: &mut impl FnMut(Message),
    ) {
        if self.idle_dibit_counter >= SYNC_DETECTED_IDLE_DIBIT_CREDIT {
            let remaining = self.idle_dibit_counter - SYNC_DETECTED_IDLE_DIBIT_CREDIT;
            if remaining > 0 {
                emit(Message::SyncLoss {
                    timestamp,
                    bit_count: remaining * 2,
                    protocol: Protocol::Apco25,
                });
            }
        }
        self.idle_dibit_counter = 0;

        if let Some(assembler) = self.assembler.take() {
            self.complete(assembler, timestamp, emit);
        }

        let mut duid = duid;
        if !duid.is_valid_primary() && duid != Duid::Placeholder {
            duid = Duid::Placeholder;
        }
        if duid == Duid::Tsbk1 {
            // Trunking single-block NID: start pessimistically at the
            // longest TSBK variant and downgrade once the real length is
            // observed.
            duid = Duid::Tsbk3;
        }

        trace!(nac, ?duid, valid_nid, "starting assembler");
        self.assembler = Some(MessageAssembler::new(nac, duid, valid_nid));
    }

    fn complete(&mut self, mut assembler: MessageAssembler, timestamp: f64, emit: &mut impl FnMut(Message)) {
        if assembler.duid() == Duid::Placeholder {
            assembler.force_completion(self.previous_duid);
        } else if assembler.duid() == Duid::Tsbk3 {
            assembler.downgrade_tsbk3();
        }

        self.previous_duid = assembler.duid();
        let (nac, duid, valid_nid, bits, bit_count) = assembler.into_parts();
        debug!(nac, ?duid, valid_nid, bit_count, "message complete");
        emit(Message::FramedPayload { nac, duid, valid_nid, bits, bit_count, timestamp });
    }
}
