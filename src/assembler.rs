//! Accumulates payload bits for one in-progress message, skipping the
//! interleaved status dibit every 70 bits and resolving a fuzzy DUID from
//! observed length when the NID that started it was uncorrectable.

use bitvec::prelude::*;
use tracing::warn;

use crate::constants::{ASSEMBLER_INITIAL_STATUS_COUNTER, STATUS_DIBIT_BIT_INTERVAL};
use crate::dibit::Dibit;
use crate::duid::{Duid, MAX_PAYLOAD_BITS};

pub struct MessageAssembler {
    nac: u16,
    duid: Duid,
    valid_nid: bool,
    bit_buffer: BitVec<u8, Msb0>,
    written: usize,
    bits_processed_count: u32,
    status_symbol_bit_counter: u32,
}

impl MessageAssembler {
    pub fn new(nac: u16, duid: Duid, valid_nid: bool) -> Self {
        MessageAssembler {
            nac,
            duid,
            valid_nid,
            bit_buffer: BitVec::repeat(false, MAX_PAYLOAD_BITS),
            written: 0,
            bits_processed_count: 0,
            status_symbol_bit_counter: ASSEMBLER_INITIAL_STATUS_COUNTER,
        }
    }

    pub fn nac(&self) -> u16 {
        self.nac
    }

    pub fn duid(&self) -> Duid {
        self.duid
    }

    pub fn valid_nid(&self) -> bool {
        self.valid_nid
    }

    /// Appends one symbol's worth of payload, skipping it if it lands on the
    /// interleaved status dibit.
    pub fn receive(&mut self, dibit: Dibit) {
        self.bits_processed_count += 2;
        self.status_symbol_bit_counter += 2;

        if self.status_symbol_bit_counter == STATUS_DIBIT_BIT_INTERVAL {
            self.status_symbol_bit_counter = 0;
            return;
        }

        let capacity = self.duid.payload_bits();
        if self.written + 2 > capacity {
            warn!(nac = self.nac, duid = ?self.duid, "assembler buffer full, dropping dibit");
            return;
        }
        let (b1, b2) = dibit.bits();
        self.bit_buffer.set(self.written, b1);
        self.bit_buffer.set(self.written + 1, b2);
        self.written += 2;
    }

    pub fn is_complete(&self) -> bool {
        self.bits_processed_count as usize >= self.duid.payload_bits()
    }

    /// Resolves a `Placeholder` DUID (the NID that opened this assembler was
    /// uncorrectable) from the number of bits actually collected, walking a
    /// length ladder keyed to each DUID's nominal payload size.
    pub fn force_completion(&mut self, previous_duid: Duid) {
        let bits = self.written;
        self.duid = if bits <= 144 {
            Duid::Tdu
        } else if bits <= 288 {
            Duid::Tdu
        } else if bits == 360 {
            Duid::Tsbk1
        } else if bits <= 434 {
            Duid::Tdulc
        } else if bits == 576 {
            Duid::Tsbk2
        } else if bits == 720 {
            Duid::Tsbk3
        } else if bits <= 792 {
            Duid::Hdu
        } else if bits <= 1728 {
            if previous_duid == Duid::Ldu1 {
                Duid::Ldu2
            } else {
                Duid::Ldu1
            }
        } else {
            Duid::Tdu
        };
    }

    /// Downgrades a `Tsbk3` working DUID (assigned pessimistically when a
    /// valid NID decoded as `Tsbk1`, the generic trunking block marker) based
    /// on the number of bits actually observed before the next sync.
    pub fn downgrade_tsbk3(&mut self) {
        debug_assert_eq!(self.duid, Duid::Tsbk3);
        let bits = self.written;
        self.duid = if bits < 248 {
            Duid::Tsbk1
        } else if bits < 464 {
            Duid::Tsbk2
        } else {
            Duid::Tsbk3
        };
    }

    /// Consumes the assembler, producing its final DUID, NAC, validity, bit
    /// content, and the authoritative bit count (its resolved DUID's nominal
    /// payload length, not however many bits actually arrived).
    pub fn into_parts(self) -> (u16, Duid, bool, BitVec<u8, Msb0>, usize) {
        let bit_count = self.duid.payload_bits();
        let mut bits = self.bit_buffer;
        bits.truncate(bit_count);
        (self.nac, self.duid, self.valid_nid, bits, bit_count)
    }
}
