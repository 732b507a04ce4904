//! NID (Network Identifier) extraction: pulls the 64-bit NID out of the
//! 57-dibit post-sync delay line, runs it through the BCH(63,16) decoder, and
//! resolves NAC/DUID.

use crate::bch;
use crate::constants::{BCH_N, NID_DIBIT_LENGTH, SYNC_DIBIT_LENGTH};
use crate::dibit::Dibit;
use crate::duid::Duid;

/// Dibit index, within the 57-slot delay line, of the status symbol
/// interleaved mid-NID. Derived from the assembler's `status_symbol_bit_counter`
/// starting value of 42: the status dibit falls 42 payload bits before the
/// end of the sync+NID window, i.e. at absolute bit offset 70 from the start
/// of sync, which is dibit index 35 (`70 / 2`).
const STATUS_DIBIT_DELAY_LINE_INDEX: usize = 35;

/// Number of information bits carried by a decoded NID: 12-bit NAC + 4-bit DUID.
const NAC_BITS: usize = 12;
const DUID_BITS: usize = 4;

/// Outcome of decoding one NID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NidOutcome {
    /// BCH decode succeeded (or the NID had no errors to begin with).
    Valid { nac: u16, duid: Duid },
    /// BCH decode failed; the caller should keep using the previously known
    /// NAC and fall back to `Duid::Placeholder`.
    Invalid,
}

/// Extracts the 64 raw NID bits from the 57-dibit delay line, skipping the
/// interleaved status dibit, and splits them into the 63-bit BCH input and
/// the one extra (unused) parity bit.
fn extract_nid_bits(delay_line: &[Dibit; NID_DIBIT_LENGTH]) -> ([bool; BCH_N], bool) {
    let mut bits = Vec::with_capacity(64);
    for (i, &d) in delay_line.iter().enumerate().skip(SYNC_DIBIT_LENGTH) {
        if i == STATUS_DIBIT_DELAY_LINE_INDEX {
            continue;
        }
        let (b1, b2) = d.bits();
        bits.push(b1);
        bits.push(b2);
    }
    debug_assert_eq!(bits.len(), 64);

    let mut bch_input = [false; BCH_N];
    bch_input.copy_from_slice(&bits[..BCH_N]);
    (bch_input, bits[BCH_N])
}

/// Decodes the NID carried in a freshly filled 57-dibit delay line.
///
/// The information bits recovered from the BCH codeword are laid out
/// MSB-first as `NAC(12 bits) || DUID(4 bits)`.
pub fn decode_nid(delay_line: &[Dibit; NID_DIBIT_LENGTH]) -> NidOutcome {
    let (bch_input, _extra_parity_bit) = extract_nid_bits(delay_line);
    let (corrected, irrecoverable) = bch::decode(&bch_input);
    if irrecoverable {
        return NidOutcome::Invalid;
    }

    let info = bch::information_bits(&corrected);
    let nac = (info >> DUID_BITS) & ((1 << NAC_BITS) - 1);
    let duid_bits = (info & ((1 << DUID_BITS) - 1)) as u8;
    NidOutcome::Valid { nac, duid: Duid::from_bits(duid_bits) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bch as bch_mod;

    fn delay_line_for(nac: u16, duid_bits: u8, sync_dibits: [Dibit; SYNC_DIBIT_LENGTH]) -> [Dibit; NID_DIBIT_LENGTH] {
        let info = (nac << DUID_BITS) | duid_bits as u16;
        let codeword = bch_mod::encode(info);

        let mut bits = Vec::with_capacity(66);
        bits.extend_from_slice(&codeword);
        bits.push(false); // extra parity bit, unused

        let mut dibits = Vec::with_capacity(33);
        let mut bit_iter = bits.chunks(2);
        for i in 0..33 {
            if i == STATUS_DIBIT_DELAY_LINE_INDEX - SYNC_DIBIT_LENGTH {
                dibits.push(Dibit::Plus1); // arbitrary status dibit value
            } else {
                let pair = bit_iter.next().unwrap();
                dibits.push(dibit_from_bits(pair[0], pair[1]));
            }
        }

        let mut delay_line = [Dibit::Plus1; NID_DIBIT_LENGTH];
        delay_line[..SYNC_DIBIT_LENGTH].copy_from_slice(&sync_dibits);
        delay_line[SYNC_DIBIT_LENGTH..].copy_from_slice(&dibits);
        delay_line
    }

    fn dibit_from_bits(b1: bool, b2: bool) -> Dibit {
        match (b1, b2) {
            (false, false) => Dibit::Plus3,
            (false, true) => Dibit::Plus1,
            (true, true) => Dibit::Minus1,
            (true, false) => Dibit::Minus3,
        }
    }

    #[test]
    fn decodes_clean_nid() {
        let sync = [Dibit::Plus3; SYNC_DIBIT_LENGTH];
        let delay_line = delay_line_for(0x123, 0, sync);
        match decode_nid(&delay_line) {
            NidOutcome::Valid { nac, duid } => {
                assert_eq!(nac, 0x123);
                assert_eq!(duid, Duid::Hdu);
            }
            NidOutcome::Invalid => panic!("expected a valid NID"),
        }
    }

    #[test]
    fn corrects_bit_errors_within_t() {
        let sync = [Dibit::Plus3; SYNC_DIBIT_LENGTH];
        let mut delay_line = delay_line_for(0x456, 10, sync);
        // Flip a couple of NID dibits (well within BCH_T=11 bit-error budget).
        delay_line[SYNC_DIBIT_LENGTH] = Dibit::from_value(-delay_line[SYNC_DIBIT_LENGTH].value());
        match decode_nid(&delay_line) {
            NidOutcome::Valid { nac, duid } => {
                assert_eq!(nac, 0x456);
                assert_eq!(duid, Duid::Ldu2);
            }
            NidOutcome::Invalid => panic!("expected recoverable NID"),
        }
    }

    #[test]
    fn heavily_corrupted_nid_is_invalid() {
        let sync = [Dibit::Plus3; SYNC_DIBIT_LENGTH];
        let mut delay_line = delay_line_for(0x789, 5, sync);
        for i in SYNC_DIBIT_LENGTH..(SYNC_DIBIT_LENGTH + 16) {
            delay_line[i] = Dibit::from_value(-delay_line[i].value());
        }
        assert_eq!(decode_nid(&delay_line), NidOutcome::Invalid);
    }
}
