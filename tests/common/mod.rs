//! Synthetic signal generation shared across the end-to-end scenario tests.

use p25rx::Dibit;

pub const SYNC_PATTERN_DIBITS: [i8; 24] =
    [3, 3, 1, 3, 3, 3, 3, 3, 1, -1, 1, -1, 1, -3, 1, -3, -3, -3, -3, -3, -1, 3, 3, -3];

/// Repeats each dibit's ideal phase `sps` times, producing a stream at a
/// given integer samples-per-symbol.
pub fn ideal_phase_stream(dibits: &[i8], sps: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(dibits.len() * sps);
    for &v in dibits {
        let phase = Dibit::from_value(v).ideal_phase();
        for _ in 0..sps {
            out.push(phase);
        }
    }
    out
}

/// Builds the 33 post-sync dibits (32 NID dibits interleaved with one status
/// dibit at index 11) carrying a BCH-encoded NAC/DUID pair.
pub fn nid_dibits(nac: u16, duid_bits: u8) -> Vec<i8> {
    let info = (nac << 4) | duid_bits as u16;
    let codeword = p25rx::bch::encode(info);
    let mut bits: Vec<bool> = codeword.to_vec();
    bits.push(false);

    let mut dibits = Vec::with_capacity(33);
    let mut chunks = bits.chunks(2);
    for i in 0..33 {
        if i == 11 {
            dibits.push(1i8);
        } else {
            let pair = chunks.next().unwrap();
            dibits.push(match (pair[0], pair[1]) {
                (false, false) => 3,
                (false, true) => 1,
                (true, true) => -1,
                (true, false) => -3,
            });
        }
    }
    dibits
}

/// Builds `total_bits` worth of payload dibits (constant `+3`), interleaving
/// status dibits on the same 70-bit cadence the assembler expects.
pub fn payload_dibits(total_bits: usize) -> Vec<i8> {
    let mut dibits = Vec::new();
    let mut status_counter = 42u32;
    let mut bits_emitted = 0usize;
    while bits_emitted < total_bits {
        status_counter += 2;
        if status_counter == 70 {
            status_counter = 0;
            dibits.push(1);
            continue;
        }
        dibits.push(3);
        bits_emitted += 2;
    }
    dibits
}

/// Same as [`nid_dibits`] but deliberately corrupts `flips` dibits' worth of
/// bits in the BCH codeword (1 bit per flipped dibit) before interleaving the
/// status dibit, for exercising error correction / uncorrectable paths.
pub fn corrupted_nid_dibits(nac: u16, duid_bits: u8, flip_bit_positions: &[usize]) -> Vec<i8> {
    let info = (nac << 4) | duid_bits as u16;
    let mut codeword = p25rx::bch::encode(info).to_vec();
    for &pos in flip_bit_positions {
        codeword[pos] = !codeword[pos];
    }
    let mut bits = codeword;
    bits.push(false);

    let mut dibits = Vec::with_capacity(33);
    let mut chunks = bits.chunks(2);
    for i in 0..33 {
        if i == 11 {
            dibits.push(1i8);
        } else {
            let pair = chunks.next().unwrap();
            dibits.push(match (pair[0], pair[1]) {
                (false, false) => 3,
                (false, true) => 1,
                (true, true) => -1,
                (true, false) => -3,
            });
        }
    }
    dibits
}
