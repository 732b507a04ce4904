//! BCH(63,16,23) systematic binary cyclic code: the NID's error-correcting
//! layer.
//!
//! Table-driven, not object-oriented: a single `GaloisField` built once from
//! a primitive polynomial over GF(2^6), a generator polynomial derived from
//! it at startup (product of the minimal polynomials of alpha^1..alpha^21,
//! which by the BCH bound guarantees minimum distance >= 23 and thus
//! `t = 11`), and free functions `encode`/`decode` parameterized only by
//! those tables, no inheritance.

use crate::constants::{BCH_K, BCH_N, BCH_T};
use once_cell::sync::Lazy;

const GF_M: usize = 6;
const GF_ORDER: usize = 63; // 2^6 - 1
/// x^6 + x + 1, a primitive polynomial for GF(2^6).
const PRIMITIVE_POLY: u32 = 0b100_0011;

struct GaloisField {
    exp: [u8; 2 * GF_ORDER],
    log: [i16; GF_ORDER + 1],
}

impl GaloisField {
    fn new() -> Self {
        let mut exp = [0u8; 2 * GF_ORDER];
        let mut log = [-1i16; GF_ORDER + 1];
        let mut reg: u32 = 1;
        for i in 0..GF_ORDER {
            exp[i] = reg as u8;
            log[reg as usize] = i as i16;
            reg <<= 1;
            if reg & (1 << GF_M) != 0 {
                reg ^= PRIMITIVE_POLY;
            }
        }
        for i in GF_ORDER..2 * GF_ORDER {
            exp[i] = exp[i - GF_ORDER];
        }
        GaloisField { exp, log }
    }

    fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = self.log[a as usize] as usize + self.log[b as usize] as usize;
        self.exp[sum]
    }

    fn inv(&self, a: u8) -> u8 {
        debug_assert!(a != 0, "zero has no inverse in GF(64)");
        let la = self.log[a as usize] as usize;
        self.exp[(GF_ORDER - la) % GF_ORDER]
    }

    /// `alpha^power`, accepting any (possibly negative) exponent.
    fn alpha_pow(&self, power: i64) -> u8 {
        let m = GF_ORDER as i64;
        let e = ((power % m) + m) % m;
        self.exp[e as usize]
    }

    /// Cyclotomic coset of `s` modulo `GF_ORDER` under doubling: `{s, 2s, 4s, ...}`.
    fn cyclotomic_coset(&self, s: usize) -> Vec<usize> {
        let mut coset = Vec::new();
        let mut x = s % GF_ORDER;
        loop {
            if coset.contains(&x) {
                break;
            }
            coset.push(x);
            x = (x * 2) % GF_ORDER;
        }
        coset
    }

    /// Minimal polynomial of `alpha^s` over GF(2), as a little-endian
    /// coefficient vector (`poly[i]` = coefficient of `x^i`). Coefficients
    /// are guaranteed to collapse to `{0, 1}` since the root set is a full
    /// conjugacy class.
    fn minimal_polynomial(&self, s: usize) -> Vec<u8> {
        let coset = self.cyclotomic_coset(s);
        let mut poly = vec![1u8];
        for j in coset {
            let root = self.alpha_pow(j as i64);
            let mut next = vec![0u8; poly.len() + 1];
            for (i, &c) in poly.iter().enumerate() {
                next[i] ^= self.mul(c, root);
                next[i + 1] ^= c;
            }
            poly = next;
        }
        for &c in &poly {
            debug_assert!(c == 0 || c == 1, "minimal polynomial left GF(2)");
        }
        poly
    }
}

/// GF(2) convolution of two little-endian coefficient vectors.
fn gf2_poly_mul(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] ^= ai & bj;
        }
    }
    out
}

/// Generator polynomial for BCH(63,16,23): product of the minimal
/// polynomials of `alpha^1, alpha^3, ..., alpha^21`, deduplicated by
/// cyclotomic coset. Computed once at startup; degree is `n - k = 47`.
struct Bch {
    gf: GaloisField,
    generator: Vec<u8>, // little-endian, length 48
}

impl Bch {
    fn new() -> Self {
        let gf = GaloisField::new();
        let mut covered = vec![false; GF_ORDER];
        let mut generator = vec![1u8];
        for s in (1..=2 * BCH_T).step_by(2) {
            if covered[s % GF_ORDER] {
                continue;
            }
            for &c in &gf.cyclotomic_coset(s) {
                covered[c] = true;
            }
            let m = gf.minimal_polynomial(s);
            generator = gf2_poly_mul(&generator, &m);
        }
        debug_assert_eq!(generator.len() - 1, BCH_N - BCH_K, "generator degree must be n-k");
        Bch { gf, generator }
    }

    fn generator_msb_first(&self) -> Vec<bool> {
        let deg = self.generator.len() - 1;
        (0..=deg).map(|j| self.generator[deg - j] != 0).collect()
    }
}

static BCH: Lazy<Bch> = Lazy::new(Bch::new);

/// Binary long division: `dividend_bits` and `generator_bits` are MSB-first;
/// returns the remainder, `generator_bits.len() - 1` bits long, MSB-first.
fn poly_mod(dividend_bits: &[bool], generator_bits: &[bool]) -> Vec<bool> {
    let r = generator_bits.len() - 1;
    let mut reg = dividend_bits.to_vec();
    for i in 0..(reg.len() - r) {
        if reg[i] {
            for (j, &g) in generator_bits.iter().enumerate() {
                reg[i + j] ^= g;
            }
        }
    }
    reg[reg.len() - r..].to_vec()
}

/// Systematically encodes 16 information bits (MSB-first, bit 0 = most
/// significant) into a 63-bit codeword (MSB-first).
pub fn encode(info: u16) -> [bool; BCH_N] {
    let mut dividend = vec![false; BCH_N];
    for i in 0..BCH_K {
        dividend[i] = (info >> (BCH_K - 1 - i)) & 1 == 1;
    }
    let remainder = poly_mod(&dividend, &BCH.generator_msb_first());
    let mut codeword = [false; BCH_N];
    codeword[..BCH_K].copy_from_slice(&dividend[..BCH_K]);
    codeword[BCH_K..].copy_from_slice(&remainder);
    codeword
}

fn syndrome(received: &[bool; BCH_N], j: i64) -> u8 {
    let mut acc = 0u8;
    for d in 0..BCH_N {
        if received[BCH_N - 1 - d] {
            acc ^= BCH.gf.alpha_pow(j * d as i64);
        }
    }
    acc
}

/// Berlekamp-Massey over GF(64): recovers the error-locator polynomial
/// (little-endian, `sigma[0] == 1`) from syndromes `s[0] == S_1 .. s[2t-1] == S_2t`.
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let n2t = syndromes.len();
    let mut c = vec![0u8; n2t + 1];
    let mut b = vec![0u8; n2t + 1];
    c[0] = 1;
    b[0] = 1;
    let mut l = 0usize;
    let mut m = 1usize;
    let mut last_discrepancy = 1u8;

    for n in 0..n2t {
        let mut d = syndromes[n];
        for i in 1..=l {
            d ^= BCH.gf.mul(c[i], syndromes[n - i]);
        }
        if d == 0 {
            m += 1;
        } else if 2 * l <= n {
            let t_poly = c.clone();
            let coef = BCH.gf.mul(d, BCH.gf.inv(last_discrepancy));
            for i in 0..c.len() {
                if i >= m && i - m < b.len() {
                    c[i] ^= BCH.gf.mul(coef, b[i - m]);
                }
            }
            l = n + 1 - l;
            b = t_poly;
            last_discrepancy = d;
            m = 1;
        } else {
            let coef = BCH.gf.mul(d, BCH.gf.inv(last_discrepancy));
            for i in 0..c.len() {
                if i >= m && i - m < b.len() {
                    c[i] ^= BCH.gf.mul(coef, b[i - m]);
                }
            }
            m += 1;
        }
    }

    c.truncate(l + 1);
    c
}

/// Decodes a 63-bit received word (MSB-first). Returns the corrected
/// codeword and whether the received word was uncorrectable.
///
/// Failure is reported when the error-locator degree exceeds `t = 11`, or
/// when Chien search finds fewer roots than that degree.
pub fn decode(received: &[bool; BCH_N]) -> ([bool; BCH_N], bool) {
    let syndromes: Vec<u8> = (1..=2 * BCH_T).map(|j| syndrome(received, j as i64)).collect();

    if syndromes.iter().all(|&s| s == 0) {
        return (*received, false);
    }

    let sigma = berlekamp_massey(&syndromes);
    let degree = sigma.len() - 1;
    if degree > BCH_T {
        return (*received, true);
    }

    let mut corrected = *received;
    let mut roots_found = 0usize;
    for d in 0..BCH_N {
        let mut acc = 0u8;
        for (j, &coeff) in sigma.iter().enumerate() {
            if coeff == 0 {
                continue;
            }
            acc ^= BCH.gf.mul(coeff, BCH.gf.alpha_pow(-(d as i64) * j as i64));
        }
        if acc == 0 {
            roots_found += 1;
            corrected[BCH_N - 1 - d] = !corrected[BCH_N - 1 - d];
        }
    }

    if roots_found < degree {
        return (*received, true);
    }

    (corrected, false)
}

/// Extracts the 16 information bits (MSB-first) from a corrected codeword.
pub fn information_bits(codeword: &[bool; BCH_N]) -> u16 {
    let mut info = 0u16;
    for i in 0..BCH_K {
        if codeword[i] {
            info |= 1 << (BCH_K - 1 - i);
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn generator_has_expected_degree() {
        // Asserted in Bch::new via debug_assert_eq!; force construction.
        Lazy::force(&BCH);
    }

    #[test]
    fn zero_error_roundtrip() {
        let codeword = encode(0x0ABC);
        let (corrected, irrecoverable) = decode(&codeword);
        assert!(!irrecoverable);
        assert_eq!(corrected, codeword);
        assert_eq!(information_bits(&corrected), 0x0ABC);
    }

    #[test]
    fn corrects_up_to_t_errors() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let info: u16 = rng.random_range(0..=0xFFFF);
            let codeword = encode(info);
            let mut received = codeword;

            let mut positions: Vec<usize> = (0..BCH_N).collect();
            // Fisher-Yates partial shuffle to pick BCH_T distinct positions.
            for i in 0..BCH_T {
                let j = rng.random_range(i..positions.len());
                positions.swap(i, j);
            }
            for &p in &positions[..BCH_T] {
                received[p] = !received[p];
            }

            let (corrected, irrecoverable) = decode(&received);
            assert!(!irrecoverable, "failed to correct {} errors", BCH_T);
            assert_eq!(corrected, codeword);
            assert_eq!(information_bits(&corrected), info);

            // Re-encoding the recovered information bits must reproduce the
            // corrected codeword bit-for-bit.
            assert_eq!(encode(information_bits(&corrected)), corrected);
        }
    }

    #[test]
    fn many_errors_either_fail_or_still_satisfy_reencode_equality() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let info: u16 = rng.random_range(0..=0xFFFF);
            let codeword = encode(info);
            let mut received = codeword;
            let mut positions: Vec<usize> = (0..BCH_N).collect();
            for i in 0..16 {
                let j = rng.random_range(i..positions.len());
                positions.swap(i, j);
            }
            for &p in &positions[..16] {
                received[p] = !received[p];
            }

            let (corrected, irrecoverable) = decode(&received);
            if !irrecoverable {
                assert_eq!(encode(information_bits(&corrected)), corrected);
            }
        }
    }

    #[test]
    fn encode_is_systematic() {
        let info = 0b1010_1100_0011_1001u16;
        let codeword = encode(info);
        assert_eq!(information_bits(&codeword), info);
    }
}
