//! Data Unit ID: message-type selector carried in the NID, and the nominal
//! payload length in bits that drives the assembler's "is this message done
//! yet" decision.

/// Enumerated P25 Phase 1 data unit types.
///
/// `Tsbk2`/`Tsbk3`/`Placeholder` have no standard 4-bit DUID value of their
/// own: they are lengths the framer/assembler assign internally while
/// resolving a corrupted or generic trunking NID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Duid {
    Hdu,
    Tdu,
    Ldu1,
    Tsbk1,
    Ldu2,
    Pdu1,
    Tdulc,
    Tsbk2,
    Tsbk3,
    Placeholder,
    Unknown,
}

impl Duid {
    /// Decodes the 4-bit DUID field into a variant. Values without a defined
    /// meaning resolve to `Unknown`.
    pub fn from_bits(bits: u8) -> Duid {
        match bits {
            0 => Duid::Hdu,
            3 => Duid::Tdu,
            5 => Duid::Ldu1,
            7 => Duid::Tsbk1,
            10 => Duid::Ldu2,
            12 => Duid::Pdu1,
            15 => Duid::Tdulc,
            _ => Duid::Unknown,
        }
    }

    /// The 4-bit DUID field value for variants the standard assigns one to.
    pub fn value(self) -> Option<u8> {
        match self {
            Duid::Hdu => Some(0),
            Duid::Tdu => Some(3),
            Duid::Ldu1 => Some(5),
            Duid::Tsbk1 => Some(7),
            Duid::Ldu2 => Some(10),
            Duid::Pdu1 => Some(12),
            Duid::Tdulc => Some(15),
            Duid::Tsbk2 | Duid::Tsbk3 | Duid::Placeholder | Duid::Unknown => None,
        }
    }

    /// Nominal payload length in bits following the NID.
    pub fn payload_bits(self) -> usize {
        match self {
            Duid::Hdu => 678,
            Duid::Tdu => 30,
            Duid::Ldu1 => 1568,
            Duid::Tsbk1 => 248,
            Duid::Ldu2 => 1568,
            Duid::Pdu1 => 1200,
            Duid::Tdulc => 432,
            Duid::Tsbk2 => 464,
            Duid::Tsbk3 => 720,
            Duid::Placeholder => 1800,
            Duid::Unknown => 0,
        }
    }

    /// Whether this is one of the seven DUID values the standard defines
    /// directly (as opposed to a framer-internal placeholder/derived length).
    pub fn is_valid_primary(self) -> bool {
        self.value().is_some()
    }
}

/// Maximum payload length across all DUID variants; sized so the assembler
/// can carry a fixed-capacity bit buffer with a logical length field instead
/// of reallocating when a placeholder DUID is reassigned mid-assembly.
pub const MAX_PAYLOAD_BITS: usize = 1800;
