use bimap::BiMap;
use once_cell::sync::Lazy;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Computation field of a C-instruction.
///
/// The string form is the mnemonic as written in assembly source, e.g. `D+1`.
/// The 7-bit code includes the `a` bit that selects `M` over `A` as operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
pub enum Comp {
    #[strum(serialize = "0")]
    Zero,
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "-1")]
    NegOne,
    #[strum(serialize = "D")]
    D,
    #[strum(serialize = "A")]
    A,
    #[strum(serialize = "!D")]
    NotD,
    #[strum(serialize = "!A")]
    NotA,
    #[strum(serialize = "-D")]
    NegD,
    #[strum(serialize = "-A")]
    NegA,
    #[strum(serialize = "D+1")]
    DPlusOne,
    #[strum(serialize = "A+1")]
    APlusOne,
    #[strum(serialize = "D-1")]
    DMinusOne,
    #[strum(serialize = "A-1")]
    AMinusOne,
    #[strum(serialize = "D+A")]
    DPlusA,
    #[strum(serialize = "D-A")]
    DMinusA,
    #[strum(serialize = "A-D")]
    AMinusD,
    #[strum(serialize = "D&A")]
    DAndA,
    #[strum(serialize = "D|A")]
    DOrA,
    #[strum(serialize = "M")]
    M,
    #[strum(serialize = "!M")]
    NotM,
    #[strum(serialize = "-M")]
    NegM,
    #[strum(serialize = "M+1")]
    MPlusOne,
    #[strum(serialize = "M-1")]
    MMinusOne,
    #[strum(serialize = "D+M")]
    DPlusM,
    #[strum(serialize = "D-M")]
    DMinusM,
    #[strum(serialize = "M-D")]
    MMinusD,
    #[strum(serialize = "D&M")]
    DAndM,
    #[strum(serialize = "D|M")]
    DOrM,
}

static CODES: Lazy<BiMap<Comp, u8>> = Lazy::new(|| Comp::iter().map(|c| (c, c.bits())).collect());

impl Comp {
    pub fn bits(self) -> u8 {
        use Comp::*;
        match self {
            Zero => 0b0101010,
            One => 0b0111111,
            NegOne => 0b0111010,
            D => 0b0001100,
            A => 0b0110000,
            NotD => 0b0001101,
            NotA => 0b0110001,
            NegD => 0b0001111,
            NegA => 0b0110011,
            DPlusOne => 0b0011111,
            APlusOne => 0b0110111,
            DMinusOne => 0b0001110,
            AMinusOne => 0b0110010,
            DPlusA => 0b0000010,
            DMinusA => 0b0010011,
            AMinusD => 0b0000111,
            DAndA => 0b0000000,
            DOrA => 0b0010101,
            M => 0b1110000,
            NotM => 0b1110001,
            NegM => 0b1110011,
            MPlusOne => 0b1110111,
            MMinusOne => 0b1110010,
            DPlusM => 0b1000010,
            DMinusM => 0b1010011,
            MMinusD => 0b1000111,
            DAndM => 0b1000000,
            DOrM => 0b1010101,
        }
    }

    pub fn from_bits(bits: u8) -> Option<Comp> {
        CODES.get_by_right(&bits).copied()
    }

    /// Whether the operand is `M` (a-bit set).
    pub fn reads_m(self) -> bool {
        self.bits() & 0b1000000 != 0
    }

    pub fn calc(self, d: u16, a: u16, m: u16) -> u16 {
        use Comp::*;
        match self {
            Zero => 0,
            One => 1,
            NegOne => 0xFFFF,
            D => d,
            A => a,
            NotD => !d,
            NotA => !a,
            NegD => d.wrapping_neg(),
            NegA => a.wrapping_neg(),
            DPlusOne => d.wrapping_add(1),
            APlusOne => a.wrapping_add(1),
            DMinusOne => d.wrapping_sub(1),
            AMinusOne => a.wrapping_sub(1),
            DPlusA => d.wrapping_add(a),
            DMinusA => d.wrapping_sub(a),
            AMinusD => a.wrapping_sub(d),
            DAndA => d & a,
            DOrA => d | a,
            M => m,
            NotM => !m,
            NegM => m.wrapping_neg(),
            MPlusOne => m.wrapping_add(1),
            MMinusOne => m.wrapping_sub(1),
            DPlusM => d.wrapping_add(m),
            DMinusM => d.wrapping_sub(m),
            MMinusD => m.wrapping_sub(d),
            DAndM => d & m,
            DOrM => d | m,
        }
    }
}
