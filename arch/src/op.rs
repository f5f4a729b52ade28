use num_enum::{FromPrimitive, IntoPrimitive};
use strum::{Display, EnumIter, EnumString};

/// Destination field of a C-instruction. Bits are `A D M` from high to low.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Dest {
    #[default]
    #[strum(serialize = "null")]
    Null = 0b000,
    M = 0b001,
    D = 0b010,
    MD = 0b011,
    A = 0b100,
    AM = 0b101,
    AD = 0b110,
    AMD = 0b111,
}

impl Dest {
    pub fn bits(self) -> u8 {
        self.into()
    }

    pub fn a(self) -> bool {
        self.bits() & 0b100 != 0
    }

    pub fn d(self) -> bool {
        self.bits() & 0b010 != 0
    }

    pub fn m(self) -> bool {
        self.bits() & 0b001 != 0
    }
}

/// Jump field of a C-instruction. Bits are `lt eq gt` from high to low.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Jump {
    #[default]
    #[strum(serialize = "null")]
    Null = 0b000,
    JGT = 0b001,
    JEQ = 0b010,
    JGE = 0b011,
    JLT = 0b100,
    JNE = 0b101,
    JLE = 0b110,
    JMP = 0b111,
}

impl Jump {
    pub fn bits(self) -> u8 {
        self.into()
    }

    /// Whether the jump is taken for an ALU output, read as signed.
    pub fn taken(self, out: u16) -> bool {
        let out = out as i16;
        let bits = self.bits();
        (bits & 0b100 != 0 && out < 0) || (bits & 0b010 != 0 && out == 0) || (bits & 0b001 != 0 && out > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("null".parse::<Dest>(), Ok(Dest::Null));
        assert_eq!("AMD".parse::<Dest>(), Ok(Dest::AMD));
        assert!("DM".parse::<Dest>().is_err());
        assert_eq!("JLE".parse::<Jump>(), Ok(Jump::JLE));
        assert!("jmp".parse::<Jump>().is_err());
        assert_eq!(Jump::Null.to_string(), "null");
    }

    #[test]
    fn dest_bits() {
        assert!(Dest::AM.a() && Dest::AM.m() && !Dest::AM.d());
        assert_eq!(Dest::from(0b011), Dest::MD);
        assert_eq!(Dest::MD.bits(), 3);
    }

    #[test]
    fn jump_taken() {
        assert!(Jump::JGT.taken(1));
        assert!(!Jump::JGT.taken(0xFFFF));
        assert!(Jump::JLT.taken(0x8000));
        assert!(Jump::JGE.taken(0));
        assert!(Jump::JNE.taken(0xFFFF));
        assert!(!Jump::JNE.taken(0));
        assert!(Jump::JMP.taken(0));
        assert!(!Jump::Null.taken(0));
    }
}
