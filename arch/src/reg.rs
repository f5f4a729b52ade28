use strum::{Display, EnumIter, EnumString};

/// First RAM address handed out to user variables.
pub const VAR_BASE: u16 = 16;

/// Largest value an A-instruction can load.
pub const ADDR_MAX: u16 = 0x7FFF;

/// Initial stack pointer set by the bootstrap code.
pub const STACK_BASE: u16 = 256;

/// Base address of the `temp` segment (R5..R12).
pub const TEMP_BASE: u16 = 5;

/// Predefined symbols of the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum Sym {
    SP,
    LCL,
    ARG,
    THIS,
    THAT,
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
    SCREEN,
    KBD,
}

impl Sym {
    pub fn addr(self) -> u16 {
        use Sym::*;
        match self {
            SP | R0 => 0,
            LCL | R1 => 1,
            ARG | R2 => 2,
            THIS | R3 => 3,
            THAT | R4 => 4,
            R5 => 5,
            R6 => 6,
            R7 => 7,
            R8 => 8,
            R9 => 9,
            R10 => 10,
            R11 => 11,
            R12 => 12,
            R13 => 13,
            R14 => 14,
            R15 => 15,
            SCREEN => 0x4000,
            KBD => 0x6000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn table() {
        assert_eq!(Sym::iter().count(), 23);
        assert_eq!("SCREEN".parse::<Sym>().map(Sym::addr), Ok(16384));
        assert_eq!("KBD".parse::<Sym>().map(Sym::addr), Ok(24576));
        assert_eq!("R13".parse::<Sym>().map(Sym::addr), Ok(13));
        assert!("sp".parse::<Sym>().is_err());
    }
}
