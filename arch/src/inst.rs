use crate::{
    alu::Comp,
    op::{Dest, Jump},
    reg::ADDR_MAX,
};

use color_print::cformat;
use std::fmt;

/// A resolved machine instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    A(u16),
    C(Dest, Comp, Jump),
}

impl Inst {
    pub fn to_bin(self) -> u16 {
        match self {
            Inst::A(addr) => addr & ADDR_MAX,
            Inst::C(dest, comp, jump) => {
                (0b111 << 13)
                    | ((comp.bits() as u16) << 6)
                    | ((dest.bits() as u16) << 3)
                    | (jump.bits() as u16)
            }
        }
    }

    /// Decode a machine word. `None` if the comp field is not a known code.
    pub fn from_bin(bin: u16) -> Option<Inst> {
        if bin & 0x8000 == 0 {
            return Some(Inst::A(bin));
        }
        let comp = Comp::from_bits(((bin >> 6) & 0x7F) as u8)?;
        let dest = Dest::from(((bin >> 3) & 0b111) as u8);
        let jump = Jump::from((bin & 0b111) as u8);
        Some(Inst::C(dest, comp, jump))
    }

    /// The word as 16 `0`/`1` characters, as written to `.hack` files.
    pub fn to_word(self) -> String {
        format!("{:016b}", self.to_bin())
    }

    pub fn from_word(word: &str) -> Option<Inst> {
        if word.len() != 16 {
            return None;
        }
        u16::from_str_radix(word, 2).ok().and_then(Inst::from_bin)
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::A(addr) => write!(f, "@{}", addr),
            Inst::C(dest, comp, jump) => {
                if *dest != Dest::Null {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if *jump != Jump::Null {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
        }
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        match self {
            Inst::A(addr) => cformat!("<y>@{:<5}</>", addr),
            Inst::C(dest, comp, jump) => cformat!(
                "<b>{:>4}</><r>{:<4}</><g>{}</>",
                match dest {
                    Dest::Null => String::new(),
                    d => format!("{}=", d),
                },
                comp,
                match jump {
                    Jump::Null => String::new(),
                    j => format!(";{}", j),
                }
            ),
        }
    }
}
