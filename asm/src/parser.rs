use arch::{
    alu::Comp,
    inst::Inst,
    op::{Dest, Jump},
    reg::ADDR_MAX,
};
use color_print::cformat;

use crate::{error::Error, ident::Idents};

// ----------------------------------------------------------------------------
// Line

/// One source line together with what was parsed from it.
#[derive(Debug, Clone)]
pub struct Line {
    pub file: String,
    pub idx: usize,
    pub raw: String,
    pub stmt: Option<Stmt>,
    /// ROM address of the instruction, or the address a label is bound to.
    pub pc: Option<u16>,
    pub inst: Option<Inst>,
}

impl Line {
    pub fn parse(file: &str, idx: usize, raw: &str) -> Result<Line, Error> {
        let stmt = Stmt::parse(raw).map_err(|e| e.at(file, idx, raw))?;
        Ok(Line {
            file: file.to_string(),
            idx,
            raw: raw.to_string(),
            stmt,
            pc: None,
            inst: None,
        })
    }

    pub fn comment(&self) -> Option<&str> {
        self.raw.find("//").map(|i| &self.raw[i + 2..])
    }
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Code(Code),
    Label(String),
}

impl Stmt {
    /// Parse one line of source. Blank and comment-only lines give `None`.
    pub fn parse(raw: &str) -> Result<Option<Stmt>, Error> {
        let code: String = strip_comment(raw)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if code.is_empty() {
            return Ok(None);
        }

        // @value, @symbol
        if let Some(sym) = code.strip_prefix('@') {
            return Ok(Some(Stmt::Code(Code::Addr(Imm::parse(sym)?))));
        }

        // (LABEL)
        if let Some(rest) = code.strip_prefix('(') {
            let name = rest
                .strip_suffix(')')
                .ok_or_else(|| Error::SyntaxError(code.clone()))?;
            if name.is_empty() {
                return Err(Error::EmptyLabel);
            }
            if name.contains(['(', ')']) {
                return Err(Error::SyntaxError(code.clone()));
            }
            return Ok(Some(Stmt::Label(name.to_string())));
        }

        // dest=comp;jump
        Ok(Some(Stmt::Code(Code::parse_comp(&code)?)))
    }
}

fn strip_comment(raw: &str) -> &str {
    match raw.find("//") {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

// ----------------------------------------------------------------------------
// Instruction

/// An instruction before symbol resolution. The fields of a C-instruction are
/// kept as written and looked up when the instruction is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    Addr(Imm),
    Comp {
        dest: String,
        comp: String,
        jump: String,
    },
}

impl Code {
    fn parse_comp(code: &str) -> Result<Code, Error> {
        let syntax = || Error::SyntaxError(code.to_string());

        let (dest, rest) = match code.split_once('=') {
            Some((dest, rest)) => (dest, rest),
            None => ("null", code),
        };
        let (comp, jump) = match rest.split_once(';') {
            Some((comp, jump)) => (comp, jump),
            None => (rest, "null"),
        };

        if dest.is_empty() || comp.is_empty() || jump.is_empty() {
            return Err(syntax());
        }
        if rest.contains('=') || jump.contains(';') {
            return Err(syntax());
        }

        Ok(Code::Comp {
            dest: dest.to_string(),
            comp: comp.to_string(),
            jump: jump.to_string(),
        })
    }

    /// Resolve symbols and look up the C-instruction fields. Unknown symbols are
    /// allocated as variables.
    pub fn resolve(&self, idents: &mut Idents) -> Result<Inst, Error> {
        match self {
            Code::Addr(imm) => Ok(Inst::A(imm.resolve(idents)?)),
            Code::Comp { dest, comp, jump } => {
                let dest = dest
                    .parse::<Dest>()
                    .map_err(|_| Error::UnknownDest(dest.clone()))?;
                let comp = comp
                    .parse::<Comp>()
                    .map_err(|_| Error::UnknownComp(comp.clone()))?;
                let jump = jump
                    .parse::<Jump>()
                    .map_err(|_| Error::UnknownJump(jump.clone()))?;
                Ok(Inst::C(dest, comp, jump))
            }
        }
    }

    pub fn cformat(&self, idents: &Idents) -> String {
        match self {
            Code::Addr(imm) => cformat!("<r>@</>{}", imm.cfmt(idents)),
            Code::Comp { dest, comp, jump } => {
                let dest = match dest.as_str() {
                    "null" => String::new(),
                    d => format!("{}=", d),
                };
                let jump = match jump.as_str() {
                    "null" => String::new(),
                    j => format!(";{}", j),
                };
                cformat!("<b>{}</><r>{}</><g>{}</>", dest, comp, jump)
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Immidiate

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imm {
    Literal(u16),
    Ident(String),
}

impl Imm {
    fn parse(s: &str) -> Result<Imm, Error> {
        if s.is_empty() {
            return Err(Error::MissingSymbol);
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<u16>() {
                Ok(v) if v <= ADDR_MAX => Ok(Imm::Literal(v)),
                _ => Err(Error::AddressOutOfRange(s.to_string())),
            };
        }
        Ok(Imm::Ident(s.to_string()))
    }

    pub fn resolve(&self, idents: &mut Idents) -> Result<u16, Error> {
        match self {
            Imm::Literal(v) => Ok(*v),
            Imm::Ident(s) => {
                let v = idents.resolve(s);
                if v > ADDR_MAX {
                    return Err(Error::AddressOutOfRange(s.clone()));
                }
                Ok(v)
            }
        }
    }

    fn cfmt(&self, idents: &Idents) -> String {
        match self {
            Imm::Ident(s) => match idents.get_val(s) {
                Some(v) => cformat!("<g>{}</><dim>({})</>", s, v),
                None => cformat!("<r,u>{}</>", s),
            },
            Imm::Literal(v) => cformat!("<y>{}</>", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(dest: &str, comp: &str, jump: &str) -> Option<Stmt> {
        Some(Stmt::Code(Code::Comp {
            dest: dest.to_string(),
            comp: comp.to_string(),
            jump: jump.to_string(),
        }))
    }

    macro_rules! case {
        ($($name:ident: $src:expr => $stmt:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Stmt::parse($src).unwrap(), $stmt);
                }
            )*
        }
    }

    case! {
        blank: "" => None,
        spaces: "   \t " => None,
        comment: "// Computes R0 = 2 + 3" => None,
        indented_comment: "    // loop" => None,
        addr_literal: "@2" => Some(Stmt::Code(Code::Addr(Imm::Literal(2)))),
        addr_symbol: "@R0" => Some(Stmt::Code(Code::Addr(Imm::Ident("R0".into())))),
        addr_symbol_with_digits: "@i1" => Some(Stmt::Code(Code::Addr(Imm::Ident("i1".into())))),
        addr_dotted: "@Foo.3" => Some(Stmt::Code(Code::Addr(Imm::Ident("Foo.3".into())))),
        label: "(OUTPUT_FIRST)" => Some(Stmt::Label("OUTPUT_FIRST".into())),
        label_with_comment: "(LOOP) // top" => Some(Stmt::Label("LOOP".into())),
        dest_comp: "D=A" => comp("D", "A", "null"),
        comp_jump: "D;JGT" => comp("null", "D", "JGT"),
        dest_comp_jump: "AM=M+1;JEQ" => comp("AM", "M+1", "JEQ"),
        inline_comment: "  M=D // store" => comp("M", "D", "null"),
        inner_spaces: "D = D + A" => comp("D", "D+A", "null"),
        tab_indent: "\tD=-1" => comp("D", "-1", "null"),
    }

    #[test]
    fn malformed() {
        assert!(matches!(Stmt::parse("()"), Err(Error::EmptyLabel)));
        assert!(matches!(Stmt::parse("(LOOP"), Err(Error::SyntaxError(_))));
        assert!(matches!(Stmt::parse("@"), Err(Error::MissingSymbol)));
        assert!(matches!(Stmt::parse("D=A=M"), Err(Error::SyntaxError(_))));
        assert!(matches!(Stmt::parse("0;JMP;JMP"), Err(Error::SyntaxError(_))));
        assert!(matches!(Stmt::parse("=D"), Err(Error::SyntaxError(_))));
        assert!(matches!(Stmt::parse("@32768"), Err(Error::AddressOutOfRange(_))));
        assert!(matches!(Stmt::parse("@99999999999"), Err(Error::AddressOutOfRange(_))));
    }

    #[test]
    fn unknown_fields_fail_at_resolve() {
        let mut idents = Idents::new();
        let code = |s: &str| match Stmt::parse(s).unwrap() {
            Some(Stmt::Code(code)) => code,
            other => panic!("not code: {:?}", other),
        };
        assert!(matches!(code("D=M+D").resolve(&mut idents), Err(Error::UnknownComp(_))));
        assert!(matches!(code("DM=M").resolve(&mut idents), Err(Error::UnknownDest(_))));
        assert!(matches!(code("0;JUMP").resolve(&mut idents), Err(Error::UnknownJump(_))));
        assert_eq!(
            code("D=D+A").resolve(&mut idents).unwrap(),
            Inst::C(Dest::D, Comp::DPlusA, Jump::Null)
        );
    }

    #[test]
    fn line_keeps_position() {
        let err = Line::parse("Bad.asm", 4, "(X").unwrap_err();
        match &err {
            Error::At { file, line, raw, .. } => {
                assert_eq!(file, "Bad.asm");
                assert_eq!(*line, 5);
                assert_eq!(raw, "(X");
            }
            e => panic!("no position: {:?}", e),
        }
        assert!(matches!(err.root(), Error::SyntaxError(_)));
    }
}
