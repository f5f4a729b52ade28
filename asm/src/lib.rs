mod error;
mod ident;
mod label;
mod parser;
mod util;

pub use error::Error;
pub use ident::{Ident, Idents};
pub use label::collect_labels;
pub use parser::{Code, Imm, Line, Stmt};
pub use util::print_dump;

use arch::inst::Inst;

/// Two-pass assembler over one or more source files.
#[derive(Debug, Default)]
pub struct Assembler {
    lines: Vec<Line>,
    idents: Idents,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            lines: vec![],
            idents: Idents::new(),
        }
    }

    /// Parse the lines of one source file and append them to the program.
    pub fn read<I, S>(&mut self, file: &str, raw_lines: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (idx, raw) in raw_lines.into_iter().enumerate() {
            self.lines.push(Line::parse(file, idx, raw.as_ref())?);
        }
        Ok(())
    }

    /// First pass. Must run before [`Assembler::generate`].
    pub fn collect_labels(&mut self) -> Result<(), Error> {
        collect_labels(&mut self.lines, &mut self.idents)
    }

    /// Second pass: resolve symbols (allocating variables on first use) and
    /// encode every instruction in program order.
    pub fn generate(&mut self) -> Result<Vec<Inst>, Error> {
        let mut insts = vec![];
        for line in self.lines.iter_mut() {
            if let Some(Stmt::Code(code)) = &line.stmt {
                let inst = code
                    .resolve(&mut self.idents)
                    .map_err(|e| e.at(&line.file, line.idx, &line.raw))?;
                line.inst = Some(inst);
                insts.push(inst);
            }
        }
        Ok(insts)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn idents(&self) -> &Idents {
        &self.idents
    }
}

/// Assemble a single source into `.hack` words.
pub fn assemble<I, S>(raw_lines: I) -> Result<Vec<String>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut asm = Assembler::new();
    asm.read("<input>", raw_lines)?;
    asm.collect_labels()?;
    Ok(asm.generate()?.into_iter().map(Inst::to_word).collect())
}
