use arch::reg::{ADDR_MAX, STACK_BASE, TEMP_BASE};
use indexmap::IndexMap;

use crate::{
    command::{ArithOp, Command, Segment},
    error::Error,
};

/// Entry point called by the bootstrap code.
pub const ENTRY: &str = "Sys.init";

/// Translation state carried from command to command.
#[derive(Debug, Default, Clone)]
pub struct State {
    /// Name of the unit being translated. Namespaces statics and file-scope labels.
    pub unit: String,
    /// Enclosing function, `None` at file scope.
    pub function: Option<String>,
    /// Next return-label index per callee. Never reset.
    pub calls: IndexMap<String, usize>,
    /// Commands written so far in this run. Suffixes the comparison labels.
    /// Kept across units: `IF_TRUE_n` carries no unit prefix, so a per-unit
    /// count would repeat labels once two units land in one output.
    pub written: usize,
}

/// Lowers VM commands to Hack assembly, one command at a time.
#[derive(Debug, Default)]
pub struct CodeWriter {
    output: Vec<String>,
    state: State,
}

macro_rules! emit {
    ($self:ident, $($line:expr),+ $(,)?) => {
        $( $self.emit($line.to_string()); )+
    };
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Start a new unit. Call counters and the label counter are kept.
    pub fn set_unit(&mut self, name: &str) {
        self.state.unit = name.to_string();
        self.state.function = None;
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Take the lines written so far.
    pub fn drain(&mut self) -> std::vec::Drain<'_, String> {
        self.output.drain(..)
    }

    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    fn emit(&mut self, line: String) {
        self.output.push(line);
    }

    /// Set `SP` to the stack base and call the entry function with no arguments.
    pub fn write_init(&mut self) -> Result<(), Error> {
        emit!(self, "// bootstrap", format!("@{}", STACK_BASE), "D=A", "@SP", "M=D");
        self.write(&Command::Call(ENTRY.to_string(), 0))
    }

    /// Translate one command. On error nothing of the command is kept.
    pub fn write(&mut self, cmd: &Command) -> Result<(), Error> {
        let mark = self.output.len();
        self.emit(format!("// {}", cmd));
        let result = match cmd {
            Command::Arithmetic(op) => {
                self.write_arithmetic(*op);
                Ok(())
            }
            Command::Push(seg, idx) => self.write_push(*seg, *idx),
            Command::Pop(seg, idx) => self.write_pop(*seg, *idx),
            Command::Label(label) => {
                let label = self.scoped(label);
                emit!(self, format!("({})", label));
                Ok(())
            }
            Command::Goto(label) => {
                let label = self.scoped(label);
                emit!(self, format!("@{}", label), "0;JMP");
                Ok(())
            }
            Command::IfGoto(label) => {
                let label = self.scoped(label);
                emit!(self, "@SP", "M=M-1", "A=M", "D=M", format!("@{}", label), "D;JNE");
                Ok(())
            }
            Command::Function(name, n_locals) => {
                self.write_function(name, *n_locals);
                Ok(())
            }
            Command::Call(name, n_args) => {
                self.write_call(name, *n_args);
                Ok(())
            }
            Command::Return => {
                self.write_return();
                Ok(())
            }
        };
        match result {
            Ok(()) => {
                self.state.written += 1;
                Ok(())
            }
            Err(e) => {
                self.output.truncate(mark);
                Err(e)
            }
        }
    }

    /// `<function>$<label>` inside a function, `<unit>$<label>` at file scope.
    fn scoped(&self, label: &str) -> String {
        match &self.state.function {
            Some(function) => format!("{}${}", function, label),
            None => format!("{}${}", self.state.unit, label),
        }
    }

    fn write_arithmetic(&mut self, op: ArithOp) {
        match op {
            ArithOp::Add | ArithOp::Sub | ArithOp::And | ArithOp::Or => {
                emit!(self, "@SP", "M=M-1", "A=M", "D=M", "@SP", "A=M", "A=A-1");
                emit!(
                    self,
                    match op {
                        ArithOp::Add => "M=D+M",
                        ArithOp::Sub => "M=M-D",
                        ArithOp::And => "M=D&M",
                        _ => "M=D|M",
                    }
                );
            }
            ArithOp::Eq | ArithOp::Gt | ArithOp::Lt => {
                let n = self.state.written;
                let jump = match op {
                    ArithOp::Eq => "D;JEQ",
                    ArithOp::Gt => "D;JGT",
                    _ => "D;JLT",
                };
                emit!(
                    self,
                    "@SP",
                    "M=M-1",
                    "A=M",
                    "D=M",
                    "@SP",
                    "A=M",
                    "A=A-1",
                    "M=M-D",
                    "D=M",
                    format!("@IF_TRUE_{}", n),
                    jump,
                    "D=0",
                    format!("@STORE_{}", n),
                    "0;JMP",
                    format!("(IF_TRUE_{})", n),
                    "\tD=-1",
                    format!("@STORE_{}", n),
                    "0;JMP",
                    format!("(STORE_{})", n),
                    "\t@SP",
                    "\tA=M",
                    "\tA=A-1",
                    "\tM=D",
                );
            }
            ArithOp::Neg | ArithOp::Not => {
                emit!(self, "@SP", "A=M", "A=A-1");
                emit!(self, if op == ArithOp::Neg { "M=-M" } else { "M=!M" });
            }
        }
    }

    /// Symbol or address of a directly addressed segment cell.
    fn direct(&self, seg: Segment, idx: u16) -> Option<String> {
        match seg {
            Segment::Temp => Some(format!("@{}", TEMP_BASE as u32 + idx as u32)),
            Segment::Static => Some(format!("@{}.{}", self.state.unit, idx)),
            Segment::Pointer => Some(if idx == 0 { "@THIS" } else { "@THAT" }.to_string()),
            _ => None,
        }
    }

    fn write_push(&mut self, seg: Segment, idx: u16) -> Result<(), Error> {
        match seg {
            Segment::Constant => {
                if idx > ADDR_MAX {
                    return Err(Error::ConstantOutOfRange(idx));
                }
                emit!(self, format!("@{}", idx), "D=A");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = seg.base().unwrap_or_default();
                emit!(self, format!("@{}", idx), "D=A", format!("@{}", base), "A=D+M", "D=M");
            }
            Segment::Temp | Segment::Static | Segment::Pointer => {
                let addr = self.direct(seg, idx).unwrap_or_default();
                emit!(self, addr, "D=M");
            }
        }
        emit!(self, "@SP", "A=M", "M=D", "@SP", "M=M+1");
        Ok(())
    }

    fn write_pop(&mut self, seg: Segment, idx: u16) -> Result<(), Error> {
        match seg {
            Segment::Constant => return Err(Error::PopConstant),
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = seg.base().unwrap_or_default();
                emit!(self, format!("@{}", idx), "D=A", format!("@{}", base), "A=D+M");
            }
            Segment::Temp | Segment::Static | Segment::Pointer => {
                let addr = self.direct(seg, idx).unwrap_or_default();
                emit!(self, addr);
            }
        }
        // R13 holds the destination while the value is read
        emit!(
            self, "D=A", "@R13", "M=D", "@SP", "M=M-1", "A=M", "D=M", "@R13", "A=M", "M=D",
        );
        Ok(())
    }

    fn write_function(&mut self, name: &str, n_locals: u16) {
        emit!(self, format!("({})", name));
        if n_locals > 0 {
            emit!(self, "@SP", "A=M");
            for i in 0..n_locals {
                if i > 0 {
                    emit!(self, "A=A+1");
                }
                emit!(self, "M=0");
            }
            emit!(self, format!("@{}", n_locals), "D=A", "@SP", "M=D+M");
        }
        self.state.function = Some(name.to_string());
    }

    fn write_call(&mut self, name: &str, n_args: u16) {
        let idx = self.state.calls.entry(name.to_string()).or_insert(0);
        let ret = format!("{}$ret.{}", name, idx);
        *idx += 1;

        emit!(self, format!("@{}", ret), "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1");
        for reg in ["LCL", "ARG", "THIS", "THAT"] {
            emit!(self, format!("@{}", reg), "D=M", "@SP", "A=M", "M=D", "@SP", "M=M+1");
        }
        // ARG = SP - 5 - n_args
        emit!(self, "@SP", "D=M", format!("@{}", 5 + n_args as u32), "D=D-A", "@ARG", "M=D");
        // LCL = SP
        emit!(self, "@SP", "D=M", "@LCL", "M=D");
        emit!(self, format!("@{}", name), "0;JMP", format!("({})", ret));
    }

    fn write_return(&mut self) {
        // R14 = FRAME, R15 = return address; both read before any restore
        emit!(self, "@LCL", "D=M", "@R14", "M=D");
        emit!(self, "@5", "A=D-A", "D=M", "@R15", "M=D");
        // *ARG = pop()
        emit!(self, "@SP", "AM=M-1", "D=M", "@ARG", "A=M", "M=D");
        // SP = ARG + 1
        emit!(self, "@ARG", "D=M+1", "@SP", "M=D");
        for reg in ["THAT", "THIS", "ARG", "LCL"] {
            emit!(self, "@R14", "AM=M-1", "D=M", format!("@{}", reg), "M=D");
        }
        emit!(self, "@R15", "A=M", "0;JMP");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(writer: &CodeWriter) -> Vec<&str> {
        writer.output().iter().map(String::as_str).collect()
    }

    #[test]
    fn push_constant() {
        let mut writer = CodeWriter::new();
        writer.set_unit("Foo");
        writer.write(&Command::Push(Segment::Constant, 17)).unwrap();
        assert_eq!(
            lines(&writer),
            ["// push constant 17", "@17", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1"]
        );
    }

    #[test]
    fn pop_constant_is_rejected_without_output() {
        let mut writer = CodeWriter::new();
        writer.set_unit("Foo");
        assert!(matches!(
            writer.write(&Command::Pop(Segment::Constant, 0)),
            Err(Error::PopConstant)
        ));
        assert!(writer.output().is_empty());
        assert_eq!(writer.state().written, 0);
    }

    #[test]
    fn constant_range() {
        let mut writer = CodeWriter::new();
        assert!(writer.write(&Command::Push(Segment::Constant, 32767)).is_ok());
        assert!(matches!(
            writer.write(&Command::Push(Segment::Constant, 32768)),
            Err(Error::ConstantOutOfRange(32768))
        ));
    }

    #[test]
    fn segment_addresses() {
        let mut writer = CodeWriter::new();
        writer.set_unit("Foo");
        writer.write(&Command::Push(Segment::Temp, 6)).unwrap();
        writer.write(&Command::Push(Segment::Static, 3)).unwrap();
        writer.write(&Command::Push(Segment::Pointer, 0)).unwrap();
        writer.write(&Command::Push(Segment::Pointer, 1)).unwrap();
        writer.write(&Command::Pop(Segment::Static, 3)).unwrap();
        let out = lines(&writer);
        assert_eq!(out[1], "@11");
        assert_eq!(out[9], "@Foo.3");
        assert_eq!(out[17], "@THIS");
        assert_eq!(out[25], "@THAT");
        assert_eq!(&out[32..35], ["// pop static 3", "@Foo.3", "D=A"]);
    }

    #[test]
    fn pop_local_goes_through_r13() {
        let mut writer = CodeWriter::new();
        writer.write(&Command::Pop(Segment::Local, 2)).unwrap();
        assert_eq!(
            lines(&writer),
            [
                "// pop local 2",
                "@2",
                "D=A",
                "@LCL",
                "A=D+M",
                "D=A",
                "@R13",
                "M=D",
                "@SP",
                "M=M-1",
                "A=M",
                "D=M",
                "@R13",
                "A=M",
                "M=D",
            ]
        );
    }

    #[test]
    fn comparison_labels_are_unique() {
        let mut writer = CodeWriter::new();
        writer.set_unit("A");
        writer.write(&Command::Arithmetic(ArithOp::Eq)).unwrap();
        writer.write(&Command::Arithmetic(ArithOp::Add)).unwrap();
        writer.write(&Command::Arithmetic(ArithOp::Lt)).unwrap();
        writer.set_unit("B");
        writer.write(&Command::Arithmetic(ArithOp::Gt)).unwrap();
        let labels: Vec<_> = lines(&writer)
            .into_iter()
            .filter(|l| l.starts_with('('))
            .collect();
        assert_eq!(
            labels,
            [
                "(IF_TRUE_0)",
                "(STORE_0)",
                "(IF_TRUE_2)",
                "(STORE_2)",
                "(IF_TRUE_3)",
                "(STORE_3)",
            ]
        );
    }

    #[test]
    fn label_scoping() {
        let mut writer = CodeWriter::new();
        writer.set_unit("Foo");
        writer.write(&Command::Label("L".into())).unwrap();
        writer.write(&Command::Function("Foo.bar".into(), 0)).unwrap();
        writer.write(&Command::Label("L".into())).unwrap();
        writer.write(&Command::Goto("L".into())).unwrap();
        writer.write(&Command::IfGoto("L".into())).unwrap();
        assert_eq!(
            lines(&writer),
            [
                "// label L",
                "(Foo$L)",
                "// function Foo.bar 0",
                "(Foo.bar)",
                "// label L",
                "(Foo.bar$L)",
                "// goto L",
                "@Foo.bar$L",
                "0;JMP",
                "// if-goto L",
                "@SP",
                "M=M-1",
                "A=M",
                "D=M",
                "@Foo.bar$L",
                "D;JNE",
            ]
        );
    }

    #[test]
    fn new_unit_leaves_function_scope() {
        let mut writer = CodeWriter::new();
        writer.set_unit("A");
        writer.write(&Command::Function("A.f".into(), 0)).unwrap();
        writer.set_unit("B");
        assert_eq!(writer.state().function, None);
        writer.write(&Command::Goto("X".into())).unwrap();
        assert!(writer.output().iter().any(|l| l == "@B$X"));
    }

    #[test]
    fn function_initializes_locals() {
        let mut writer = CodeWriter::new();
        writer.write(&Command::Function("Main.f".into(), 3)).unwrap();
        assert_eq!(
            lines(&writer),
            [
                "// function Main.f 3",
                "(Main.f)",
                "@SP",
                "A=M",
                "M=0",
                "A=A+1",
                "M=0",
                "A=A+1",
                "M=0",
                "@3",
                "D=A",
                "@SP",
                "M=D+M",
            ]
        );
        assert_eq!(writer.state().function.as_deref(), Some("Main.f"));
    }

    #[test]
    fn function_without_locals() {
        let mut writer = CodeWriter::new();
        writer.write(&Command::Function("Main.g".into(), 0)).unwrap();
        assert_eq!(lines(&writer), ["// function Main.g 0", "(Main.g)"]);
    }

    #[test]
    fn call_sequence() {
        let mut writer = CodeWriter::new();
        writer.set_unit("Main");
        writer.write(&Command::Call("Math.max".into(), 2)).unwrap();
        let out = lines(&writer);
        assert_eq!(out[0], "// call Math.max 2");
        assert_eq!(&out[1..8], ["@Math.max$ret.0", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1"]);
        assert_eq!(&out[8..10], ["@LCL", "D=M"]);
        assert_eq!(&out[15..17], ["@ARG", "D=M"]);
        assert_eq!(&out[22..24], ["@THIS", "D=M"]);
        assert_eq!(&out[29..31], ["@THAT", "D=M"]);
        assert_eq!(&out[36..42], ["@SP", "D=M", "@7", "D=D-A", "@ARG", "M=D"]);
        assert_eq!(&out[42..46], ["@SP", "D=M", "@LCL", "M=D"]);
        assert_eq!(&out[46..], ["@Math.max", "0;JMP", "(Math.max$ret.0)"]);
    }

    #[test]
    fn return_labels_count_per_callee_across_units() {
        let mut writer = CodeWriter::new();
        writer.set_unit("A");
        writer.write(&Command::Call("F.f".into(), 0)).unwrap();
        writer.write(&Command::Call("G.g".into(), 1)).unwrap();
        writer.set_unit("B");
        writer.write(&Command::Call("F.f".into(), 0)).unwrap();
        writer.write(&Command::Call("F.f".into(), 0)).unwrap();
        let labels: Vec<_> = lines(&writer)
            .into_iter()
            .filter(|l| l.starts_with('('))
            .collect();
        assert_eq!(labels, ["(F.f$ret.0)", "(G.g$ret.0)", "(F.f$ret.1)", "(F.f$ret.2)"]);
    }

    #[test]
    fn return_reads_frame_before_restoring() {
        let mut writer = CodeWriter::new();
        writer.write(&Command::Return).unwrap();
        let out = lines(&writer);
        let ret_saved = out.iter().position(|l| *l == "@R15").unwrap();
        let first_restore = out.iter().position(|l| *l == "@THAT").unwrap();
        assert!(ret_saved < first_restore);
        assert_eq!(&out[out.len() - 3..], ["@R15", "A=M", "0;JMP"]);
        let restored: Vec<_> = out
            .windows(2)
            .filter(|w| w[1] == "M=D" && ["@THAT", "@THIS", "@ARG", "@LCL"].contains(&w[0]))
            .map(|w| w[0])
            .collect();
        assert_eq!(restored, ["@THAT", "@THIS", "@ARG", "@LCL"]);
    }

    #[test]
    fn bootstrap() {
        let mut writer = CodeWriter::new();
        writer.write_init().unwrap();
        let out = lines(&writer);
        assert_eq!(&out[..5], ["// bootstrap", "@256", "D=A", "@SP", "M=D"]);
        assert_eq!(out[5], "// call Sys.init 0");
        assert_eq!(&out[out.len() - 3..], ["@Sys.init", "0;JMP", "(Sys.init$ret.0)"]);
    }
}
