use std::fmt;
use strum::{Display, EnumString};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
}

impl Segment {
    /// Base register of the segments addressed through a pointer.
    pub fn base(self) -> Option<&'static str> {
        match self {
            Segment::Local => Some("LCL"),
            Segment::Argument => Some("ARG"),
            Segment::This => Some("THIS"),
            Segment::That => Some("THAT"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arithmetic(ArithOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

impl Command {
    /// Classify one line of VM code with its comment already removed.
    pub fn parse(code: &str) -> Result<Command, Error> {
        let words: Vec<&str> = code.split_whitespace().collect();
        let (head, args) = match words.split_first() {
            Some((head, args)) => (*head, args),
            None => return Err(Error::UnknownCommand(code.to_string())),
        };

        let arity = |n: usize| {
            if args.len() == n {
                Ok(())
            } else {
                Err(Error::ArgCount(head.to_string(), n, args.len()))
            }
        };

        if let Ok(op) = head.parse::<ArithOp>() {
            arity(0)?;
            return Ok(Command::Arithmetic(op));
        }

        match head {
            "push" | "pop" => {
                arity(2)?;
                let segment = args[0]
                    .parse::<Segment>()
                    .map_err(|_| Error::UnknownSegment(args[0].to_string()))?;
                let index = parse_num(args[1])?;
                match head {
                    "push" => Ok(Command::Push(segment, index)),
                    _ => Ok(Command::Pop(segment, index)),
                }
            }
            "label" => {
                arity(1)?;
                Ok(Command::Label(args[0].to_string()))
            }
            "goto" => {
                arity(1)?;
                Ok(Command::Goto(args[0].to_string()))
            }
            "if-goto" => {
                arity(1)?;
                Ok(Command::IfGoto(args[0].to_string()))
            }
            "function" => {
                arity(2)?;
                Ok(Command::Function(args[0].to_string(), parse_num(args[1])?))
            }
            "call" => {
                arity(2)?;
                Ok(Command::Call(args[0].to_string(), parse_num(args[1])?))
            }
            "return" => {
                arity(0)?;
                Ok(Command::Return)
            }
            _ => Err(Error::UnknownCommand(head.to_string())),
        }
    }
}

fn parse_num(s: &str) -> Result<u16, Error> {
    s.parse::<u16>()
        .map_err(|_| Error::ParseNumber(s.to_string()))
}

/// Canonical source form, used for the echo comments.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Arithmetic(op) => write!(f, "{}", op),
            Command::Push(seg, idx) => write!(f, "push {} {}", seg, idx),
            Command::Pop(seg, idx) => write!(f, "pop {} {}", seg, idx),
            Command::Label(label) => write!(f, "label {}", label),
            Command::Goto(label) => write!(f, "goto {}", label),
            Command::IfGoto(label) => write!(f, "if-goto {}", label),
            Command::Function(name, n) => write!(f, "function {} {}", name, n),
            Command::Call(name, n) => write!(f, "call {} {}", name, n),
            Command::Return => write!(f, "return"),
        }
    }
}
