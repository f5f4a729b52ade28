use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Parse errors
    #[error("Unsupported instruction: `{0}`")]
    UnknownCommand(String),

    #[error("Invalid operand count for `{0}`: expected {1}, got {2}")]
    ArgCount(String, usize, usize),

    #[error("Cannot parse `{0}` as a number")]
    ParseNumber(String),

    // Lookup errors
    #[error("Unknown segment: `{0}`")]
    UnknownSegment(String),

    // Input errors
    #[error("No more commands to read")]
    Exhausted,

    // Semantic errors
    #[error("Cannot pop into the constant segment")]
    PopConstant,

    #[error("Constant out of range: {0} does not fit in 15 bits")]
    ConstantOutOfRange(u16),

    // IO errors
    #[error("No .vm source found in {0}")]
    NoSource(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("{file}:{line}: {source}")]
    At {
        file: String,
        line: usize,
        raw: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The error without position information.
    pub fn root(&self) -> &Error {
        match self {
            Error::At { source, .. } => source.root(),
            e => e,
        }
    }

    pub fn print_diag(&self) {
        match self {
            Error::At {
                file,
                line,
                raw,
                source,
            } => {
                cprintln!("<red,bold>error</>: {}", source);
                cprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
                cprintln!("      <blue>|</>");
                cprintln!(" <blue>{:>4} |</> {}", line, raw);
                cprintln!("      <blue>|</>");
            }
            e => cprintln!("<red,bold>error</>: {}", e),
        }
    }
}
