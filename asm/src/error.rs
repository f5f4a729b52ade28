use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Syntax error: cannot parse `{0}`")]
    SyntaxError(String),

    #[error("Empty label declaration")]
    EmptyLabel,

    #[error("Missing symbol after `@`")]
    MissingSymbol,

    #[error("Unknown computation: `{0}`")]
    UnknownComp(String),

    #[error("Unknown destination: `{0}`")]
    UnknownDest(String),

    #[error("Unknown jump: `{0}`")]
    UnknownJump(String),

    #[error("Address out of range: `{0}` does not fit in 15 bits")]
    AddressOutOfRange(String),

    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String, Option<(String, usize)>),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read line")]
    FileRead(#[source] std::io::Error),

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
    /// Attach a source position (0-based line index) to the error.
    pub fn at(self, file: &str, line_idx: usize, raw: &str) -> Error {
        Error::At {
            file: file.to_string(),
            line: line_idx + 1,
            raw: raw.to_string(),
            source: Box::new(self),
        }
    }

    /// The error without position information.
    pub fn root(&self) -> &Error {
        match self {
            Error::At { source, .. } => source.root(),
            e => e,
        }
    }

    /// Print error with diagnostic information showing file location and line content
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
                if let Error::RedefinedLabel(_, Some((prev_file, prev_line))) = source.as_ref() {
                    cprintln!(
                        "<green,bold>note</>: first defined at <underline>{}:{}</>",
                        prev_file,
                        prev_line + 1
                    );
                }
            }
            e => cprintln!("<red,bold>error</>: {}", e),
        }
    }
}
