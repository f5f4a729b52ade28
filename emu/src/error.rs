use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid machine word at line {1}: `{0}`")]
    InvalidWord(String, usize),

    #[error("Program does not fit in ROM: {0} words")]
    RomOverflow(usize),

    #[error("Undefined instruction {1:016b} at PC={0}")]
    UndefinedInst(u16, u16),

    #[error("Memory access out of range: {1} at PC={0}")]
    MemoryOutOfRange(u16, u16),

    #[error("Invalid run configuration: {0}")]
    Config(String, #[source] serde_yaml::Error),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),
}

impl Error {
    pub fn print_diag(&self) {
        cprintln!("<red,bold>error</>: {}", self);
    }
}
