use crate::{command::Command, error::Error};

/// Reads the commands of one source unit.
///
/// The number of meaningful lines is counted up front; that count is the
/// number of times [`Parser::advance`] may be called.
#[derive(Debug)]
pub struct Parser {
    name: String,
    lines: Vec<String>,
    cursor: usize,
    line_idx: Option<usize>,
    num_commands: usize,
    num_read: usize,
}

fn is_command(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with("//")
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

impl Parser {
    pub fn new<I, S>(name: &str, raw_lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = raw_lines.into_iter().map(Into::into).collect();
        let num_commands = lines.iter().filter(|l| is_command(l)).count();
        Parser {
            name: name.to_string(),
            lines,
            cursor: 0,
            line_idx: None,
            num_commands,
            num_read: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_commands(&self) -> usize {
        self.num_commands
    }

    pub fn num_read(&self) -> usize {
        self.num_read
    }

    pub fn has_more_commands(&self) -> bool {
        self.num_read < self.num_commands
    }

    /// Read and classify the next command.
    pub fn advance(&mut self) -> Result<Command, Error> {
        if !self.has_more_commands() {
            return Err(Error::Exhausted);
        }
        while !is_command(&self.lines[self.cursor]) {
            self.cursor += 1;
        }
        let idx = self.cursor;
        self.cursor += 1;
        self.num_read += 1;
        self.line_idx = Some(idx);
        Command::parse(strip_comment(&self.lines[idx])).map_err(|e| self.locate(e))
    }

    /// 1-based line number of the last command read.
    pub fn line_no(&self) -> Option<usize> {
        self.line_idx.map(|idx| idx + 1)
    }

    /// Attach the position of the last command read to an error.
    pub fn locate(&self, err: Error) -> Error {
        match self.line_idx {
            Some(idx) => Error::At {
                file: self.name.clone(),
                line: idx + 1,
                raw: self.lines[idx].clone(),
                source: Box::new(err),
            },
            None => err,
        }
    }
}
