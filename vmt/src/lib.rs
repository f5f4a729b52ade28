mod codegen;
mod command;
mod error;
mod parser;

pub use codegen::{CodeWriter, State, ENTRY};
pub use command::{ArithOp, Command, Segment};
pub use error::Error;
pub use parser::Parser;

/// Translate every command of one unit into `writer`.
/// Returns the number of commands translated.
pub fn translate_unit<I, S>(writer: &mut CodeWriter, name: &str, raw_lines: I) -> Result<usize, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parser = Parser::new(name, raw_lines);
    writer.set_unit(name);
    while parser.has_more_commands() {
        let cmd = parser.advance()?;
        writer.write(&cmd).map_err(|e| parser.locate(e))?;
    }
    Ok(parser.num_read())
}

/// Translate a single unit without bootstrap code.
pub fn translate<I, S>(name: &str, raw_lines: I) -> Result<Vec<String>, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut writer = CodeWriter::new();
    translate_unit(&mut writer, name, raw_lines)?;
    Ok(writer.into_output())
}

/// Translate several units into one program, in the given order.
/// With `bootstrap` the program starts by calling `Sys.init`.
pub fn translate_program<U, I, S>(units: U, bootstrap: bool) -> Result<Vec<String>, Error>
where
    U: IntoIterator<Item = (String, I)>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut writer = CodeWriter::new();
    if bootstrap {
        writer.write_init()?;
    }
    for (name, raw_lines) in units {
        translate_unit(&mut writer, &name, raw_lines)?;
    }
    Ok(writer.into_output())
}
