use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use vmt::{translate_unit, CodeWriter, Error};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// A `.vm` file, or a directory of `.vm` files
    #[clap(default_value = ".")]
    path: String,

    /// Output file [default: `X.asm` for `X.vm`, `D/D.asm` for directory `D`]
    #[clap(short, long)]
    output: Option<String>,

    /// Do not emit the bootstrap code in directory mode
    #[clap(long)]
    no_init: bool,

    /// Print the number of commands of each unit
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("VM Translator");

    if let Err(err) = run(&args) {
        err.print_diag();
        std::process::exit(1);
    }
}

/// Source files and default output path for the given input path.
fn sources(path: &Path) -> Result<(Vec<PathBuf>, PathBuf, bool), Error> {
    if !path.is_dir() {
        return Ok((vec![path.to_path_buf()], path.with_extension("asm"), false));
    }
    let name = path
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "out".to_string());
    let entries = fs::read_dir(path).map_err(|e| Error::FileOpen(path.display().to_string(), e))?;
    let mut files = vec![];
    for entry in entries {
        let entry = entry.map_err(|e| Error::FileRead(path.display().to_string(), e))?;
        let file = entry.path();
        if file.is_file() && file.extension().is_some_and(|ext| ext == "vm") {
            files.push(file);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(Error::NoSource(path.display().to_string()));
    }
    Ok((files, path.join(format!("{}.asm", name)), true))
}

fn run(args: &Args) -> Result<(), Error> {
    let (files, default_output, is_dir) = sources(Path::new(&args.path))?;
    let output = match &args.output {
        Some(output) => output.clone(),
        None => default_output.to_string_lossy().into_owned(),
    };

    // units already flushed stay in the output when a later unit fails
    let file = File::create(&output).map_err(|e| Error::FileCreate(output.clone(), e))?;
    let mut out = BufWriter::new(file);
    let mut writer = CodeWriter::new();

    let mut flush = |writer: &mut CodeWriter| -> Result<(), Error> {
        for line in writer.drain() {
            writeln!(out, "{}", line).map_err(|e| Error::FileWrite(output.clone(), e))?;
        }
        Ok(())
    };

    if is_dir && !args.no_init {
        println!("0. Bootstrap");
        writer.write_init()?;
        flush(&mut writer)?;
    }

    println!("1. Translate Units");
    for path in &files {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let display = path.display().to_string();
        println!("  < {}", display);
        let file = File::open(path).map_err(|e| Error::FileOpen(display.clone(), e))?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::FileRead(display.clone(), e))?;
        let count = translate_unit(&mut writer, &name, lines).map_err(|e| match e {
            Error::At { line, raw, source, .. } => Error::At {
                file: display.clone(),
                line,
                raw,
                source,
            },
            e => e,
        })?;
        if args.verbose {
            println!("    {} commands", count);
        }
        flush(&mut writer)?;
    }

    println!("  > {}", output);
    out.flush()
        .map_err(|e| Error::FileWrite(output.clone(), e))?;
    Ok(())
}
