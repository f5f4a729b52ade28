use hasm::{print_dump, Assembler, Error};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files, assembled as one program in the given order
    #[clap(default_value = "main.asm")]
    input: Vec<String>,

    /// Output file [default: first input with `.hack` extension]
    #[clap(short, long)]
    output: Option<String>,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Hack Assembler");

    if let Err(err) = run(&args) {
        err.print_diag();
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let mut asm = Assembler::new();

    println!("1. Read Files and Parse Lines");
    for path in &args.input {
        println!("  < {}", path);
        let file = File::open(path).map_err(|e| Error::FileOpen(path.clone(), e))?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::FileRead)?;
        asm.read(path, &lines)?;
    }

    println!("2. Collect Labels");
    asm.collect_labels()?;

    println!("3. Resolve Symbols & Generate Binary");
    let generated = asm.generate();
    if args.dump {
        print_dump(asm.lines(), asm.idents());
    }
    let insts = generated?;

    let output = match &args.output {
        Some(output) => output.clone(),
        None => Path::new(&args.input[0])
            .with_extension("hack")
            .to_string_lossy()
            .into_owned(),
    };
    println!("  > {}", output);
    let file = File::create(&output).map_err(|e| Error::FileCreate(output.clone(), e))?;
    let mut writer = BufWriter::new(file);
    for inst in insts {
        writeln!(writer, "{}", inst.to_word()).map_err(|e| Error::FileWrite(output.clone(), e))?;
    }
    writer
        .flush()
        .map_err(|e| Error::FileWrite(output.clone(), e))?;
    Ok(())
}
