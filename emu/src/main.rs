use clap::Parser;

use hemu::hooks::{dump::Dump, Hook};
use hemu::{Error, State};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Emulator for the Hack architecture")]
struct Args {
    /// Stop after this many cycles
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    /// YAML run configuration (initial RAM, cells to dump)
    #[arg(short, long)]
    config: Option<String>,

    /// Trace every instruction
    #[arg(short = 'a', long)]
    dump_all: bool,

    #[arg(default_value = "main.hack")]
    input_file: String,
}

fn main() {
    let args = Args::parse();
    println!("Hack Emulator");

    if let Err(err) = run(args) {
        err.print_diag();
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Initialize state machine model
    let mut state = State::new();
    state.load_rom_file(&args.input_file)?;

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT] {} words", state.rom_len());
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Dump::arg(args.config, args.dump_all)?)];
    state = hooks.iter_mut().fold(state, |state, hook| hook.init(state));

    // ------------------------------------------------------------------------
    // Main loop
    let mut cycles = 0;
    for time in 0..args.tmax.unwrap_or(u64::MAX) {
        let Some((pc, inst)) = state.exec()? else {
            break;
        };
        cycles = time + 1;
        state = hooks
            .iter_mut()
            .fold(state, |state, hook| hook.exec(time, pc, inst, state));
        if state.is_terminated() {
            break;
        }
    }

    // Exit
    match state.is_terminated() {
        true => println!("[HALT] after {} cycles", cycles),
        false => println!("[STOP] after {} cycles", cycles),
    }
    for hook in hooks.iter_mut() {
        hook.fini(&state);
    }
    println!("=================================================");
    Ok(())
}
