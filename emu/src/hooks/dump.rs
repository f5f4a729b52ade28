use arch::inst::Inst;
use arch::reg::Sym;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use crate::error::Error;
use crate::model::State;

use super::Hook;

#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    config: Config,
}

/// Run configuration read from YAML.
///
/// ```yaml
/// ram: { 0: 7, 1: 3 }   # initial values
/// dump: [2]             # cells printed at exit
/// at: { 14: [0, 1] }    # cells printed whenever PC reaches a ROM address
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ram: BTreeMap<u16, u16>,
    #[serde(default)]
    pub dump: Vec<u16>,
    #[serde(default)]
    pub at: BTreeMap<u16, Vec<u16>>,
}

impl Config {
    pub fn parse(src: &str) -> Result<Self, Error> {
        serde_yaml::from_str(src).map_err(|e| Error::Config("<input>".to_string(), e))
    }
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, Error> {
        let config = match &file {
            Some(fname) => {
                let f = File::open(fname).map_err(|e| Error::FileOpen(fname.clone(), e))?;
                serde_yaml::from_reader(BufReader::new(f))
                    .map_err(|e| Error::Config(fname.clone(), e))?
            }
            None => Config::default(),
        };
        Ok(Self { file, all, config })
    }

    pub fn new(config: Config, all: bool) -> Self {
        Self {
            file: None,
            all,
            config,
        }
    }
}

impl Hook for Dump {
    fn init(&mut self, mut state: State) -> State {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(
                " * Dump[{}] {:?}",
                self.config.dump.len() + self.config.at.len(),
                fname
            );
        }
        for (addr, val) in &self.config.ram {
            state.set(*addr, *val);
        }
        state
    }

    fn exec(&mut self, time: u64, pc: u16, inst: Inst, cpu: State) -> State {
        if self.all {
            println!("[{:0>6}] {:0>4} {}", time, pc, inst.cformat());
        }
        if let Some(addrs) = self.config.at.get(&pc) {
            print_reg(&cpu);
            print_ram(&cpu, addrs);
        } else if self.all {
            print_reg(&cpu);
        }
        cpu
    }

    fn fini(&mut self, cpu: &State) {
        print_reg(cpu);
        if !self.config.dump.is_empty() {
            print_ram(cpu, &self.config.dump);
        }
    }
}

fn print_reg(cpu: &State) {
    println!(" +-----------+-----------+-----------+-----------+");
    println!(
        " | A:  {:0>4X} | D:  {:0>4X} | PC: {:0>4X} | SP: {:0>4X} |",
        cpu.a(),
        cpu.d(),
        cpu.pc(),
        cpu.sym(Sym::SP)
    );
    println!(
        " | LCL:{:0>4X} | ARG:{:0>4X} | THS:{:0>4X} | THT:{:0>4X} |",
        cpu.sym(Sym::LCL),
        cpu.sym(Sym::ARG),
        cpu.sym(Sym::THIS),
        cpu.sym(Sym::THAT)
    );
    println!(" +-----------+-----------+-----------+-----------+");
}

fn print_ram(cpu: &State, addrs: &[u16]) {
    for addr in addrs {
        println!(
            " | {:>5} : {:0>4X} ({:>6})                         |",
            addr,
            cpu.get(*addr),
            cpu.get(*addr) as i16
        );
    }
    println!(" +-----------------------------------------------+");
}
