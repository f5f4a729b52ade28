use std::fs::File;
use std::io::{BufRead, BufReader};

use arch::inst::Inst;
use arch::op::Jump;
use arch::reg::{Sym, ADDR_MAX};

use crate::error::Error;

/// Words of ROM and of RAM.
pub const MEM_SIZE: usize = ADDR_MAX as usize + 1;

/// Machine state of the Hack CPU.
#[derive(Debug, Clone)]
pub struct State {
    rom: Vec<u16>,
    len: usize,
    ram: Vec<u16>,
    a: u16,
    d: u16,
    pc: u16,
    halted: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

// Memory access
impl State {
    pub fn get(&self, addr: impl Into<u16>) -> u16 {
        let addr = addr.into() as usize;
        self.ram.get(addr).copied().unwrap_or(0)
    }

    pub fn set(&mut self, addr: impl Into<u16>, val: u16) {
        let addr = addr.into() as usize;
        if let Some(cell) = self.ram.get_mut(addr) {
            *cell = val;
        }
    }

    pub fn sym(&self, sym: Sym) -> u16 {
        self.get(sym.addr())
    }

    pub fn a(&self) -> u16 {
        self.a
    }

    pub fn d(&self) -> u16 {
        self.d
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn rom_len(&self) -> usize {
        self.len
    }

    fn load(&self, pc: u16) -> Result<u16, Error> {
        self.ram
            .get(self.a as usize)
            .copied()
            .ok_or(Error::MemoryOutOfRange(pc, self.a))
    }
}

impl State {
    pub fn new() -> Self {
        State {
            rom: vec![0; MEM_SIZE],
            len: 0,
            ram: vec![0; MEM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            halted: false,
        }
    }

    /// Load a program given as `.hack` text lines. Blank lines are skipped.
    pub fn load_words<I, S>(&mut self, words: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut len = 0;
        for (idx, word) in words.into_iter().enumerate() {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            if word.len() != 16 {
                return Err(Error::InvalidWord(word.to_string(), idx + 1));
            }
            let bin = u16::from_str_radix(word, 2)
                .map_err(|_| Error::InvalidWord(word.to_string(), idx + 1))?;
            if len >= MEM_SIZE {
                return Err(Error::RomOverflow(len + 1));
            }
            self.rom[len] = bin;
            len += 1;
        }
        self.len = len;
        Ok(())
    }

    pub fn load_rom_file(&mut self, fname: &str) -> Result<(), Error> {
        let file = File::open(fname).map_err(|e| Error::FileOpen(fname.to_string(), e))?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::FileRead(fname.to_string(), e))?;
        self.load_words(lines)
    }

    /// Halted on a tight `@X; 0;JMP` loop at X, or ran past the program.
    pub fn is_terminated(&self) -> bool {
        self.halted
    }

    /// Execute the instruction at PC. Returns its address and decoded form,
    /// or `None` once PC has run past the program.
    pub fn exec(&mut self) -> Result<Option<(u16, Inst)>, Error> {
        let pc = self.pc;
        if pc as usize >= self.len {
            self.halted = true;
            return Ok(None);
        }
        let bin = self.rom[pc as usize];
        let inst = Inst::from_bin(bin).ok_or(Error::UndefinedInst(pc, bin))?;

        match inst {
            Inst::A(val) => {
                self.a = val;
                self.pc = pc + 1;
            }
            Inst::C(dest, comp, jump) => {
                let m = if comp.reads_m() || dest.m() {
                    self.load(pc)?
                } else {
                    0
                };
                let out = comp.calc(self.d, self.a, m);
                // M is addressed by A before this instruction
                if dest.m() {
                    let addr = self.a as usize;
                    self.ram[addr] = out;
                }
                if dest.d() {
                    self.d = out;
                }
                if dest.a() {
                    self.a = out;
                }
                let next = if jump.taken(out) { self.a } else { pc + 1 };
                if jump == Jump::JMP
                    && next == pc.wrapping_sub(1)
                    && self.a_inst_at(next) == Some(next)
                {
                    self.halted = true;
                }
                self.pc = next;
            }
        }
        Ok(Some((pc, inst)))
    }

    fn a_inst_at(&self, addr: u16) -> Option<u16> {
        if addr as usize >= self.len {
            return None;
        }
        match Inst::from_bin(self.rom[addr as usize]) {
            Some(Inst::A(val)) => Some(val),
            _ => None,
        }
    }

    /// Run until halted or `tmax` cycles. Returns the number of cycles executed.
    pub fn run(&mut self, tmax: u64) -> Result<u64, Error> {
        for time in 0..tmax {
            self.exec()?;
            if self.is_terminated() {
                return Ok(time + 1);
            }
        }
        Ok(tmax)
    }
}
