mod error;
pub mod hooks;
mod model;

pub use error::Error;
pub use model::{State, MEM_SIZE};

/// Load `.hack` words and run them until halted or `tmax` cycles.
pub fn run<I, S>(words: I, ram: &[(u16, u16)], tmax: u64) -> Result<State, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = State::new();
    state.load_words(words)?;
    for (addr, val) in ram {
        state.set(*addr, *val);
    }
    state.run(tmax)?;
    Ok(state)
}
