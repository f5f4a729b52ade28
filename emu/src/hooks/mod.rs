pub mod dump;

use arch::inst::Inst;

use crate::model::State;

/// Side effects run around the CPU loop.
pub trait Hook {
    fn init(&mut self, state: State) -> State;
    fn exec(&mut self, time: u64, pc: u16, inst: Inst, state: State) -> State;
    fn fini(&mut self, _state: &State) {}
}
