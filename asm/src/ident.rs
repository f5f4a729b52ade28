use arch::reg::{Sym, VAR_BASE};
use indexmap::IndexMap;
use strum::IntoEnumIterator;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ident {
    Builtin,
    Label,
    Variable,
}

/// Where a name was declared: (file, line_idx). Builtins have no location.
pub type Location = Option<(String, usize)>;

/// Symbol table. A name is never rebound once inserted.
#[derive(Debug, Clone)]
pub struct Idents {
    map: IndexMap<String, (Location, Ident, u16)>,
    next_var: u16,
}

impl Default for Idents {
    fn default() -> Self {
        Self::new()
    }
}

impl Idents {
    pub fn new() -> Self {
        let map = Sym::iter()
            .map(|sym| (sym.to_string(), (None, Ident::Builtin, sym.addr())))
            .collect();
        Idents {
            map,
            next_var: VAR_BASE,
        }
    }

    /// Bind a label. Declaring a name twice, or shadowing a builtin, is an error.
    pub fn insert_label(
        &mut self,
        name: &str,
        location: (String, usize),
        pc: u16,
    ) -> Result<(), Error> {
        if let Some((prev, _, _)) = self.map.get(name) {
            return Err(Error::RedefinedLabel(name.to_string(), prev.clone()));
        }
        self.map
            .insert(name.to_string(), (Some(location), Ident::Label, pc));
        Ok(())
    }

    /// Address of `name`, binding it to the next free variable slot on first use.
    pub fn resolve(&mut self, name: &str) -> u16 {
        if let Some(val) = self.get_val(name) {
            return val;
        }
        let addr = self.next_var;
        self.map
            .insert(name.to_string(), (None, Ident::Variable, addr));
        self.next_var = self.next_var.saturating_add(1);
        addr
    }

    pub fn get_val(&self, name: &str) -> Option<u16> {
        self.map.get(name).map(|(_, _, val)| *val)
    }

    /// Names of one kind, in insertion order.
    pub fn of_kind(&self, kind: Ident) -> impl Iterator<Item = (&str, u16)> + '_ {
        self.map
            .iter()
            .filter(move |(_, (_, k, _))| *k == kind)
            .map(|(name, (_, _, val))| (name.as_str(), *val))
    }
}
