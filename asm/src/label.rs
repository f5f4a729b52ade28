use arch::reg::ADDR_MAX;

use crate::{
    error::Error,
    ident::Idents,
    parser::{Line, Stmt},
};

/// First pass: bind every label to the address of the instruction after it and
/// record the ROM address of each instruction line.
pub fn collect_labels(lines: &mut [Line], idents: &mut Idents) -> Result<(), Error> {
    let mut pc: usize = 0;
    for line in lines.iter_mut() {
        let at = |e: Error, line: &Line| e.at(&line.file, line.idx, &line.raw);
        match &line.stmt {
            Some(Stmt::Label(name)) => {
                let addr = rom_addr(pc, name).map_err(|e| at(e, line))?;
                idents
                    .insert_label(name, (line.file.clone(), line.idx), addr)
                    .map_err(|e| at(e, line))?;
                line.pc = Some(addr);
            }
            Some(Stmt::Code(_)) => {
                line.pc = Some(rom_addr(pc, &line.raw).map_err(|e| at(e, line))?);
                pc += 1;
            }
            None => {}
        }
    }
    Ok(())
}

fn rom_addr(pc: usize, what: &str) -> Result<u16, Error> {
    match u16::try_from(pc) {
        Ok(addr) if addr <= ADDR_MAX => Ok(addr),
        _ => Err(Error::AddressOutOfRange(what.trim().to_string())),
    }
}
