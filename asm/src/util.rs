use crate::ident::Idents;
use crate::parser::{Line, Stmt};
use color_print::cformat;

pub fn print_dump(lines: &[Line], idents: &Idents) {
    let mut file = "";
    for line in lines {
        // Print file header for first line
        if line.file != file {
            file = &line.file;
            println!(
                "{}+------[{}]{}",
                "-".repeat(24),
                file,
                "-".repeat(45usize.saturating_sub(file.len()))
            );
        }

        let comment_str = line
            .comment()
            .map(|s| cformat!("<dim>//{}</>", s))
            .unwrap_or_default();

        let line_num = line.idx + 1;
        let body = match &line.stmt {
            None => format!("{:24}| {:>4}: {}", "", line_num, comment_str),
            Some(Stmt::Code(code)) => {
                let bin_str = match &line.inst {
                    Some(inst) => inst.to_word(),
                    None => cformat!("<r,s>????????????????</>"),
                };
                let pc_str = line
                    .pc
                    .map(|pc| format!("{:04X}", pc))
                    .unwrap_or_else(|| "????".to_string());
                format!(
                    "[{}] {} | {:>4}:   {} {}",
                    pc_str,
                    bin_str,
                    line_num,
                    code.cformat(idents),
                    comment_str
                )
            }
            Some(Stmt::Label(key)) => {
                let label = cformat!("<g>({})</>", key);
                format!("{:24}| {:>4}: {} {}", "", line_num, label, comment_str)
            }
        };
        println!("{}", body);
    }
    println!("------------------------+-----------------------------------------------------");
}
