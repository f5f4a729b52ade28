use arch::inst::Inst;
use hasm::{assemble, Assembler, Error, Ident};

const ADD: &str = "\
// This file is part of a test program.
// Computes R0 = 2 + 3  (R0 refers to RAM[0])

@2
D=A
@3
D=D+A
@0
M=D
";

const MAX: &str = "\
// Computes R2 = max(R0, R1)  (R0,R1,R2 refer to RAM[0],RAM[1],RAM[2])

   @R0
   D=M              // D = first number
   @R1
   D=D-M            // D = first number - second number
   @OUTPUT_FIRST
   D;JGT            // if D>0 (first is greater) goto output_first
   @R1
   D=M              // D = second number
   @OUTPUT_D
   0;JMP            // goto output_d
(OUTPUT_FIRST)
   @R0
   D=M              // D = first number
(OUTPUT_D)
   @R2
   M=D              // M[2] = D (greatest number)
(INFINITE_LOOP)
   @INFINITE_LOOP
   0;JMP            // infinite loop
";

const MAX_WORDS: [&str; 16] = [
    "0000000000000000",
    "1111110000010000",
    "0000000000000001",
    "1111010011010000",
    "0000000000001010",
    "1110001100000001",
    "0000000000000001",
    "1111110000010000",
    "0000000000001100",
    "1110101010000111",
    "0000000000000000",
    "1111110000010000",
    "0000000000000010",
    "1110001100001000",
    "0000000000001110",
    "1110101010000111",
];

fn root(err: Error) -> String {
    format!("{:?}", err.root())
}

#[test]
fn add() {
    let words = assemble(ADD.lines()).unwrap();
    assert_eq!(
        words,
        vec![
            "0000000000000010",
            "1110110000010000",
            "0000000000000011",
            "1110000010010000",
            "0000000000000000",
            "1110001100001000",
        ]
    );
}

#[test]
fn max_with_symbols() {
    assert_eq!(assemble(MAX.lines()).unwrap(), MAX_WORDS);
}

#[test]
fn max_without_symbols() {
    let src = [
        "@0", "D=M", "@1", "D=D-M", "@10", "D;JGT", "@1", "D=M", "@12", "0;JMP", "@0", "D=M",
        "@2", "M=D", "@14", "0;JMP",
    ];
    assert_eq!(assemble(src).unwrap(), MAX_WORDS);
}

#[test]
fn label_table_of_max() {
    let mut asm = Assembler::new();
    asm.read("Max.asm", MAX.lines()).unwrap();
    asm.collect_labels().unwrap();
    let labels: Vec<_> = asm.idents().of_kind(Ident::Label).collect();
    assert_eq!(
        labels,
        vec![("OUTPUT_FIRST", 10), ("OUTPUT_D", 12), ("INFINITE_LOOP", 14)]
    );
}

#[test]
fn forward_and_backward_references_agree() {
    let src = ["@LOOP", "0;JMP", "(LOOP)", "@LOOP", "0;JMP"];
    let words = assemble(src).unwrap();
    assert_eq!(words[0], words[2]);
    assert_eq!(words[0], Inst::A(2).to_word());
}

#[test]
fn variables_from_sixteen_in_first_use_order() {
    let src = [
        "@i", "M=1", "@SCREEN", "D=A", "@sum", "M=0", "@LOOP", "0;JMP", "(LOOP)", "@i", "D=M",
        "@R5", "D=D+M", "@n", "M=D",
    ];
    let mut asm = Assembler::new();
    asm.read("Vars.asm", src).unwrap();
    asm.collect_labels().unwrap();
    let insts = asm.generate().unwrap();
    assert_eq!(insts[0], Inst::A(16));
    assert_eq!(insts[2], Inst::A(16384));
    assert_eq!(insts[4], Inst::A(17));
    assert_eq!(insts[6], Inst::A(8));
    assert_eq!(insts[8], Inst::A(16));
    assert_eq!(insts[10], Inst::A(5));
    assert_eq!(insts[12], Inst::A(18));
    let vars: Vec<_> = asm.idents().of_kind(Ident::Variable).collect();
    assert_eq!(vars, vec![("i", 16), ("sum", 17), ("n", 18)]);
}

#[test]
fn label_used_before_declaration_is_not_a_variable() {
    let src = ["@END", "0;JMP", "@x", "M=0", "(END)", "@END", "0;JMP"];
    let words = assemble(src).unwrap();
    assert_eq!(words[0], Inst::A(4).to_word());
    assert_eq!(words[2], Inst::A(16).to_word());
}

#[test]
fn multiple_files_form_one_program() {
    let mut asm = Assembler::new();
    asm.read("a.asm", ["@B", "0;JMP"]).unwrap();
    asm.read("b.asm", ["(B)", "@B", "0;JMP"]).unwrap();
    asm.collect_labels().unwrap();
    let insts = asm.generate().unwrap();
    assert_eq!(insts[0], Inst::A(2));
    assert_eq!(asm.lines()[2].file, "b.asm");
}

#[test]
fn errors() {
    assert!(root(assemble(["D=M+D"]).unwrap_err()).starts_with("UnknownComp"));
    assert!(root(assemble(["X=M"]).unwrap_err()).starts_with("UnknownDest"));
    assert!(root(assemble(["0;JJJ"]).unwrap_err()).starts_with("UnknownJump"));
    assert!(root(assemble(["@40000"]).unwrap_err()).starts_with("AddressOutOfRange"));
    assert!(root(assemble(["(A)", "(A)"]).unwrap_err()).starts_with("RedefinedLabel"));
    assert!(root(assemble(["(KBD)"]).unwrap_err()).starts_with("RedefinedLabel"));
}

#[test]
fn error_points_at_line() {
    let err = assemble(["@1", "", "D=Q"]).unwrap_err();
    match err {
        Error::At { line, raw, .. } => {
            assert_eq!(line, 3);
            assert_eq!(raw, "D=Q");
        }
        e => panic!("{:?}", e),
    }
}
