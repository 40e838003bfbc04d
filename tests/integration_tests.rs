use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use kat_rust::codegen::Assembly;
use kat_rust::compile;

/// Helper function to compile one of the sample programs
fn compile_program(source_path: &str) -> Result<Assembly, String> {
    let source = fs::read_to_string(source_path)
        .map_err(|e| format!("Failed to read source file: {e}"))?;

    compile(&source).map_err(|e| format!("Compilation of {source_path} failed: {e}"))
}

/// Run the compiler binary with `args` inside `dir`
fn katc(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_katc"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute katc")
}

fn write_source(dir: &TempDir, name: &str, source: &str) {
    fs::write(dir.path().join(name), source).expect("Failed to write source file");
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn has_line(asm: &Assembly, line: &str) -> bool {
    asm.text_lines().iter().any(|l| l == line)
}

#[test]
fn test_hello() {
    let asm = compile_program("tests/programs/hello.kat").expect("Failed to compile hello.kat");

    assert_eq!(
        asm.data_lines(),
        &[
            "greeting dq 0",
            "answer dd 0",
            "str@0 db `Hello, Kat!`, 0",
            "str@1 db `answer: `, 0",
        ]
    );
    assert_eq!(
        asm.externs().collect::<Vec<_>>(),
        vec!["print_int", "print_newline", "print_string"]
    );
}

#[test]
fn test_arithmetic() {
    let asm = compile_program("tests/programs/arithmetic.kat").expect("Failed to compile arithmetic.kat");

    assert!(has_line(&asm, "imul eax, 2"));
    assert!(has_line(&asm, "idiv ecx"));
    assert!(has_line(&asm, "mov eax, edx"));
    assert!(has_line(&asm, "mulsd xmm0, xmm1"));
    assert!(has_line(&asm, "cvtsi2sd xmm0, eax"));
    assert!(asm.externs().any(|r| r == "print_float"));
}

#[test]
fn test_conditionals() {
    let asm = compile_program("tests/programs/conditionals.kat").expect("Failed to compile conditionals.kat");

    for label in ["else@0:", "else@1:", "endif@0:", "endif@1:", "endif@2:", "else@3:", "endif@3:"] {
        assert!(has_line(&asm, label), "missing label {label}");
    }
    assert!(!has_line(&asm, "else@2:"));
    assert!(has_line(&asm, "setge al"));
    assert!(asm.externs().any(|r| r == "read_int"));
    assert!(asm.externs().any(|r| r == "print_char"));
}

#[test]
fn test_io() {
    let asm = compile_program("tests/programs/io.kat").expect("Failed to compile io.kat");

    assert_eq!(asm.data_lines()[..3], ["name dq 0", "weight dq 0.0", "age dd 0"]);
    assert!(has_line(&asm, "mov [name], rax"));
    assert!(has_line(&asm, "movsd [weight], xmm0"));
    assert_eq!(
        asm.externs().collect::<Vec<_>>(),
        vec![
            "print_char",
            "print_float",
            "print_newline",
            "print_string",
            "read_float",
            "read_int",
            "read_string",
        ]
    );
}

#[test]
fn test_cli_writes_assembly_next_to_source() {
    let dir = TempDir::new().unwrap();
    let source = "intbox x = 5; out << x;";
    write_source(&dir, "prog.kat", source);

    let output = katc(dir.path(), &["prog.kat"]);
    assert!(output.status.success(), "katc failed: {}", stderr(&output));

    let written = fs::read_to_string(dir.path().join("prog.asm")).unwrap();
    assert_eq!(written, compile(source).unwrap().to_string());
}

#[test]
fn test_cli_output_flag() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "prog.kat", "out << \"hi\";");

    let output = katc(dir.path(), &["prog.kat", "-o", "custom.s"]);
    assert!(output.status.success(), "katc failed: {}", stderr(&output));
    assert!(dir.path().join("custom.s").exists());
    assert!(!dir.path().join("prog.asm").exists());
}

#[test]
fn test_cli_rejects_wrong_extension() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "prog.txt", "intbox x = 5;");

    let output = katc(dir.path(), &["prog.txt"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".kat extension"));
    assert!(!dir.path().join("prog.asm").exists());
}

#[test]
fn test_cli_requires_an_input_file() {
    let dir = TempDir::new().unwrap();
    let output = katc(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));

    let message = stderr(&output);
    assert_eq!(message.lines().count(), 1, "expected one line, got: {message}");
    assert!(message.starts_with("error: "));
    assert!(message.contains("<FILE>"));

    let output = katc(dir.path(), &["prog.kat", "--emit", "bytes"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).lines().count(), 1);
}

#[test]
fn test_cli_rejects_reserved_variable_names() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "regs.kat", "intbox eax = 1; out << eax;");

    let output = katc(dir.path(), &["regs.kat"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("'eax' is reserved"));
    assert!(!dir.path().join("regs.asm").exists());
}

#[test]
fn test_cli_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let output = katc(dir.path(), &["missing.kat"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to read file"));
}

#[test]
fn test_cli_compile_error_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "bad.kat", "intbox x = 5 $;");

    let output = katc(dir.path(), &["bad.kat"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown token '$' at 1:14"));
    assert!(!dir.path().join("bad.asm").exists());

    write_source(&dir, "undeclared.kat", "out << y;");
    let output = katc(dir.path(), &["undeclared.kat"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("undeclared.asm").exists());
}

#[test]
fn test_cli_emit_tokens() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "prog.kat", "intbox x = 5; out << x;");

    let output = katc(dir.path(), &["prog.kat", "--emit", "tokens"]);
    assert!(output.status.success(), "katc failed: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("prog.kat:1:1 Keyword(IntBox) intbox"));
    assert!(stdout.contains("Total tokens: 9"));
    assert!(!dir.path().join("prog.asm").exists());
}
