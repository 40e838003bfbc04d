//! Names that cannot back a variable slot in the generated assembly.
//!
//! A variable's name is used verbatim as its NASM data label, so it must
//! not read as a register, an assembler keyword, an instruction the
//! generator emits, or a symbol the generator defines itself.

/// Symbols defined or referenced by every generated program
const RUNTIME_SYMBOLS: &[&str] = &[
    "_start",
    "print_int",
    "print_float",
    "print_string",
    "print_char",
    "print_bool",
    "print_newline",
    "read_int",
    "read_float",
    "read_string",
    "read_char",
    "read_bool",
];

/// Fixed-name registers; numbered families are matched in `is_register`
const REGISTERS: &[&str] = &[
    "rax", "rbx", "rcx", "rdx", "rsi", "rdi", "rbp", "rsp", "rip",
    "eax", "ebx", "ecx", "edx", "esi", "edi", "ebp", "esp", "eip",
    "ax", "bx", "cx", "dx", "si", "di", "bp", "sp", "ip",
    "al", "bl", "cl", "dl", "sil", "dil", "bpl", "spl",
    "ah", "bh", "ch", "dh",
    "cs", "ds", "es", "fs", "gs", "ss",
];

/// Directives, pseudo-instructions and operand keywords
const ASSEMBLER_KEYWORDS: &[&str] = &[
    "byte", "word", "dword", "qword", "tword", "oword", "yword", "zword",
    "db", "dw", "dd", "dq", "dt", "do", "dy", "dz",
    "resb", "resw", "resd", "resq", "rest", "reso", "resy", "resz",
    "incbin", "equ", "times", "section", "segment", "global", "extern", "common",
    "bits", "default", "absolute", "org", "struc", "endstruc", "istruc", "at",
    "iend", "align", "alignb", "cpu", "float", "seg", "wrt", "rel", "abs",
    "strict", "nosplit", "near", "far", "short", "to",
];

/// Instructions the code generator emits
const MNEMONICS: &[&str] = &[
    "mov", "movzx", "movsd", "movq", "movapd", "add", "sub", "imul", "idiv",
    "cdq", "cmp", "and", "or", "xor", "xorpd", "push", "pop", "call", "jmp",
    "je", "syscall", "addsd", "subsd", "mulsd", "divsd", "ucomisd", "cvtsi2sd",
    "sete", "setne", "setl", "setg", "setle", "setge", "seta", "setae", "setp",
    "setnp",
];

fn numbered(name: &str, prefix: &str, max: u32) -> bool {
    let Some(digits) = name.strip_prefix(prefix) else {
        return false;
    };
    let canonical = digits == "0"
        || (!digits.is_empty() && !digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit()));
    canonical && digits.parse::<u32>().is_ok_and(|n| n <= max)
}

fn is_register(lower: &str) -> bool {
    if REGISTERS.contains(&lower) {
        return true;
    }

    // r8..r15 with optional d/w/b/l suffix
    let extended = lower
        .strip_suffix(['d', 'w', 'b', 'l'])
        .unwrap_or(lower);
    if numbered(extended, "r", 15) && !numbered(extended, "r", 7) {
        return true;
    }

    [("xmm", 31), ("ymm", 31), ("zmm", 31), ("mm", 7), ("st", 7), ("cr", 15), ("dr", 15), ("k", 7)]
        .into_iter()
        .any(|(prefix, max)| numbered(lower, prefix, max))
}

/// Whether `name` would clash with the assembler or generated code
///
/// Registers and keywords are matched case-insensitively, as NASM does;
/// runtime symbols are case-sensitive.
#[must_use]
pub fn is_reserved_name(name: &str) -> bool {
    if RUNTIME_SYMBOLS.contains(&name) {
        return true;
    }

    let lower = name.to_ascii_lowercase();
    is_register(&lower) || ASSEMBLER_KEYWORDS.contains(&lower.as_str()) || MNEMONICS.contains(&lower.as_str())
}
