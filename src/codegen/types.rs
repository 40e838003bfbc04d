use crate::lexer::VarType;

/// Register that holds the current value of a given type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulator {
    /// Int, Char and Bool
    Eax,
    /// String pointers
    Rax,
    /// Floats
    Xmm0,
}

impl Accumulator {
    #[must_use]
    pub fn for_type(var_type: VarType) -> Self {
        match var_type {
            VarType::Int | VarType::Char | VarType::Bool => Accumulator::Eax,
            VarType::String => Accumulator::Rax,
            VarType::Float => Accumulator::Xmm0,
        }
    }

    /// Load the slot `name` into the accumulator
    #[must_use]
    pub fn load(&self, name: &str) -> String {
        match self {
            Accumulator::Eax => format!("mov eax, [{name}]"),
            Accumulator::Rax => format!("mov rax, [{name}]"),
            Accumulator::Xmm0 => format!("movsd xmm0, [{name}]"),
        }
    }

    /// Store the accumulator into the slot `name`
    #[must_use]
    pub fn store(&self, name: &str) -> String {
        match self {
            Accumulator::Eax => format!("mov [{name}], eax"),
            Accumulator::Rax => format!("mov [{name}], rax"),
            Accumulator::Xmm0 => format!("movsd [{name}], xmm0"),
        }
    }
}

/// Data-section directive reserving the slot for a variable
///
/// Integral types get a 32-bit slot, floats a 64-bit float, strings a
/// 64-bit pointer.
#[must_use]
pub fn data_directive(name: &str, var_type: VarType) -> String {
    match var_type {
        VarType::Int | VarType::Char | VarType::Bool => format!("{name} dd 0"),
        VarType::Float => format!("{name} dq 0.0"),
        VarType::String => format!("{name} dq 0"),
    }
}

/// Runtime routine printing the accumulator
#[must_use]
pub fn print_routine(var_type: VarType) -> &'static str {
    match var_type {
        VarType::Int => "print_int",
        VarType::Float => "print_float",
        VarType::String => "print_string",
        VarType::Char => "print_char",
        VarType::Bool => "print_bool",
    }
}

/// Runtime routine reading a value into the accumulator
#[must_use]
pub fn read_routine(var_type: VarType) -> &'static str {
    match var_type {
        VarType::Int => "read_int",
        VarType::Float => "read_float",
        VarType::String => "read_string",
        VarType::Char => "read_char",
        VarType::Bool => "read_bool",
    }
}

pub const PRINT_NEWLINE: &str = "print_newline";

/// NASM float constant for `value`, or `None` for infinities and NaN
///
/// NASM needs a `.` in the mantissa.
#[must_use]
pub fn float_constant(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let text = format!("{value:?}");
    Some(match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => format!("{mantissa}.0e{exponent}"),
        _ => text,
    })
}

/// NASM backquoted string for a Kat string literal body
///
/// Kat escapes (`\n`, `\t`, `\"`, `\\`, `` \` ``) mean the same inside
/// backquotes and are copied as written; only bare backquotes get escaped.
#[must_use]
pub fn backquoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('`');

    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                // a trailing lone backslash would escape the closing quote
                out.push(chars.next().unwrap_or('\\'));
            }
            '`' => out.push_str("\\`"),
            c => out.push(c),
        }
    }

    out.push('`');
    out
}
