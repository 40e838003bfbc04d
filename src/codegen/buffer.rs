use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, Write};

/// Entry point label of the generated program
pub const ENTRY_LABEL: &str = "_start";

/// Generated assembly: an append-only data section and text section
///
/// Nothing is written anywhere until the caller renders or writes the whole
/// buffer, so a failed generation never produces partial output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    data: Vec<String>,
    text: Vec<String>,
    externs: BTreeSet<&'static str>,
}

impl Assembly {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a data-section directive
    pub fn data(&mut self, directive: impl Into<String>) {
        self.data.push(directive.into());
    }

    /// Append an instruction to the text section
    pub fn emit(&mut self, instruction: impl Into<String>) {
        self.text.push(instruction.into());
    }

    /// Append a label definition to the text section
    pub fn label(&mut self, name: &str) {
        self.text.push(format!("{name}:"));
    }

    /// Call a runtime routine, recording it as external
    pub fn call(&mut self, routine: &'static str) {
        self.externs.insert(routine);
        self.text.push(format!("call {routine}"));
    }

    #[must_use]
    pub fn data_lines(&self) -> &[String] {
        &self.data
    }

    #[must_use]
    pub fn text_lines(&self) -> &[String] {
        &self.text
    }

    /// Runtime routines the program calls, sorted
    pub fn externs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.externs.iter().copied()
    }

    /// Write both sections, data first
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "section .data")?;
        for line in &self.data {
            writeln!(f, "{line}")?;
        }

        writeln!(f)?;
        writeln!(f, "section .text")?;
        writeln!(f, "global {ENTRY_LABEL}")?;
        for routine in &self.externs {
            writeln!(f, "extern {routine}")?;
        }
        for line in &self.text {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
