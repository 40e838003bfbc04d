use crate::lexer::{Position, VarType};
use std::collections::HashMap;

/// Symbol information
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub var_type: VarType,
    pub pos: Position,
}

/// Flat, program-wide table of declared variables
///
/// Kat has no block scoping: a variable declared inside an `if` block stays
/// visible for the rest of the program.
#[derive(Debug, Default)]
pub struct SymbolTable {
    variables: HashMap<String, Symbol>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    /// # Errors
    /// Returns the earlier declaration if the name is already taken
    pub fn add_variable(&mut self, name: &str, var_type: VarType, pos: Position) -> Result<(), &Symbol> {
        if self.variables.contains_key(name) {
            return Err(&self.variables[name]);
        }

        let symbol = Symbol {
            name: name.to_string(),
            var_type,
            pos,
        };
        self.variables.insert(name.to_string(), symbol);
        Ok(())
    }

    #[must_use]
    pub fn lookup_variable(&self, name: &str) -> Option<&Symbol> {
        self.variables.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
