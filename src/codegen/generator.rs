use std::collections::HashMap;

use log::{debug, trace};

use crate::codegen::{
    backquoted, data_directive, float_constant, print_routine, read_routine, Accumulator, Assembly,
    CodegenError, ENTRY_LABEL, PRINT_NEWLINE,
};
use crate::lexer::{Position, VarType};
use crate::parser::{BinaryOp, ExprKind, Expression, LiteralValue, OutputItem, Program, Statement, StatementKind};
use crate::symbol::{is_reserved_name, SymbolTable};

/// Translates a `Program` into single-accumulator x86-64 assembly
///
/// A generator is good for one run: `generate` consumes it, so the label
/// counter and type table never leak between compilations.
#[derive(Debug, Default)]
pub struct CodeGenerator {
    asm: Assembly,

    // Types of declared variables, filled by the declaration pass
    symbols: SymbolTable,

    // Next `if` label number
    label_counter: usize,

    // Pooled string literals -> data label
    strings: HashMap<String, String>,
}

impl CodeGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate assembly for a whole program
    pub fn generate(mut self, program: &Program) -> Result<Assembly, CodegenError> {
        self.declare_variables(&program.statements)?;
        debug!("reserved {} data slots", self.symbols.len());

        self.asm.label(ENTRY_LABEL);
        for stmt in &program.statements {
            self.generate_statement(stmt)?;
        }

        // exit(0)
        self.asm.emit("mov eax, 60");
        self.asm.emit("xor edi, edi");
        self.asm.emit("syscall");

        debug!(
            "generated {} data lines, {} text lines, {} labels",
            self.asm.data_lines().len(),
            self.asm.text_lines().len(),
            self.label_counter
        );
        Ok(self.asm)
    }

    /// First pass: one data slot per declaration, nested blocks included
    fn declare_variables(&mut self, statements: &[Statement]) -> Result<(), CodegenError> {
        for stmt in statements {
            match &stmt.kind {
                StatementKind::VarDecl { name, var_type, .. } => {
                    if is_reserved_name(name) {
                        return Err(CodegenError::UnsupportedType(
                            format!("'{name}' is reserved by the assembler"),
                            stmt.pos,
                        ));
                    }
                    self.symbols
                        .add_variable(name, *var_type, stmt.pos)
                        .map_err(|_| CodegenError::DuplicateDeclaration(name.clone(), stmt.pos))?;
                    self.asm.data(data_directive(name, *var_type));
                }
                StatementKind::If {
                    then_block,
                    else_block,
                    ..
                } => {
                    self.declare_variables(then_block)?;
                    if let Some(else_stmts) = else_block {
                        self.declare_variables(else_stmts)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Generate code for a statement
    fn generate_statement(&mut self, stmt: &Statement) -> Result<(), CodegenError> {
        trace!("lowering statement at {}", stmt.pos);

        match &stmt.kind {
            StatementKind::VarDecl {
                name, initializer, ..
            } => self.generate_assignment(name, initializer, stmt.pos),
            StatementKind::Assign { name, value } => self.generate_assignment(name, value, stmt.pos),
            StatementKind::Arithmetic { name, op, operand } => {
                let target = self.lookup_variable(name, stmt.pos)?;
                self.asm.emit(Accumulator::for_type(target).load(name));
                let result = self.generate_binary_op(target, *op, operand, stmt.pos)?;
                self.coerce(result, target, stmt.pos)?;
                self.asm.emit(Accumulator::for_type(target).store(name));
                Ok(())
            }
            StatementKind::Output(OutputItem::Value(expr)) => {
                let value_type = self.generate_expression(expr)?;
                self.asm.call(print_routine(value_type));
                Ok(())
            }
            StatementKind::Output(OutputItem::Endl) => {
                self.asm.call(PRINT_NEWLINE);
                Ok(())
            }
            StatementKind::Input { name } => {
                let target = self.lookup_variable(name, stmt.pos)?;
                self.asm.call(read_routine(target));
                self.asm.emit(Accumulator::for_type(target).store(name));
                Ok(())
            }
            StatementKind::If {
                condition,
                then_block,
                else_block,
            } => self.generate_if_statement(condition, then_block, else_block.as_deref(), stmt.pos),
        }
    }

    /// Evaluate `value` and store it into `name`
    fn generate_assignment(&mut self, name: &str, value: &Expression, pos: Position) -> Result<(), CodegenError> {
        let target = self.lookup_variable(name, pos)?;
        let value_type = self.generate_expression(value)?;
        self.coerce(value_type, target, pos)?;
        self.asm.emit(Accumulator::for_type(target).store(name));
        Ok(())
    }

    /// Generate an if statement
    ///
    /// Without a non-empty else block the `je` goes straight to the end
    /// label; otherwise it targets the else label and the then block jumps
    /// over the else block.
    fn generate_if_statement(
        &mut self,
        condition: &Expression,
        then_block: &[Statement],
        else_block: Option<&[Statement]>,
        pos: Position,
    ) -> Result<(), CodegenError> {
        let id = self.label_counter;
        self.label_counter += 1;
        let else_label = format!("else@{id}");
        let end_label = format!("endif@{id}");
        let else_block = else_block.filter(|stmts| !stmts.is_empty());

        let cond_type = self.generate_expression(condition)?;
        match Accumulator::for_type(cond_type) {
            Accumulator::Eax => self.asm.emit("cmp eax, 0"),
            Accumulator::Xmm0 => {
                self.asm.emit("xorpd xmm1, xmm1");
                self.asm.emit("ucomisd xmm0, xmm1");
            }
            Accumulator::Rax => {
                return Err(CodegenError::UnsupportedType(
                    format!("{cond_type} cannot be used as a condition"),
                    pos,
                ))
            }
        }

        let skip_target = if else_block.is_some() { &else_label } else { &end_label };
        self.asm.emit(format!("je {skip_target}"));

        for stmt in then_block {
            self.generate_statement(stmt)?;
        }

        if let Some(else_stmts) = else_block {
            self.asm.emit(format!("jmp {end_label}"));
            self.asm.label(&else_label);
            for stmt in else_stmts {
                self.generate_statement(stmt)?;
            }
        }

        self.asm.label(&end_label);
        Ok(())
    }

    /// Evaluate an expression into the accumulator of its type
    fn generate_expression(&mut self, expr: &Expression) -> Result<VarType, CodegenError> {
        match &expr.kind {
            ExprKind::Literal(lit) => self.generate_literal(lit, expr.pos),
            ExprKind::Variable(name) => {
                let var_type = self.lookup_variable(name, expr.pos)?;
                self.asm.emit(Accumulator::for_type(var_type).load(name));
                Ok(var_type)
            }
            ExprKind::Binary { left, op, right } => {
                let left_type = self.generate_expression(left)?;
                self.generate_binary_op(left_type, *op, right, expr.pos)
            }
        }
    }

    fn generate_literal(&mut self, lit: &LiteralValue, pos: Position) -> Result<VarType, CodegenError> {
        match lit {
            LiteralValue::Float(value) => {
                let constant = float_constant(*value)
                    .ok_or_else(|| CodegenError::UnsupportedType(format!("float literal {value}"), pos))?;
                self.asm.emit(format!("mov rax, __float64__({constant})"));
                self.asm.emit("movq xmm0, rax");
            }
            LiteralValue::String(raw) => {
                let label = self.intern_string(raw);
                self.asm.emit(format!("mov rax, {label}"));
            }
            LiteralValue::Integer(_) | LiteralValue::Char(_) | LiteralValue::Bool(_) => {
                let value = integral_immediate(lit, pos)?;
                self.asm.emit(format!("mov eax, {value}"));
            }
        }
        Ok(lit.var_type())
    }

    /// Apply `op` to the accumulator (holding a `left_type` value) and `right`
    fn generate_binary_op(
        &mut self,
        left_type: VarType,
        op: BinaryOp,
        right: &Expression,
        pos: Position,
    ) -> Result<VarType, CodegenError> {
        let right_type = self.expression_type(right)?;
        let result_type = op.result_type(left_type, right_type).ok_or_else(|| {
            if left_type == right_type || (left_type.is_integral() && right_type.is_integral()) {
                CodegenError::UnsupportedOperator(format!("'{op}' on {left_type} operands"), pos)
            } else {
                CodegenError::UnsupportedType(format!("{left_type} {op} {right_type}"), pos)
            }
        })?;

        if left_type == VarType::Float {
            self.load_float_operand(right)?;
            self.apply_float_op(op);
        } else {
            let operand = self.integral_operand(right)?;
            self.apply_integral_op(op, &operand);
        }

        Ok(result_type)
    }

    /// Source operand for an integral instruction; non-atomic operands end up in `ecx`
    fn integral_operand(&mut self, right: &Expression) -> Result<String, CodegenError> {
        match &right.kind {
            ExprKind::Literal(lit) => integral_immediate(lit, right.pos),
            ExprKind::Variable(name) => Ok(format!("[{name}]")),
            ExprKind::Binary { .. } => {
                self.asm.emit("push rax");
                self.generate_expression(right)?;
                self.asm.emit("mov ecx, eax");
                self.asm.emit("pop rax");
                Ok("ecx".to_string())
            }
        }
    }

    fn apply_integral_op(&mut self, op: BinaryOp, operand: &str) {
        match op {
            BinaryOp::Add => self.asm.emit(format!("add eax, {operand}")),
            BinaryOp::Sub => self.asm.emit(format!("sub eax, {operand}")),
            BinaryOp::Mul => self.asm.emit(format!("imul eax, {operand}")),
            BinaryOp::Div | BinaryOp::Mod => {
                if operand != "ecx" {
                    self.asm.emit(format!("mov ecx, {operand}"));
                }
                self.asm.emit("cdq");
                self.asm.emit("idiv ecx");
                if op == BinaryOp::Mod {
                    self.asm.emit("mov eax, edx");
                }
            }
            BinaryOp::Equal => self.emit_integral_compare(operand, "e"),
            BinaryOp::NotEqual => self.emit_integral_compare(operand, "ne"),
            BinaryOp::Less => self.emit_integral_compare(operand, "l"),
            BinaryOp::Greater => self.emit_integral_compare(operand, "g"),
            BinaryOp::LessEqual => self.emit_integral_compare(operand, "le"),
            BinaryOp::GreaterEqual => self.emit_integral_compare(operand, "ge"),
        }
    }

    fn emit_integral_compare(&mut self, operand: &str, condition: &str) {
        self.asm.emit(format!("cmp eax, {operand}"));
        self.emit_set_flag(condition);
    }

    /// Load the right-hand float operand into `xmm1`, keeping `xmm0`
    fn load_float_operand(&mut self, right: &Expression) -> Result<(), CodegenError> {
        match &right.kind {
            ExprKind::Literal(LiteralValue::Float(value)) => {
                let constant = float_constant(*value)
                    .ok_or_else(|| CodegenError::UnsupportedType(format!("float literal {value}"), right.pos))?;
                self.asm.emit(format!("mov rax, __float64__({constant})"));
                self.asm.emit("movq xmm1, rax");
            }
            ExprKind::Variable(name) => self.asm.emit(format!("movsd xmm1, [{name}]")),
            _ => {
                self.asm.emit("sub rsp, 8");
                self.asm.emit("movsd [rsp], xmm0");
                self.generate_expression(right)?;
                self.asm.emit("movapd xmm1, xmm0");
                self.asm.emit("movsd xmm0, [rsp]");
                self.asm.emit("add rsp, 8");
            }
        }
        Ok(())
    }

    fn apply_float_op(&mut self, op: BinaryOp) {
        match op {
            BinaryOp::Add => self.asm.emit("addsd xmm0, xmm1"),
            BinaryOp::Sub => self.asm.emit("subsd xmm0, xmm1"),
            BinaryOp::Mul => self.asm.emit("mulsd xmm0, xmm1"),
            BinaryOp::Div => self.asm.emit("divsd xmm0, xmm1"),
            // result_type rejects float `%` before we get here
            BinaryOp::Mod => {}
            // An unordered result (NaN operand) sets ZF, PF and CF, so only
            // `a`/`ae` are false for it; `<` and `<=` swap the operands.
            BinaryOp::Less | BinaryOp::LessEqual => {
                self.asm.emit("ucomisd xmm1, xmm0");
                self.emit_set_flag(if op == BinaryOp::Less { "a" } else { "ae" });
            }
            BinaryOp::Greater | BinaryOp::GreaterEqual => {
                self.asm.emit("ucomisd xmm0, xmm1");
                self.emit_set_flag(if op == BinaryOp::Greater { "a" } else { "ae" });
            }
            BinaryOp::Equal => {
                self.asm.emit("ucomisd xmm0, xmm1");
                self.asm.emit("sete al");
                self.asm.emit("setnp cl");
                self.asm.emit("and al, cl");
                self.asm.emit("movzx eax, al");
            }
            BinaryOp::NotEqual => {
                self.asm.emit("ucomisd xmm0, xmm1");
                self.asm.emit("setne al");
                self.asm.emit("setp cl");
                self.asm.emit("or al, cl");
                self.asm.emit("movzx eax, al");
            }
        }
    }

    /// Materialise the flags of the last comparison as 0/1 in `eax`
    fn emit_set_flag(&mut self, condition: &str) {
        self.asm.emit(format!("set{condition} al"));
        self.asm.emit("movzx eax, al");
    }

    /// Convert the accumulator from `from` to `to`, or reject the store
    fn coerce(&mut self, from: VarType, to: VarType, pos: Position) -> Result<(), CodegenError> {
        if !to.accepts(from) {
            return Err(CodegenError::UnsupportedType(
                format!("cannot store {from} into {to}"),
                pos,
            ));
        }
        if to == VarType::Float && from.is_integral() {
            self.asm.emit("cvtsi2sd xmm0, eax");
        }
        Ok(())
    }

    /// Type of an expression without emitting anything
    fn expression_type(&self, expr: &Expression) -> Result<VarType, CodegenError> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(lit.var_type()),
            ExprKind::Variable(name) => self.lookup_variable(name, expr.pos),
            ExprKind::Binary { left, op, right } => {
                let left_type = self.expression_type(left)?;
                let right_type = self.expression_type(right)?;
                op.result_type(left_type, right_type).ok_or_else(|| {
                    CodegenError::UnsupportedOperator(format!("{left_type} {op} {right_type}"), expr.pos)
                })
            }
        }
    }

    fn lookup_variable(&self, name: &str, pos: Position) -> Result<VarType, CodegenError> {
        self.symbols
            .lookup_variable(name)
            .map(|symbol| symbol.var_type)
            .ok_or_else(|| CodegenError::UndeclaredVariable(name.to_string(), pos))
    }

    /// Data label holding a NUL-terminated copy of the string literal
    fn intern_string(&mut self, raw: &str) -> String {
        if let Some(label) = self.strings.get(raw) {
            return label.clone();
        }

        let label = format!("str@{}", self.strings.len());
        if raw.is_empty() {
            self.asm.data(format!("{label} db 0"));
        } else {
            self.asm.data(format!("{label} db {}, 0", backquoted(raw)));
        }
        self.strings.insert(raw.to_string(), label.clone());
        label
    }
}

/// Immediate operand for an integral literal
fn integral_immediate(lit: &LiteralValue, pos: Position) -> Result<String, CodegenError> {
    match lit {
        LiteralValue::Integer(value) => Ok(value.to_string()),
        LiteralValue::Char(c) => Ok(u32::from(*c).to_string()),
        LiteralValue::Bool(b) => Ok(u8::from(*b).to_string()),
        LiteralValue::Float(_) | LiteralValue::String(_) => Err(CodegenError::UnsupportedType(
            format!("{} literal used as an integer operand", lit.var_type()),
            pos,
        )),
    }
}

/// Convenience function for generating a program's assembly
pub fn generate(program: &Program) -> Result<Assembly, CodegenError> {
    CodeGenerator::new().generate(program)
}
