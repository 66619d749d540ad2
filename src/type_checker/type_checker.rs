//! Static type inference for compiled languages.
//!
//! Types are inferred from values, never declared: the first assignment to a
//! name fixes its type for the rest of the program and any later assignment of
//! a different type is an error. Functions are inferred at their first call,
//! with parameter types taken from that call's arguments; functions nobody
//! calls are inferred last with unknown parameters.
//!
//! `None` in a type slot is the neutral placeholder: the type is not known
//! statically and emitters fall back to their dynamic/generic form.

use std::{
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        statements::FnDeclStmt,
    },
    errors::errors::{Error, ErrorImpl},
    spec::{
        rules::OperatorRules,
        specification::{DataType, Specification},
        template::{NativeFunction, NativeOp},
    },
    Position, Span,
};

pub type Slot = Option<DataType>;

/// Variables of one function (or the top level) in first-assignment order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub variables: Vec<(String, Slot)>,
}

impl Frame {
    pub fn get(&self, name: &str) -> Option<Slot> {
        self.variables
            .iter()
            .find(|(variable, _)| variable == name)
            .map(|(_, slot)| *slot)
    }

    fn declare(&mut self, name: &str, slot: Slot) {
        self.variables.push((name.to_string(), slot));
    }
}

/// Variables first assigned inside one block of `owner`'s body. They go out of
/// scope when the block closes.
#[derive(Debug)]
struct BlockFrame {
    owner: Option<String>,
    frame: Frame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    pub parameters: Vec<(String, Slot)>,
    pub return_type: Slot,
    pub locals: Frame,
    /// Enclosing function, when declared inside another function.
    pub parent: Option<String>,
    /// Top-level variables the body assigns.
    pub global_writes: BTreeSet<String>,
    /// Variables of enclosing functions the body assigns.
    pub nonlocal_writes: BTreeSet<String>,
    /// Every variable the body uses that belongs to an enclosing scope.
    pub captures: BTreeSet<String>,
}

impl FunctionSignature {
    pub fn parameter(&self, name: &str) -> Option<Slot> {
        self.parameters
            .iter()
            .find(|(parameter, _)| parameter == name)
            .map(|(_, slot)| *slot)
    }
}

/// Result of inference: variable tables, function signatures and the type of
/// every expression node, keyed by its span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    pub globals: Frame,
    pub functions: BTreeMap<String, FunctionSignature>,
    /// Function names in declaration order.
    pub function_order: Vec<String>,
    expr_types: BTreeMap<(u32, u32), Slot>,
    /// Type of the variable each declaring assignment introduces.
    declarations: BTreeMap<(u32, u32), Slot>,
}

impl TypeTable {
    pub fn expr_type(&self, expr: &Expr) -> Slot {
        self.type_at(expr.get_span())
    }

    pub fn type_at(&self, span: &Span) -> Slot {
        self.expr_types.get(&span_key(span)).copied().flatten()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }

    /// `Some` when the assignment at `span` introduces its variable.
    pub fn declared_type(&self, span: &Span) -> Option<Slot> {
        self.declarations.get(&span_key(span)).copied()
    }
}

fn span_key(span: &Span) -> (u32, u32) {
    (span.start.offset, span.end.offset)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pending,
    InProgress,
    Done,
}

struct FunctionState {
    decl: Rc<FnDeclStmt>,
    status: Status,
    signature: FunctionSignature,
    /// At least one `return` has been seen, so `signature.return_type` is fixed.
    returns_seen: bool,
    /// Blocks open around the declaration, outermost first.
    enclosing_blocks: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Owner {
    Global,
    Function(String),
}

impl Owner {
    fn of(scope: Option<String>) -> Self {
        match scope {
            Some(function) => Owner::Function(function),
            None => Owner::Global,
        }
    }
}

pub struct TypeChecker<'a> {
    rules: &'a OperatorRules,
    builtins: BTreeMap<String, DataType>,
    globals: Frame,
    functions: BTreeMap<String, FunctionState>,
    function_order: Vec<String>,
    current: Option<String>,
    /// Every block checked so far, indexed by block id.
    frames: Vec<BlockFrame>,
    /// Ids of the blocks visible from the body being checked, innermost last.
    blocks: Vec<usize>,
    expr_types: BTreeMap<(u32, u32), Slot>,
    declarations: BTreeMap<(u32, u32), Slot>,
}

fn mismatch(variable: &str, expected: DataType, received: DataType, position: Position) -> Error {
    Error::new(
        ErrorImpl::TypeMatchError {
            variable: variable.to_string(),
            expected: expected.to_string(),
            received: received.to_string(),
        },
        position,
    )
}

fn numeric(left: Slot, right: Slot) -> Slot {
    match (left?, right?) {
        (DataType::Integer, DataType::Integer) => Some(DataType::Integer),
        (DataType::Integer | DataType::Float, DataType::Integer | DataType::Float) => {
            Some(DataType::Float)
        }
        _ => None,
    }
}

/// The static result type of a binary operation.
pub fn binary_result(op: NativeOp, left: Slot, right: Slot) -> Slot {
    match op {
        op if op.is_comparison() || op.is_logical() => Some(DataType::Boolean),
        NativeOp::Concat => Some(DataType::String),
        NativeOp::Add => match (left, right) {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => numeric(left, right),
        },
        _ => numeric(left, right),
    }
}

/// Declared builtin return types, plus the implicit `print`.
pub fn builtin_return_types(spec: &Specification) -> BTreeMap<String, DataType> {
    let mut builtins: BTreeMap<String, DataType> = spec
        .builtin_functions
        .iter()
        .map(|builtin| (builtin.name.clone(), builtin.return_type))
        .collect();
    builtins
        .entry(NativeFunction::Print.name().to_string())
        .or_insert(DataType::Void);
    builtins
}

impl<'a> TypeChecker<'a> {
    pub fn new(rules: &'a OperatorRules, builtins: BTreeMap<String, DataType>) -> Self {
        TypeChecker {
            rules,
            builtins,
            globals: Frame::default(),
            functions: BTreeMap::new(),
            function_order: vec![],
            current: None,
            frames: vec![],
            blocks: vec![],
            expr_types: BTreeMap::new(),
            declarations: BTreeMap::new(),
        }
    }

    pub fn check(mut self, program: &Program) -> Result<TypeTable, Error> {
        for stmt in &program.body {
            if let Stmt::FnDecl(decl) = stmt {
                self.register(decl, None)?;
            }
        }

        self.check_block(&program.body)?;

        // Inferring a body may register nested functions, so the order can grow.
        let mut index = 0;
        while index < self.function_order.len() {
            let name = self.function_order[index].clone();
            self.infer_function(&name)?;
            index += 1;
        }

        let functions = self
            .functions
            .into_iter()
            .map(|(name, state)| (name, state.signature))
            .collect();

        Ok(TypeTable {
            globals: self.globals,
            functions,
            function_order: self.function_order,
            expr_types: self.expr_types,
            declarations: self.declarations,
        })
    }

    fn register(&mut self, decl: &Rc<FnDeclStmt>, parent: Option<String>) -> Result<(), Error> {
        if let Some(existing) = self.functions.get(&decl.name) {
            if Rc::ptr_eq(&existing.decl, decl) {
                return Ok(());
            }
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared {
                    function: decl.name.clone(),
                },
                decl.span.start,
            ));
        }

        let signature = FunctionSignature {
            name: decl.name.clone(),
            parameters: decl
                .parameters
                .iter()
                .map(|parameter| (parameter.clone(), None))
                .collect(),
            return_type: None,
            locals: Frame::default(),
            parent,
            global_writes: BTreeSet::new(),
            nonlocal_writes: BTreeSet::new(),
            captures: BTreeSet::new(),
        };

        self.function_order.push(decl.name.clone());
        self.functions.insert(
            decl.name.clone(),
            FunctionState {
                decl: Rc::clone(decl),
                status: Status::Pending,
                signature,
                returns_seen: false,
                enclosing_blocks: self.blocks.clone(),
            },
        );
        Ok(())
    }

    fn infer_function(&mut self, name: &str) -> Result<(), Error> {
        let (decl, enclosing) = match self.functions.get_mut(name) {
            Some(state) if state.status == Status::Pending => {
                state.status = Status::InProgress;
                (Rc::clone(&state.decl), state.enclosing_blocks.clone())
            }
            _ => return Ok(()),
        };

        // The body sees the blocks around its declaration, not the caller's.
        let outer_blocks = std::mem::replace(&mut self.blocks, enclosing);

        let caller = self.current.replace(name.to_string());
        let result = self.check_block(&decl.body.body);
        self.current = caller;
        self.blocks = outer_blocks;
        result?;

        if let Some(state) = self.functions.get_mut(name) {
            if !state.returns_seen {
                state.signature.return_type = Some(DataType::Void);
            }
            state.status = Status::Done;
        }
        Ok(())
    }

    fn check_block(&mut self, body: &[Stmt]) -> Result<(), Error> {
        for stmt in body {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_scoped_block(&mut self, body: &[Stmt]) -> Result<(), Error> {
        self.blocks.push(self.frames.len());
        self.frames.push(BlockFrame {
            owner: self.current.clone(),
            frame: Frame::default(),
        });
        let result = self.check_block(body);
        self.blocks.pop();
        result
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Expression(stmt) => {
                self.expr_type(&stmt.expression)?;
            }
            Stmt::Assignment(stmt) => {
                let slot = self.expr_type(&stmt.value)?;
                if slot == Some(DataType::Void) {
                    return Err(Error::new(
                        ErrorImpl::UninferableType {
                            name: stmt.identifier.clone(),
                        },
                        stmt.span.start,
                    ));
                }
                self.assign(&stmt.identifier, slot, &stmt.span)?;
            }
            Stmt::Block(block) => self.check_scoped_block(&block.body)?,
            Stmt::If(stmt) => {
                self.condition(&stmt.condition)?;
                self.check_scoped_block(&stmt.then_body.body)?;
                if let Some(else_body) = &stmt.else_body {
                    self.check_stmt(else_body)?;
                }
            }
            Stmt::While(stmt) => {
                self.condition(&stmt.condition)?;
                self.check_scoped_block(&stmt.body.body)?;
            }
            Stmt::FnDecl(decl) => self.register(decl, self.current.clone())?,
            Stmt::Return(stmt) => {
                let slot = match &stmt.value {
                    Some(value) => self.expr_type(value)?,
                    None => Some(DataType::Void),
                };
                self.unify_return(slot, stmt.span.start)?;
            }
        }
        Ok(())
    }

    fn condition(&mut self, condition: &Expr) -> Result<(), Error> {
        match self.expr_type(condition)? {
            Some(DataType::Boolean) | None => Ok(()),
            Some(other) => Err(mismatch(
                "condition",
                DataType::Boolean,
                other,
                condition.get_span().start,
            )),
        }
    }

    fn unify_return(&mut self, slot: Slot, position: Position) -> Result<(), Error> {
        let Some(name) = self.current.clone() else {
            return Ok(());
        };
        let Some(state) = self.functions.get_mut(&name) else {
            return Ok(());
        };

        if !state.returns_seen {
            state.returns_seen = true;
            state.signature.return_type = slot;
            return Ok(());
        }

        match (state.signature.return_type, slot) {
            (Some(expected), Some(received)) if expected != received => Err(Error::new(
                ErrorImpl::ReturnTypeMatchError {
                    function: name,
                    expected: expected.to_string(),
                    received: received.to_string(),
                },
                position,
            )),
            (None, Some(received)) => {
                state.signature.return_type = Some(received);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Finds the scope owning `name`, walking from the innermost open block of
    /// the current function outward.
    fn lookup(&self, name: &str) -> Option<(Owner, Slot)> {
        let mut blocks = self
            .blocks
            .iter()
            .rev()
            .map(|id| &self.frames[*id])
            .peekable();
        let mut scope = self.current.clone();

        loop {
            while let Some(block) = blocks.next_if(|block| block.owner == scope) {
                if let Some(slot) = block.frame.get(name) {
                    return Some((Owner::of(scope), slot));
                }
            }

            let Some(function) = scope else {
                return self.globals.get(name).map(|slot| (Owner::Global, slot));
            };
            let state = self.functions.get(&function)?;
            if let Some(slot) = state
                .signature
                .parameter(name)
                .or_else(|| state.signature.locals.get(name))
            {
                return Some((Owner::Function(function), slot));
            }
            scope = state.signature.parent.clone();
        }
    }

    fn record_capture(&mut self, name: &str, owner: &Owner, write: bool) {
        let Some(current) = self.current.clone() else {
            return;
        };
        if *owner == Owner::Function(current.clone()) {
            return;
        }
        if let Some(state) = self.functions.get_mut(&current) {
            state.signature.captures.insert(name.to_string());
            if write {
                match owner {
                    Owner::Global => state.signature.global_writes.insert(name.to_string()),
                    Owner::Function(_) => state.signature.nonlocal_writes.insert(name.to_string()),
                };
            }
        }
    }

    fn assign(&mut self, name: &str, slot: Slot, span: &Span) -> Result<(), Error> {
        let position = span.start;
        match self.lookup(name) {
            Some((owner, existing)) => {
                if let (Some(expected), Some(received)) = (existing, slot) {
                    if expected != received {
                        return Err(mismatch(name, expected, received, position));
                    }
                }
                self.record_capture(name, &owner, true);
                Ok(())
            }
            None => {
                match self.blocks.last().copied() {
                    Some(id) if self.frames[id].owner == self.current => {
                        self.frames[id].frame.declare(name, slot)
                    }
                    _ => match self
                        .current
                        .clone()
                        .and_then(|current| self.functions.get_mut(&current))
                    {
                        Some(state) => state.signature.locals.declare(name, slot),
                        None => self.globals.declare(name, slot),
                    },
                }
                self.declarations.insert(span_key(span), slot);
                Ok(())
            }
        }
    }

    pub fn expr_type(&mut self, expr: &Expr) -> Result<Slot, Error> {
        let slot = self.infer_expr(expr)?;
        self.expr_types.insert(span_key(expr.get_span()), slot);
        Ok(slot)
    }

    fn infer_expr(&mut self, expr: &Expr) -> Result<Slot, Error> {
        let position = expr.get_span().start;

        match expr {
            Expr::Literal(literal) => Ok(Some(literal.value.kind())),
            Expr::Symbol(symbol) => match self.lookup(&symbol.name) {
                Some((owner, slot)) => {
                    self.record_capture(&symbol.name, &owner, false);
                    Ok(slot)
                }
                None => Err(Error::new(
                    ErrorImpl::UninferableType {
                        name: symbol.name.clone(),
                    },
                    position,
                )),
            },
            Expr::Binary(binary) => {
                let left = self.expr_type(&binary.left)?;
                let right = self.expr_type(&binary.right)?;
                match self.rules.binary(&binary.operator) {
                    Some(rule) => Ok(binary_result(rule.op, left, right)),
                    None => Ok(None),
                }
            }
            Expr::Prefix(prefix) => {
                let operand = self.expr_type(&prefix.operand)?;
                match self.rules.prefix(&prefix.operator).map(|rule| rule.op) {
                    Some(NativeOp::Not) => Ok(Some(DataType::Boolean)),
                    _ => Ok(operand),
                }
            }
            Expr::Call(call) => {
                let mut arguments = vec![];
                for argument in &call.arguments {
                    arguments.push(self.expr_type(argument)?);
                }

                if self.functions.contains_key(&call.name) {
                    return self.call_function(&call.name, &arguments, position);
                }
                if let Some(return_type) = self.builtins.get(&call.name) {
                    return Ok(Some(*return_type));
                }
                Err(Error::new(
                    ErrorImpl::UninferableType {
                        name: call.name.clone(),
                    },
                    position,
                ))
            }
        }
    }

    fn call_function(&mut self, name: &str, arguments: &[Slot], position: Position) -> Result<Slot, Error> {
        let Some(state) = self.functions.get_mut(name) else {
            return Ok(None);
        };

        if state.signature.parameters.len() != arguments.len() {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMatchError {
                    function: name.to_string(),
                    expected: format!("{} arguments", state.signature.parameters.len()),
                    received: format!("{} arguments", arguments.len()),
                },
                position,
            ));
        }

        let first_call = state.status == Status::Pending;
        for ((_, slot), argument) in state.signature.parameters.iter_mut().zip(arguments) {
            match (*slot, *argument) {
                (Some(expected), Some(received)) if expected != received => {
                    return Err(Error::new(
                        ErrorImpl::ArgumentTypeMatchError {
                            function: name.to_string(),
                            expected: expected.to_string(),
                            received: received.to_string(),
                        },
                        position,
                    ))
                }
                (None, received) if first_call => *slot = received,
                _ => {}
            }
        }

        self.infer_function(name)?;

        Ok(self
            .functions
            .get(name)
            .and_then(|state| state.signature.return_type))
    }
}

/// Runs inference over `program` for the language described by `spec`.
pub fn infer(spec: &Specification, rules: &OperatorRules, program: &Program) -> Result<TypeTable, Error> {
    TypeChecker::new(rules, builtin_return_types(spec)).check(program)
}
