//! Tree-walking evaluator.
//!
//! Statements run in an [`Environment`] chain; expressions dispatch operator
//! nodes through the [`DispatchTable`] built for the language. Calls create a
//! child of the callee's defining scope, so functions close over their
//! surroundings.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{CallExpr, Literal},
        statements::BlockStmt,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    builder::InterpreterDefinition,
    environment::Environment,
    natives::call_native,
    value::{Closure, Value},
};

/// Deepest nesting of user function calls before evaluation stops.
pub const MAX_CALL_DEPTH: usize = 64;

/// Deepest nesting of statements and expressions being evaluated at once,
/// across calls. Evaluation recurses on the host stack, so this keeps it well
/// inside the 2 MiB of a spawned thread.
pub const MAX_EVAL_DEPTH: usize = 256;

type Scope = Rc<RefCell<Environment>>;

pub struct Interpreter<'a> {
    definition: &'a InterpreterDefinition,
    globals: Scope,
    emit: &'a mut dyn FnMut(&str),
    depth: usize,
    nesting: usize,
    /// Scopes that functions were declared in. A function holds its scope and
    /// the scope holds the function, so these are cleared when evaluation ends.
    closure_scopes: Vec<Weak<RefCell<Environment>>>,
}

impl<'a> Interpreter<'a> {
    pub fn new(definition: &'a InterpreterDefinition, emit: &'a mut dyn FnMut(&str)) -> Self {
        let globals = Environment::global();
        for builtin in &definition.builtins {
            globals
                .borrow_mut()
                .define(&builtin.name, Value::Builtin(Rc::new(builtin.clone())));
        }

        Interpreter {
            definition,
            globals,
            emit,
            depth: 0,
            nesting: 0,
            closure_scopes: vec![],
        }
    }

    pub fn globals(&self) -> &Scope {
        &self.globals
    }

    pub fn run(&mut self, program: &Program) -> Result<(), Error> {
        let globals = Rc::clone(&self.globals);
        for stmt in &program.body {
            // `return` cannot reach the top level; the parser rejects it.
            self.execute(stmt, &globals)?;
        }
        Ok(())
    }

    /// Scopes still reachable that functions were declared in.
    pub fn closure_scopes(&self) -> usize {
        self.closure_scopes
            .iter()
            .filter(|scope| scope.strong_count() > 0)
            .count()
    }

    fn enter(&mut self, position: Position) -> Result<(), Error> {
        if self.nesting >= MAX_EVAL_DEPTH {
            return Err(Error::new(
                ErrorImpl::EvaluationTooDeep {
                    limit: MAX_EVAL_DEPTH,
                },
                position,
            ));
        }
        self.nesting += 1;
        Ok(())
    }

    /// Runs one statement. `Some` carries a value out of a `return`.
    fn execute(&mut self, stmt: &Stmt, env: &Scope) -> Result<Option<Value>, Error> {
        self.enter(stmt.get_span().start)?;
        let result = self.execute_stmt(stmt, env);
        self.nesting -= 1;
        result
    }

    fn execute_stmt(&mut self, stmt: &Stmt, env: &Scope) -> Result<Option<Value>, Error> {
        match stmt {
            Stmt::Expression(stmt) => {
                self.evaluate(&stmt.expression, env)?;
                Ok(None)
            }
            Stmt::Assignment(stmt) => {
                let value = self.evaluate(&stmt.value, env)?;
                env.borrow_mut().assign(&stmt.identifier, value);
                Ok(None)
            }
            Stmt::Block(block) => self.execute_scoped(block, env),
            Stmt::If(stmt) => {
                if self.condition(&stmt.condition, env)? {
                    self.execute_scoped(&stmt.then_body, env)
                } else if let Some(else_body) = &stmt.else_body {
                    self.execute(else_body, env)
                } else {
                    Ok(None)
                }
            }
            Stmt::While(stmt) => {
                while self.condition(&stmt.condition, env)? {
                    if let Some(value) = self.execute_scoped(&stmt.body, env)? {
                        return Ok(Some(value));
                    }
                }
                Ok(None)
            }
            Stmt::FnDecl(decl) => {
                let closure = Closure {
                    decl: Rc::clone(decl),
                    env: Rc::clone(env),
                };
                env.borrow_mut()
                    .define(&decl.name, Value::Function(Rc::new(closure)));

                let tracked = self
                    .closure_scopes
                    .iter()
                    .any(|scope| Weak::as_ptr(scope) == Rc::as_ptr(env));
                if !tracked {
                    self.closure_scopes.retain(|scope| scope.strong_count() > 0);
                    self.closure_scopes.push(Rc::downgrade(env));
                }
                Ok(None)
            }
            Stmt::Return(stmt) => {
                let value = match &stmt.value {
                    Some(value) => self.evaluate(value, env)?,
                    None => Value::Void,
                };
                Ok(Some(value))
            }
        }
    }

    /// Runs `block` in a fresh child of `env`.
    fn execute_scoped(&mut self, block: &BlockStmt, env: &Scope) -> Result<Option<Value>, Error> {
        let scope = Environment::child(env);
        let result = self.execute_block(block, &scope);
        release(&scope);
        result
    }

    fn execute_block(&mut self, block: &BlockStmt, env: &Scope) -> Result<Option<Value>, Error> {
        for stmt in block.iter() {
            if let Some(value) = self.execute(stmt, env)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn condition(&mut self, expr: &Expr, env: &Scope) -> Result<bool, Error> {
        match self.evaluate(expr, env)? {
            Value::Boolean(value) => Ok(value),
            other => Err(Error::new(
                ErrorImpl::ConditionNotBoolean {
                    found: other.type_name().to_string(),
                },
                expr.get_span().start,
            )),
        }
    }

    pub fn evaluate(&mut self, expr: &Expr, env: &Scope) -> Result<Value, Error> {
        self.enter(expr.get_span().start)?;
        let result = self.evaluate_expr(expr, env);
        self.nesting -= 1;
        result
    }

    fn evaluate_expr(&mut self, expr: &Expr, env: &Scope) -> Result<Value, Error> {
        let position = expr.get_span().start;

        match expr {
            Expr::Literal(literal) => Ok(match &literal.value {
                Literal::Integer(value) => Value::Integer(*value),
                Literal::Float(value) => Value::Float(*value),
                Literal::String(value) => Value::String(value.clone()),
                Literal::Boolean(value) => Value::Boolean(*value),
            }),
            Expr::Symbol(symbol) => env.borrow().get(&symbol.name).ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndefinedIdentifier {
                        name: symbol.name.clone(),
                    },
                    position,
                )
            }),
            Expr::Binary(binary) => {
                let left = self.evaluate(&binary.left, env)?;
                let right = self.evaluate(&binary.right, env)?;
                let rule = self.definition.dispatch.binary(&binary.operator).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::InvalidOperands {
                            operator: binary.operator.clone(),
                            left: left.type_name().to_string(),
                            right: right.type_name().to_string(),
                        },
                        position,
                    )
                })?;
                rule.apply_binary(left, right)
                    .map_err(|err| Error::new(err, position))
            }
            Expr::Prefix(prefix) => {
                let operand = self.evaluate(&prefix.operand, env)?;
                let rule = self.definition.dispatch.prefix(&prefix.operator).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::InvalidOperand {
                            operator: prefix.operator.clone(),
                            operand: operand.type_name().to_string(),
                        },
                        position,
                    )
                })?;
                rule.apply_unary(operand)
                    .map_err(|err| Error::new(err, position))
            }
            Expr::Call(call) => self.call(call, env, position),
        }
    }

    fn call(&mut self, call: &CallExpr, env: &Scope, position: Position) -> Result<Value, Error> {
        let callee = env.borrow().get(&call.name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UndefinedIdentifier {
                    name: call.name.clone(),
                },
                position,
            )
        })?;

        let arity = match &callee {
            Value::Function(closure) => Some(closure.decl.parameters.len()),
            Value::Builtin(builtin) => builtin.arity,
            _ => {
                return Err(Error::new(
                    ErrorImpl::NotCallable {
                        name: call.name.clone(),
                    },
                    position,
                ))
            }
        };
        if let Some(expected) = arity {
            if expected != call.arguments.len() {
                return Err(Error::new(
                    ErrorImpl::ArityMismatch {
                        name: call.name.clone(),
                        expected,
                        received: call.arguments.len(),
                    },
                    position,
                ));
            }
        }

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument, env)?);
        }

        match callee {
            Value::Builtin(builtin) => call_native(builtin.native, &builtin.name, arguments, &mut *self.emit)
                .map_err(|err| Error::new(err, position)),
            Value::Function(closure) => {
                if self.depth >= MAX_CALL_DEPTH {
                    return Err(Error::new(
                        ErrorImpl::RecursionLimit {
                            limit: MAX_CALL_DEPTH,
                        },
                        position,
                    ));
                }

                let scope = Environment::child(&closure.env);
                for (parameter, value) in closure.decl.parameters.iter().zip(arguments) {
                    scope.borrow_mut().define(parameter, value);
                }

                self.depth += 1;
                let result = self.execute_block(&closure.decl.body, &scope);
                self.depth -= 1;
                release(&scope);

                Ok(result?.unwrap_or(Value::Void))
            }
            _ => Err(Error::new(
                ErrorImpl::NotCallable {
                    name: call.name.clone(),
                },
                position,
            )),
        }
    }
}

impl Drop for Interpreter<'_> {
    fn drop(&mut self) {
        for scope in self.closure_scopes.drain(..) {
            if let Some(scope) = scope.upgrade() {
                scope.borrow_mut().clear();
            }
        }
        self.globals.borrow_mut().clear();
    }
}

/// Clears a finished scope whose functions did not escape it, breaking the
/// reference cycle between them.
fn release(scope: &Scope) {
    if Environment::is_self_contained(scope) {
        scope.borrow_mut().clear();
    }
}
