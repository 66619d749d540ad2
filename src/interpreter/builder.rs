use std::fmt::Write;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    generator::artifact::{Artifact, ArtifactRole},
    parser::builder::ParserDefinition,
    spec::{rules::OperatorRules, specification::Specification, template::NativeFunction},
};

use super::{interpreter::Interpreter, value::BuiltinBinding};

/// Derives an [`InterpreterDefinition`]: the operator dispatch table and the
/// builtin bindings of the outermost scope.
pub struct InterpreterBuilder<'a> {
    spec: &'a Specification,
    parser: &'a ParserDefinition,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(spec: &'a Specification, parser: &'a ParserDefinition) -> Self {
        InterpreterBuilder { spec, parser }
    }

    pub fn build(&self) -> Result<InterpreterDefinition, Error> {
        let dispatch = OperatorRules::from_spec(self.spec)?;

        let mut builtins = vec![];
        for builtin in &self.spec.builtin_functions {
            let native = NativeFunction::resolve(builtin).ok_or_else(|| {
                Error::validation(ErrorImpl::UnresolvedBuiltin {
                    name: builtin.name.clone(),
                    implementation: builtin.implementation.clone(),
                })
            })?;
            builtins.push(BuiltinBinding {
                name: builtin.name.clone(),
                native,
                arity: Some(builtin.parameters.len()),
            });
        }

        // The console builtin is always available.
        if !builtins.iter().any(|builtin| builtin.name == "print") {
            builtins.push(BuiltinBinding {
                name: String::from("print"),
                native: NativeFunction::Print,
                arity: None,
            });
        }

        Ok(InterpreterDefinition {
            language: self.parser.language.clone(),
            dispatch,
            builtins,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterDefinition {
    pub language: String,
    pub dispatch: OperatorRules,
    pub builtins: Vec<BuiltinBinding>,
}

impl InterpreterDefinition {
    /// Evaluates `program`, passing every printed line to `emit` as it happens.
    pub fn run_with(&self, program: &Program, emit: &mut dyn FnMut(&str)) -> Result<(), Error> {
        Interpreter::new(self, emit).run(program)
    }

    /// Evaluates `program` and collects its printed lines.
    pub fn run(&self, program: &Program) -> Result<Vec<String>, Error> {
        let mut output = vec![];
        self.run_with(program, &mut |line: &str| output.push(line.to_string()))?;
        Ok(output)
    }

    fn render_interpreter(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# tree-walking interpreter for {}", self.language);
        let _ = writeln!(out, "Literal     -> value");
        let _ = writeln!(out, "Identifier  -> lookup(name) or UndefinedIdentifier");
        let _ = writeln!(out, "BinaryOp    -> eval left; eval right; dispatch[symbol](left, right)");
        let _ = writeln!(out, "UnaryOp     -> eval operand; prefix[symbol](operand)");
        let _ = writeln!(
            out,
            "Call        -> resolve name; check arity; eval args left to right; invoke"
        );
        let _ = writeln!(out, "If / While  -> condition must be boolean");
        let _ = writeln!(out);
        let _ = writeln!(out, "[binary dispatch]  # symbol rule");
        for rule in self.dispatch.binary_rules() {
            let _ = writeln!(
                out,
                "{} {} = {}",
                rule.symbol,
                rule.op,
                rule.template.render("left", "right")
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "[prefix dispatch]");
        for rule in self.dispatch.prefix_rules() {
            let _ = writeln!(out, "{} {}", rule.symbol, rule.op);
        }

        out
    }

    fn render_environment(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# environment model for {}", self.language);
        let _ = writeln!(out, "scope       = {{ bindings: name -> value, parent: scope | none }}");
        let _ = writeln!(out, "lookup      = innermost scope outward along parent");
        let _ = writeln!(out, "assign      = update nearest existing binding, else bind innermost");
        let _ = writeln!(out, "block       = child of the enclosing scope");
        let _ = writeln!(out, "call        = child of the callee's defining scope, parameters bound by position");
        let _ = writeln!(out, "outermost   = builtin bindings");

        out
    }

    fn render_builtins(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# builtin bindings for {}", self.language);
        for builtin in &self.builtins {
            let arity = match builtin.arity {
                Some(arity) => arity.to_string(),
                None => String::from("variadic"),
            };
            let _ = writeln!(out, "{} -> {} ({})", builtin.name, builtin.native, arity);
        }

        out
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        vec![
            Artifact::new(
                ArtifactRole::Interpreter,
                "interpreter.def",
                self.render_interpreter(),
            ),
            Artifact::new(
                ArtifactRole::Environment,
                "environment.def",
                self.render_environment(),
            ),
            Artifact::new(
                ArtifactRole::BuiltinBindings,
                "builtins.def",
                self.render_builtins(),
            ),
        ]
    }
}
