//! Source-to-source emission.
//!
//! The [`Compiler`] walks a type-checked program once and renders it into the
//! syntax of the target language, wrapping the result in the target's entry
//! point convention: a bare script for Python and JavaScript, a class with a
//! static `main` for Java, and `int main` for C++.

use std::collections::{BTreeSet, HashSet};

use crate::{
    ast::{
        ast::{Program, Stmt},
        statements::FnDeclStmt,
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::type_checker::{FunctionSignature, Slot, TypeTable},
    Position,
};

use super::{builder::CompilerDefinition, stmt::gen_statement, targets::TargetLanguage};

const INDENT: &str = "    ";

pub struct Compiler<'a> {
    pub definition: &'a CompilerDefinition,
    pub target: TargetLanguage,
    pub types: TypeTable,
    /// Function whose body is being emitted.
    pub current_function: Option<String>,

    out: String,
    indent: usize,
    /// Names declared in each open block, innermost last.
    scopes: Vec<HashSet<String>>,
    imports: BTreeSet<&'static str>,
    /// Support functions emitted ahead of a script's body.
    helpers: BTreeSet<&'static str>,
}

impl<'a> Compiler<'a> {
    pub fn new(definition: &'a CompilerDefinition, types: TypeTable) -> Self {
        Compiler {
            definition,
            target: definition.target,
            types,
            current_function: None,
            out: String::new(),
            indent: 0,
            scopes: vec![HashSet::new()],
            imports: BTreeSet::new(),
            helpers: BTreeSet::new(),
        }
    }

    /// Writes one line at the current indentation.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn indented<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }

    /// Runs `f` against an empty buffer at `indent` and returns what it wrote.
    pub fn capture<F>(&mut self, indent: usize, f: F) -> Result<String, Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let saved_out = std::mem::take(&mut self.out);
        let saved_indent = std::mem::replace(&mut self.indent, indent);

        let result = f(self);

        self.indent = saved_indent;
        let captured = std::mem::replace(&mut self.out, saved_out);
        result.map(|_| captured)
    }

    pub fn written_len(&self) -> usize {
        self.out.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Swaps in a fresh scope stack, returning the previous one.
    pub fn replace_scopes(&mut self, scopes: Vec<HashSet<String>>) -> Vec<HashSet<String>> {
        std::mem::replace(&mut self.scopes, scopes)
    }

    pub fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    /// True when assigning `name` here must introduce a new variable.
    pub fn needs_declaration(&self, name: &str) -> bool {
        if self.scopes.iter().any(|scope| scope.contains(name)) {
            return false;
        }
        match self.current_signature() {
            Some(signature) => {
                !signature.global_writes.contains(name) && !signature.nonlocal_writes.contains(name)
            }
            None => true,
        }
    }

    pub fn current_signature(&self) -> Option<&FunctionSignature> {
        self.current_function
            .as_deref()
            .and_then(|name| self.types.function(name))
    }

    /// The declaration prefix for a variable of type `slot` on a typed target.
    pub fn local_type(&self, slot: Slot) -> &'static str {
        slot.and_then(|data_type| self.target.type_name(data_type))
            .unwrap_or_else(|| self.target.local_placeholder())
    }

    pub fn signature_type(&self, slot: Slot) -> &'static str {
        slot.and_then(|data_type| self.target.type_name(data_type))
            .unwrap_or_else(|| self.target.signature_placeholder())
    }

    pub fn require_import(&mut self, import: &'static str) {
        self.imports.insert(import);
    }

    pub fn require_helper(&mut self, helper: &'static str) {
        self.helpers.insert(helper);
    }

    pub fn unsupported(&self, construct: String, position: Position) -> Error {
        Error::new(
            ErrorImpl::UnsupportedConstruct {
                construct,
                target: self.target.to_string(),
            },
            position,
        )
    }

    fn header(&self) -> String {
        format!(
            "{} {} {} compiled to {} by langforge",
            self.target.comment(),
            self.definition.language,
            self.definition.version,
            self.target
        )
    }

    fn statements(&mut self, body: &[Stmt], indent: usize) -> Result<String, Error> {
        self.capture(indent, |compiler| {
            for stmt in body {
                gen_statement(compiler, stmt)?;
            }
            Ok(())
        })
    }

    /// Top-level functions and the remaining top-level statements, apart.
    fn split_program<'p>(&self, program: &'p Program) -> (Vec<&'p FnDeclStmt>, Vec<Stmt>) {
        let mut functions = vec![];
        let mut main = vec![];

        for stmt in &program.body {
            match stmt {
                Stmt::FnDecl(decl) => functions.push(decl.as_ref()),
                other => main.push(other.clone()),
            }
        }

        (functions, main)
    }

    pub fn compile_program(mut self, program: &Program) -> Result<String, Error> {
        match self.target {
            TargetLanguage::Python => self.compile_script(program),
            TargetLanguage::JavaScript => self.compile_script(program),
            TargetLanguage::Java => self.compile_java(program),
            TargetLanguage::Cpp => self.compile_cpp(program),
        }
    }

    fn compile_script(&mut self, program: &Program) -> Result<String, Error> {
        let body = self.statements(&program.body, 0)?;

        let mut out = self.header();
        out.push('\n');
        if self.target == TargetLanguage::JavaScript {
            out.push_str("\"use strict\";\n");
        }
        for import in &self.imports {
            out.push_str(&format!("import {}\n", import));
        }
        out.push('\n');
        for helper in &self.helpers {
            out.push_str(helper);
            out.push('\n');
        }
        out.push_str(&body);
        Ok(out)
    }

    fn compile_java(&mut self, program: &Program) -> Result<String, Error> {
        let (functions, main) = self.split_program(program);

        let mut methods = vec![];
        for decl in functions {
            methods.push(self.capture(1, |compiler| {
                super::stmt::gen_fn_decl(compiler, decl)
            })?);
        }
        let main = self.statements(&main, 2)?;

        let class_name = &self.definition.program_name;
        let mut out = self.header();
        out.push_str("\n\n");
        out.push_str(&format!("public class {} {{\n", class_name));
        for method in methods {
            out.push_str(&method);
            out.push('\n');
        }
        out.push_str("    public static void main(String[] args) {\n");
        out.push_str(&main);
        out.push_str("    }\n");
        out.push_str("}\n");
        Ok(out)
    }

    fn compile_cpp(&mut self, program: &Program) -> Result<String, Error> {
        let (functions, main) = self.split_program(program);

        let mut prototypes = vec![];
        let mut definitions = vec![];
        for decl in functions {
            if let Some(prototype) = super::stmt::cpp_prototype(self, decl) {
                prototypes.push(prototype);
            }
            definitions.push(self.capture(0, |compiler| {
                super::stmt::gen_fn_decl(compiler, decl)
            })?);
        }
        let main = self.statements(&main, 1)?;

        let mut out = self.header();
        out.push_str("\n\n");
        let mut includes = self.imports.clone();
        includes.extend(["algorithm", "cmath", "cstdint", "iostream", "string"]);
        for include in includes {
            out.push_str(&format!("#include <{}>\n", include));
        }
        out.push('\n');
        for helper in &self.helpers {
            out.push_str(helper);
            out.push('\n');
        }
        if !prototypes.is_empty() {
            for prototype in prototypes {
                out.push_str(&prototype);
                out.push('\n');
            }
            out.push('\n');
        }
        for definition in definitions {
            out.push_str(&definition);
            out.push('\n');
        }
        out.push_str("int main() {\n");
        out.push_str("    std::cout << std::boolalpha;\n");
        out.push_str(&main);
        out.push_str("    return 0;\n");
        out.push_str("}\n");
        Ok(out)
    }
}
