use crate::{
    ast::ast::Program,
    compiler::builder::{CompilerBuilder, CompilerDefinition},
    errors::errors::{Error, ErrorImpl},
    interpreter::builder::{InterpreterBuilder, InterpreterDefinition},
    lexer::{builder::LexerBuilder, lexer::LexerDefinition, tokens::Token},
    parser::builder::{ParserBuilder, ParserDefinition},
    spec::specification::{LanguageKind, Specification},
};

use super::artifact::Artifact;

/// The final stage, selected by the specification's language kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    Interpreter(InterpreterDefinition),
    Compiler(CompilerDefinition),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Interpreter(_) => "interpreter",
            Backend::Compiler(_) => "compiler",
        }
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        match self {
            Backend::Interpreter(interpreter) => interpreter.artifacts(),
            Backend::Compiler(compiler) => compiler.artifacts(),
        }
    }
}

/// Everything generated from one specification. Holds no reference to it and
/// no shared state, so toolchains can move freely between threads.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub lexer: LexerDefinition,
    pub parser: ParserDefinition,
    pub backend: Backend,
}

impl Toolchain {
    /// Validates `spec`, then runs the builders in order. The first error stops generation.
    pub fn generate(spec: &Specification) -> Result<Self, Error> {
        spec.validate()?;

        let lexer = LexerBuilder::new(spec).build()?;
        let parser = ParserBuilder::new(spec, &lexer).build()?;
        let backend = match spec.language_kind {
            LanguageKind::Interpreted => {
                Backend::Interpreter(InterpreterBuilder::new(spec, &parser).build()?)
            }
            LanguageKind::Compiled => Backend::Compiler(CompilerBuilder::new(spec, &parser).build()?),
        };

        Ok(Toolchain {
            lexer,
            parser,
            backend,
        })
    }

    /// Tokenizer, parser and backend artifacts, in that order.
    pub fn artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = vec![self.lexer.artifact()];
        artifacts.extend(self.parser.artifacts());
        artifacts.extend(self.backend.artifacts());
        artifacts
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, Error> {
        self.lexer.tokenize(source)
    }

    pub fn parse_program(&self, source: &str) -> Result<Program, Error> {
        self.parser.parse(self.tokenize(source)?)
    }

    fn mismatch(&self, requested: &str) -> Error {
        Error::validation(ErrorImpl::BackendMismatch {
            requested: requested.to_string(),
            available: self.backend.name().to_string(),
        })
    }

    /// Evaluates `source`, streaming printed lines to `emit`.
    pub fn run_with(&self, source: &str, emit: &mut dyn FnMut(&str)) -> Result<(), Error> {
        match &self.backend {
            Backend::Interpreter(interpreter) => {
                interpreter.run_with(&self.parse_program(source)?, emit)
            }
            Backend::Compiler(_) => Err(self.mismatch("interpreter")),
        }
    }

    pub fn run(&self, source: &str) -> Result<Vec<String>, Error> {
        match &self.backend {
            Backend::Interpreter(interpreter) => interpreter.run(&self.parse_program(source)?),
            Backend::Compiler(_) => Err(self.mismatch("interpreter")),
        }
    }

    /// Translates `source` into the target language.
    pub fn compile(&self, source: &str) -> Result<String, Error> {
        match &self.backend {
            Backend::Compiler(compiler) => compiler.compile(&self.parse_program(source)?),
            Backend::Interpreter(_) => Err(self.mismatch("compiler")),
        }
    }
}

/// Generates the artifact set for `spec`.
pub fn generate(spec: &Specification) -> Result<Vec<Artifact>, Error> {
    Ok(Toolchain::generate(spec)?.artifacts())
}
