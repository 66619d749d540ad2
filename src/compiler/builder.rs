use std::{collections::BTreeMap, fmt::Write};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    generator::artifact::{Artifact, ArtifactRole},
    parser::builder::ParserDefinition,
    spec::{
        rules::OperatorRules,
        specification::{DataType, Specification},
        template::NativeFunction,
    },
    type_checker::type_checker::{builtin_return_types, TypeChecker, TypeTable},
};

use super::{compiler::Compiler, expr::sample_binary, targets::TargetLanguage};

const DATA_TYPES: [DataType; 7] = [
    DataType::Integer,
    DataType::Float,
    DataType::String,
    DataType::Boolean,
    DataType::Array,
    DataType::Object,
    DataType::Void,
];

/// Derives a [`CompilerDefinition`]: type inference plus emission for the
/// specification's target language.
pub struct CompilerBuilder<'a> {
    spec: &'a Specification,
    parser: &'a ParserDefinition,
}

/// `my lang` -> `MyLang`; used as the Java class and the output file stem.
pub fn program_name(language: &str) -> String {
    let name: String = language
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Program{}", name)
    } else {
        name
    }
}

impl<'a> CompilerBuilder<'a> {
    pub fn new(spec: &'a Specification, parser: &'a ParserDefinition) -> Self {
        CompilerBuilder { spec, parser }
    }

    pub fn build(&self) -> Result<CompilerDefinition, Error> {
        let target = self.spec.target()?;
        let rules = OperatorRules::from_spec(self.spec)?;

        let mut builtins = BTreeMap::new();
        for builtin in &self.spec.builtin_functions {
            let native = NativeFunction::resolve(builtin).ok_or_else(|| {
                Error::validation(ErrorImpl::UnresolvedBuiltin {
                    name: builtin.name.clone(),
                    implementation: builtin.implementation.clone(),
                })
            })?;
            builtins.insert(builtin.name.clone(), native);
        }
        builtins
            .entry(NativeFunction::Print.name().to_string())
            .or_insert(NativeFunction::Print);

        Ok(CompilerDefinition {
            language: self.parser.language.clone(),
            version: self.spec.version.clone(),
            program_name: program_name(&self.spec.name),
            target,
            rules,
            builtins,
            builtin_types: builtin_return_types(self.spec),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompilerDefinition {
    pub language: String,
    pub version: String,
    pub program_name: String,
    pub target: TargetLanguage,
    pub rules: OperatorRules,
    pub builtins: BTreeMap<String, NativeFunction>,
    pub builtin_types: BTreeMap<String, DataType>,
}

impl CompilerDefinition {
    /// Pass 1: static types for every variable, function and expression.
    pub fn infer(&self, program: &Program) -> Result<TypeTable, Error> {
        TypeChecker::new(&self.rules, self.builtin_types.clone()).check(program)
    }

    /// Both passes: infer, then render the program as target source.
    pub fn compile(&self, program: &Program) -> Result<String, Error> {
        let types = self.infer(program)?;
        Compiler::new(self, types).compile_program(program)
    }

    pub fn output_file_name(&self) -> String {
        format!("{}.{}", self.program_name, self.target.file_extension())
    }

    fn render_emitter(&self) -> String {
        let mut out = String::new();
        let mut compiler = Compiler::new(self, TypeTable::default());

        let _ = writeln!(out, "# {} -> {} code generation", self.language, self.target);
        let _ = writeln!(out, "pass 1: type inference");
        let _ = writeln!(out, "  first assignment fixes a variable's type; a different later type is an error");
        let _ = writeln!(out, "  parameters take the types of the first call's arguments");
        let _ = writeln!(out, "  return type comes from `return` values, void when there are none");
        let _ = writeln!(out, "pass 2: emission");
        let _ = writeln!(
            out,
            "  declarations {}",
            if self.target.is_static() {
                "carry the inferred type"
            } else {
                "are bare"
            }
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "[types]");
        for data_type in DATA_TYPES {
            let mapped = self
                .target
                .type_name(data_type)
                .unwrap_or_else(|| self.target.signature_placeholder());
            let mapped = if mapped.is_empty() { "(dynamic)" } else { mapped };
            let _ = writeln!(out, "{} -> {}", data_type, mapped);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[binary operators]  # symbol operation -> rendering");
        for rule in self.rules.binary_rules() {
            let rendering = sample_binary(&mut compiler, rule)
                .unwrap_or_else(|_| String::from("(depends on operand types)"));
            let _ = writeln!(out, "{} {} -> {}", rule.symbol, rule.op, rendering);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[prefix operators]");
        for rule in self.rules.prefix_rules() {
            let _ = writeln!(out, "{} {}", rule.symbol, rule.op);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[builtins]  # name -> native (return type)");
        for (name, native) in &self.builtins {
            let return_type = self
                .builtin_types
                .get(name)
                .map(DataType::name)
                .unwrap_or("void");
            let _ = writeln!(out, "{} -> {} ({})", name, native, return_type);
        }

        out
    }

    fn render_driver(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# compiler driver for {}", self.language);
        let _ = writeln!(out, "source");
        let _ = writeln!(out, "  -> tokenize      (tokenizer.def)");
        let _ = writeln!(out, "  -> parse         (parser.def)");
        let _ = writeln!(out, "  -> infer types   (codegen.def, pass 1)");
        let _ = writeln!(out, "  -> emit {:<10} (codegen.def, pass 2)", self.target.name());
        let _ = writeln!(out, "  -> {}", self.output_file_name());
        let _ = writeln!(out, "the first error of any pass stops the run");
        let _ = writeln!(out);
        let _ = writeln!(out, "run: {}", self.target.run_command(&self.program_name));

        out
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = vec![
            Artifact::new(ArtifactRole::Emitter, "codegen.def", self.render_emitter()),
            Artifact::new(ArtifactRole::CompilerDriver, "driver.def", self.render_driver()),
        ];

        if let Some(instructions) = self.target.build_instructions(&self.program_name) {
            artifacts.push(Artifact::new(
                ArtifactRole::BuildInstructions,
                "BUILD.md",
                instructions,
            ));
        }

        artifacts
    }
}
