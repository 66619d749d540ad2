use crate::{
    errors::errors::{ErrorImpl, ErrorKind},
    spec::{
        fixtures::calculator,
        specification::{Associativity, LanguageKind, Operator},
    },
};

use super::{
    artifact::{write_artifacts, ArtifactRole},
    pipeline::{generate, Backend, Toolchain},
};

fn roles(kind: LanguageKind, target: &str) -> Vec<ArtifactRole> {
    generate(&calculator(kind).with_target(target))
        .unwrap()
        .iter()
        .map(|artifact| artifact.role)
        .collect()
}

#[test]
fn test_interpreted_artifacts() {
    assert_eq!(
        roles(LanguageKind::Interpreted, "python"),
        vec![
            ArtifactRole::TokenizerDefinition,
            ArtifactRole::ParserDefinition,
            ArtifactRole::AstDefinition,
            ArtifactRole::Grammar,
            ArtifactRole::Interpreter,
            ArtifactRole::Environment,
            ArtifactRole::BuiltinBindings,
        ]
    );
}

#[test]
fn test_compiled_artifacts() {
    let front = [
        ArtifactRole::TokenizerDefinition,
        ArtifactRole::ParserDefinition,
        ArtifactRole::AstDefinition,
        ArtifactRole::Grammar,
    ];

    let mut expected = front.to_vec();
    expected.extend([
        ArtifactRole::Emitter,
        ArtifactRole::CompilerDriver,
        ArtifactRole::BuildInstructions,
    ]);
    assert_eq!(roles(LanguageKind::Compiled, "cpp"), expected);

    let mut expected = front.to_vec();
    expected.extend([ArtifactRole::Emitter, ArtifactRole::CompilerDriver]);
    assert_eq!(roles(LanguageKind::Compiled, "javascript"), expected);
}

#[test]
fn test_validation_runs_first() {
    let spec = calculator(LanguageKind::Interpreted).with_operator(Operator::new(
        "+",
        1,
        Associativity::Left,
        "arithmetic",
        "a + b",
    ));

    let err = generate(&spec).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.get_position().is_null());
    assert!(matches!(err.get_impl(), ErrorImpl::DuplicateOperator { symbol } if symbol == "+"));

    let err = generate(&calculator(LanguageKind::Compiled).with_target("cobol")).unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::UnsupportedTarget { target } if target == "cobol"));
}

#[test]
fn test_backend_selection() {
    let interpreted = Toolchain::generate(&calculator(LanguageKind::Interpreted)).unwrap();
    assert!(matches!(interpreted.backend, Backend::Interpreter(_)));
    assert_eq!(interpreted.run("print(1 + 1)").unwrap(), vec!["2"]);

    let err = interpreted.compile("print(1)").unwrap_err();
    assert!(matches!(
        err.get_impl(),
        ErrorImpl::BackendMismatch { requested, available }
            if requested == "compiler" && available == "interpreter"
    ));

    let compiled = Toolchain::generate(&calculator(LanguageKind::Compiled)).unwrap();
    assert!(matches!(compiled.backend, Backend::Compiler(_)));
    assert!(compiled.compile("print(1 + 1)").unwrap().contains("print(1 + 1)"));
    assert!(compiled.run("print(1)").is_err());
}

#[test]
fn test_run_with_streams_output() {
    let toolchain = Toolchain::generate(&calculator(LanguageKind::Interpreted)).unwrap();

    let mut lines = vec![];
    toolchain
        .run_with("print(1)\nprint(2)", &mut |line: &str| lines.push(line.to_string()))
        .unwrap();
    assert_eq!(lines, vec!["1", "2"]);
}

#[test]
fn test_generation_is_deterministic() {
    let spec = calculator(LanguageKind::Compiled).with_target("java");
    assert_eq!(generate(&spec).unwrap(), generate(&spec).unwrap());
}

#[test]
fn test_write_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = generate(&calculator(LanguageKind::Interpreted)).unwrap();

    write_artifacts(dir.path(), &artifacts).unwrap();

    for artifact in &artifacts {
        let written = std::fs::read_to_string(dir.path().join(&artifact.file_name)).unwrap();
        assert_eq!(written, artifact.content);
    }
}
