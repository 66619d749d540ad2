use std::{fmt::Display, fs, io, path::Path};

use serde::Serialize;

/// The logical role an artifact plays in a generated toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    TokenizerDefinition,
    ParserDefinition,
    AstDefinition,
    Grammar,
    Interpreter,
    Environment,
    BuiltinBindings,
    Emitter,
    CompilerDriver,
    BuildInstructions,
}

impl Display for ArtifactRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArtifactRole::TokenizerDefinition => "tokenizer definition",
            ArtifactRole::ParserDefinition => "parser definition",
            ArtifactRole::AstDefinition => "ast definition",
            ArtifactRole::Grammar => "grammar",
            ArtifactRole::Interpreter => "interpreter",
            ArtifactRole::Environment => "environment model",
            ArtifactRole::BuiltinBindings => "builtin bindings",
            ArtifactRole::Emitter => "type inference and emission",
            ArtifactRole::CompilerDriver => "compiler driver",
            ArtifactRole::BuildInstructions => "build instructions",
        };
        write!(f, "{}", name)
    }
}

/// One generated text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub role: ArtifactRole,
    pub file_name: String,
    pub content: String,
}

impl Artifact {
    pub fn new(role: ArtifactRole, file_name: &str, content: String) -> Self {
        Artifact {
            role,
            file_name: file_name.to_string(),
            content,
        }
    }
}

/// Writes every artifact into `dir`, creating it when missing. Existing files
/// with the same names are overwritten.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    for artifact in artifacts {
        fs::write(dir.join(&artifact.file_name), &artifact.content)?;
    }

    Ok(())
}
