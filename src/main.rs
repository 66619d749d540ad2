use std::{
    fs,
    path::{Path, PathBuf},
    process,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use langforge::{
    errors::errors::{Error, ErrorTip},
    get_line_at_position, write_artifacts, Specification, Toolchain,
};

#[derive(Parser)]
#[command(name = "langforge", version, about = "Generate language toolchains from a specification")]
struct Cli {
    /// Print timings for every stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the artifact set for a specification
    Generate {
        spec: PathBuf,
        /// Directory to write the artifacts into
        #[arg(short, long, default_value = "build")]
        out: PathBuf,
    },
    /// Run a program with an interpreted language
    Run { spec: PathBuf, program: PathBuf },
    /// Translate a program with a compiled language
    Compile {
        spec: PathBuf,
        program: PathBuf,
        /// Output file, defaults to the program name with the target's extension
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the tokens of a program
    Tokens { spec: PathBuf, program: PathBuf },
    /// Print the syntax tree of a program
    Ast { spec: PathBuf, program: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Command::Generate { spec, out } => {
            let toolchain = load_toolchain(&spec, cli.verbose)?;
            let artifacts = toolchain.artifacts();

            fs::create_dir_all(&out).with_context(|| format!("Creating {}", out.display()))?;
            write_artifacts(&out, &artifacts)
                .with_context(|| format!("Writing artifacts to {}", out.display()))?;

            for artifact in &artifacts {
                println!("{:<22} {}", artifact.role, out.join(&artifact.file_name).display());
            }
        }
        Command::Run { spec, program } => {
            let toolchain = load_toolchain(&spec, cli.verbose)?;
            let source = read_source(&program)?;

            let run_start = Instant::now();
            let result = toolchain.run_with(&source, &mut |line: &str| println!("{}", line));
            check(result, &source, &program);

            if cli.verbose {
                println!("Ran in {:?}", run_start.elapsed());
            }
        }
        Command::Compile { spec, program, out } => {
            let toolchain = load_toolchain(&spec, cli.verbose)?;
            let source = read_source(&program)?;

            let compile_start = Instant::now();
            let compiled = check(toolchain.compile(&source), &source, &program);

            if cli.verbose {
                println!("Compiled in {:?}", compile_start.elapsed());
            }

            let out = match (out, &toolchain.backend) {
                (Some(out), _) => out,
                (None, langforge::Backend::Compiler(compiler)) => {
                    PathBuf::from(compiler.output_file_name())
                }
                (None, langforge::Backend::Interpreter(_)) => program.with_extension("out"),
            };
            fs::write(&out, compiled).with_context(|| format!("Writing {}", out.display()))?;
            println!("Wrote {}", out.display());
        }
        Command::Tokens { spec, program } => {
            let toolchain = load_toolchain(&spec, cli.verbose)?;
            let source = read_source(&program)?;

            for token in check(toolchain.tokenize(&source), &source, &program) {
                println!("{}", token.debug());
            }
        }
        Command::Ast { spec, program } => {
            let toolchain = load_toolchain(&spec, cli.verbose)?;
            let source = read_source(&program)?;

            let parse_start = Instant::now();
            let ast = check(toolchain.parse_program(&source), &source, &program);

            if cli.verbose {
                println!("Parsed in {:?}", parse_start.elapsed());
            }
            println!("{:#?}", ast);
        }
    }

    if cli.verbose {
        println!("Total time: {:?}", start.elapsed());
    }

    Ok(())
}

/// Reads a specification as YAML (`.yaml`, `.yml`) or JSON (anything else).
fn load_spec(path: &Path) -> Result<Specification> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;

    let yaml = matches!(
        path.extension().and_then(|extension| extension.to_str()),
        Some("yaml") | Some("yml")
    );

    if yaml {
        Specification::from_yaml_str(&content)
            .with_context(|| format!("Parsing {} as YAML", path.display()))
    } else {
        Specification::from_json_str(&content)
            .with_context(|| format!("Parsing {} as JSON", path.display()))
    }
}

fn load_toolchain(path: &Path, verbose: bool) -> Result<Toolchain> {
    let spec = load_spec(path)?;

    let start = Instant::now();
    let toolchain = check(Toolchain::generate(&spec), "", path);

    if verbose {
        println!(
            "Generated {} ({}) in {:?}",
            spec.name,
            toolchain.backend.name(),
            start.elapsed()
        );
    }

    Ok(toolchain)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
}

/// Unwraps a language result, or reports the error against `source` and exits.
fn check<T>(result: Result<T, Error>, source: &str, file: &Path) -> T {
    match result {
        Ok(value) => value,
        Err(error) => {
            display_error(&error, source, file);
            process::exit(1);
        }
    }
}

fn display_error(error: &Error, source: &str, file: &Path) {
    /*
        Error: message (tip)
        -> program.calc
           |
        20 | x = 1 $ 2
           | ------^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {} [{}]", error.get_error_name(), error.kind());
    } else {
        eprintln!(
            "Error: {} [{}] ({})",
            error.get_error_name(),
            error.kind(),
            error.get_tip()
        );
    }
    eprintln!("   {}", error.get_impl());

    let position = error.get_position();
    if position.is_null() {
        eprintln!("-> {}", file.display());
        return;
    }

    eprintln!("-> {}:{}", file.display(), position);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return;
    };

    let line_str = line.to_string();
    let padding = line_str.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_str, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}
