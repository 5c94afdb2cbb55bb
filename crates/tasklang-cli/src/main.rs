use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tasklang_core::{Diagnostic, StealthProfile, TaskError};
use tasklang_lang::ast::Program;
use tasklang_lang::{Checker, Compiler, Lexer};

#[derive(Parser)]
#[command(
    name = "tasklang",
    version,
    about = "TaskLang — compile browser-automation scripts to Python Selenium"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a .task file to a Python automation script
    Build {
        /// Path to the .task file to compile
        #[arg()]
        file: PathBuf,

        /// Output directory for the generated script (default: output/)
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Path to a JSON stealth profile overriding the built-in one
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Check a .task file for errors (parse + semantic analysis)
    Check {
        /// Path to the .task file to check
        #[arg()]
        file: PathBuf,

        /// Emit diagnostics as JSON for tooling
        #[arg(long)]
        json: bool,
    },

    /// Dump the token stream of a .task file
    Tokens {
        /// Path to the .task file to tokenize
        #[arg()]
        file: PathBuf,
    },

    /// Dump the parsed AST of a .task file
    Ast {
        /// Path to the .task file to parse
        #[arg()]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Build {
            file,
            output,
            profile,
        } => cmd_build(file, output, profile),
        Commands::Check { file, json } => cmd_check(file, json),
        Commands::Tokens { file } => cmd_tokens(file),
        Commands::Ast { file } => cmd_ast(file),
    }
}

fn read_source(file: &Path) -> Result<(String, String)> {
    if file.extension().and_then(|e| e.to_str()) != Some("task") {
        anyhow::bail!("expected a .task file: {}", file.display());
    }
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read file: {}", file.display()))?;
    let file_name = file
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    Ok((source, file_name))
}

fn parse_source(source: &str, file_name: &str) -> Result<Program, TaskError> {
    let tokens = Lexer::new(source, file_name).tokenize()?;
    tasklang_lang::Parser::new(tokens, file_name).parse()
}

fn cmd_build(file: PathBuf, output: PathBuf, profile: Option<PathBuf>) -> Result<()> {
    let (source, file_name) = read_source(&file)?;
    let program = parse_source(&source, &file_name).map_err(|e| anyhow::anyhow!("{}", e))?;
    tracing::debug!("parsed {} statements", program.statements.len());

    match Checker::new(file_name).check(&program) {
        Ok(diags) => {
            for diag in diags {
                println!("{}", diag);
            }
        }
        Err(diags) => {
            for diag in &diags {
                eprintln!("{}", diag);
            }
            let errors = diags
                .iter()
                .filter(|d| d.severity == tasklang_core::DiagnosticSeverity::Error)
                .count();
            anyhow::bail!("compilation failed with {} error(s), no script written", errors);
        }
    }

    let profile = match profile {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read profile: {}", path.display()))?;
            serde_json::from_str::<StealthProfile>(&json)
                .with_context(|| format!("invalid stealth profile: {}", path.display()))?
        }
        None => StealthProfile::default(),
    };

    let script = Compiler::new(profile).generate(&program);

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;
    let stem = file
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let out_path = output.join(format!("{}.py", stem));
    std::fs::write(&out_path, script)
        .with_context(|| format!("failed to write: {}", out_path.display()))?;

    println!("generated {}", out_path.display());
    Ok(())
}

fn cmd_check(file: PathBuf, json: bool) -> Result<()> {
    let (source, file_name) = read_source(&file)?;

    // Lex and parse errors render through the same diagnostic surface as
    // semantic ones.
    let diagnostics = match parse_source(&source, &file_name) {
        Ok(program) => match Checker::new(file_name).check(&program) {
            Ok(diags) => {
                report(&diags, json)?;
                if !json {
                    println!("✓ {} is valid", file.display());
                }
                return Ok(());
            }
            Err(diags) => diags,
        },
        Err(err) => match Diagnostic::from_error(&err) {
            Some(diag) => vec![diag],
            None => return Err(anyhow::anyhow!("{}", err)),
        },
    };

    report(&diagnostics, json)?;
    anyhow::bail!("check failed for {}", file.display());
}

fn report(diagnostics: &[Diagnostic], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(diagnostics)?);
    } else {
        for diag in diagnostics {
            println!("{}", diag);
        }
    }
    Ok(())
}

fn cmd_tokens(file: PathBuf) -> Result<()> {
    let (source, file_name) = read_source(&file)?;
    let tokens = Lexer::new(&source, file_name.as_str())
        .tokenize()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    for token in tokens {
        println!(
            "{:>4}:{:<3} {:?}",
            token.span.line, token.span.column, token.kind
        );
    }
    Ok(())
}

fn cmd_ast(file: PathBuf) -> Result<()> {
    let (source, file_name) = read_source(&file)?;
    let program = parse_source(&source, &file_name).map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("{:#?}", program);
    Ok(())
}
