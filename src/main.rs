use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser as ClapParser, ValueEnum};
use log::{info, LevelFilter};
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::NamedTempFile;

use kat_rust::codegen::{Assembly, CodeGenerator};
use kat_rust::lexer::{tokenize, Token};
use kat_rust::parser::Parser;

#[derive(ClapParser)]
#[command(name = "katc")]
#[command(about = "Compiler for the Kat language", long_about = None)]
struct Cli {
    /// Input file path (must end in .kat)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output file path (defaults to the input path with an .asm extension)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// What to produce: assembly, or the token list / AST on stdout
    #[arg(long, value_enum, default_value_t = Emit::Asm)]
    emit: Emit,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Asm,
    Tokens,
    Ast,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            eprintln!("{}", usage_error_line(&err));
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Condense a clap usage error to one `error: …` line, dropping the usage block
fn usage_error_line(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let summary = rendered
        .lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if summary.starts_with("error:") {
        summary
    } else {
        format!("error: {summary}")
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let path = &cli.file;
    if path.extension().and_then(OsStr::to_str) != Some("kat") {
        bail!("input file '{}' must have a .kat extension", path.display());
    }

    let input = fs::read_to_string(path)
        .with_context(|| format!("failed to read file '{}'", path.display()))?;

    let tokens = tokenize(&input)
        .with_context(|| format!("failed to tokenize '{}'", path.display()))?;
    info!("{}: {} tokens", path.display(), tokens.len());

    if cli.emit == Emit::Tokens {
        print_tokens(path, &tokens);
        return Ok(());
    }

    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()
        .with_context(|| format!("failed to parse '{}'", path.display()))?;

    if cli.emit == Emit::Ast {
        println!("{program:#?}");
        return Ok(());
    }

    let assembly = CodeGenerator::new().generate(&program)
        .with_context(|| format!("failed to generate code for '{}'", path.display()))?;

    let output = cli.output.clone().unwrap_or_else(|| path.with_extension("asm"));
    write_output(&output, &assembly)
        .with_context(|| format!("failed to write assembly to '{}'", output.display()))?;
    info!("assembly written to {}", output.display());

    Ok(())
}

fn print_tokens(path: &Path, tokens: &[Token]) {
    for token in tokens {
        println!(
            "{}:{}:{} {:?} {}",
            path.display(),
            token.pos.line,
            token.pos.column,
            token.kind,
            token.lexeme
        );
    }
    println!("\nTotal tokens: {}", tokens.len());
}

/// Write through a temporary file in the target directory so the output
/// path only ever holds complete assembly
fn write_output(path: &Path, assembly: &Assembly) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    assembly.write_to(&mut file)?;
    file.flush()?;
    file.persist(path)?;
    Ok(())
}
