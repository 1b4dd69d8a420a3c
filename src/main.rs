use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use covbridge::config::{absolute_root, Config};
use covbridge::dialect::Dialect;
use covbridge::symbols::NmDump;

/// covbridge — Convert Intel codecov XML to Cobertura XML, adding source
/// files and functions that never ran.
///
/// Should be run in the project's root folder.
#[derive(Parser)]
#[command(name = "covbridge", version, about)]
struct Cli {
    /// Name of the codecov XML file.
    from_file: PathBuf,

    /// Relative path to the source files.
    source_path: PathBuf,

    /// Relative path to the object files.
    object_path: PathBuf,

    /// Name of the (output) Cobertura XML file.
    to_file: PathBuf,

    /// Relative path to the source files to be used in the output XML
    /// (default: SOURCE_PATH). Useful when two reports of the same sources
    /// must be told apart.
    #[arg(long)]
    out_src_path: Option<PathBuf>,

    /// Matching and path-rewriting rules.
    #[arg(long, value_enum, default_value_t = Dialect::Strict)]
    dialect: Dialect,

    /// Source file extension to look for (repeatable; default: f, f90).
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Program used to list the symbols of an object file.
    #[arg(long = "nm", value_name = "PROGRAM", default_value = "nm")]
    nm_program: String,

    /// Directory that vendor paths are made relative to (default: current
    /// directory).
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let project_root = match cli.project_root {
        Some(root) => absolute_root(&cwd, &root),
        None => cwd,
    };

    let mut config = Config::new(project_root, cli.source_path, cli.object_path)
        .with_extensions(&cli.extensions);
    if let Some(out) = cli.out_src_path {
        config.out_src_path = out;
    }
    config.dialect = cli.dialect;
    config.nm_program = cli.nm_program;

    let dump = NmDump::new(config.nm_program.clone());
    let timestamp = chrono::Utc::now().timestamp();

    let out = covbridge::cli::cmd_convert(
        &config,
        &cli.from_file,
        &cli.to_file,
        &dump,
        timestamp,
        cli.json,
    )?;
    print!("{out}");
    Ok(())
}
