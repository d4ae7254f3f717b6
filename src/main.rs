use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use codebeads::config::load_config;
use codebeads::display::{catalog_table, row_table};
use codebeads::{generate, load_target, BeadTable, Target};

#[derive(Parser)]
#[command(
  name = "codebeads",
  version,
  about = "Packs per-instruction code beads into an opcode-indexed C++ table"
)]
struct Cli {
  /// Catalog file with the target and its instruction records
  catalog: PathBuf,

  /// Write the generated source here instead of stdout
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Configuration file (default: nearest codebeads.toml)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Omit the generated-file banner
  #[arg(long)]
  no_header: bool,

  /// Write rows of zeros as `{ 0x0 }`
  #[arg(long)]
  compact: bool,

  /// List the catalog's instructions in opcode order instead of generating
  #[arg(long, conflicts_with = "query")]
  dump_catalog: bool,

  /// Print the packed beads of one instruction, by name or opcode
  #[arg(long, value_name = "NAME|OPCODE")]
  query: Option<String>,

  /// More logging (-v info, -vv debug); RUST_LOG takes precedence
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(log_filter(cli.verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok()))
    .init();

  let mut config = load_config(cli.config.as_deref())?;
  if cli.no_header {
    config.emit.header = false;
  }
  if cli.compact {
    config.emit.compact_zero_rows = true;
  }

  let file = cli.catalog.display().to_string();
  let text = fs::read_to_string(&cli.catalog)
    .with_context(|| format!("failed to read catalog {}", file))?;
  let target = load_target(&file, &text, &config.catalog)?;

  if cli.dump_catalog {
    print!("{}", catalog_table(&target));
    return Ok(());
  }

  if let Some(query) = &cli.query {
    return query_row(&target, query);
  }

  let mut generated = Vec::new();
  generate(&target, &config.emit, &mut generated)?;

  match &cli.output {
    Some(path) => {
      fs::write(path, &generated)
        .with_context(|| format!("failed to write {}", path.display()))?;
      info!(path = %path.display(), "wrote bead table");
    }
    None => io::stdout().write_all(&generated)?,
  }

  Ok(())
}

/// `RUST_LOG`, when set, replaces the level chosen with `-v`.
fn log_filter(verbose: u8, rust_log: Option<String>) -> EnvFilter {
  if let Some(directives) = rust_log {
    return EnvFilter::new(directives);
  }
  EnvFilter::new(match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  })
}

/// Looks an instruction up by name, falling back to a numeric opcode.
fn query_row(target: &Target, query: &str) -> Result<()> {
  let table = BeadTable::build(target)?;

  let (opcode, row) = match table.get_by_name(query) {
    Some(found) => found,
    None => {
      let opcode = query
        .parse::<usize>()
        .map_err(|_| anyhow!("no instruction named `{}'", query))?;
      let row = table
        .get(opcode)
        .ok_or_else(|| anyhow!("opcode {} is out of range (target has {})", opcode, table.len()))?;
      (opcode, row)
    }
  };
  let name = target
    .name_of(opcode)
    .ok_or_else(|| anyhow!("opcode {} has no instruction", opcode))?;

  print!("{}", row_table(name, opcode, row));
  Ok(())
}
