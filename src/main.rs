//! rowdb - a single-file table of fixed-width user records

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use rowdb::access::Table;
use rowdb::config::TableConfig;
use rowdb::session::Session;
use rowdb::storage::TABLE_MAX_PAGES;
use std::io;
use std::path::PathBuf;

/// rowdb - append and scan user records stored in a single file
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database file, created if it does not exist
    filename: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Maximum number of pages the table may grow to
    #[arg(long, default_value_t = TABLE_MAX_PAGES)]
    max_pages: usize,

    /// Pages kept in memory before the least recently used is written out
    #[arg(long)]
    cache_pages: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; keep them quiet unless asked so stdout stays clean
    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = TableConfig::default().with_max_pages(args.max_pages);
    if let Some(cache_pages) = args.cache_pages {
        config = config.with_cache_pages(cache_pages);
    }

    let table = Table::open_with_config(&args.filename, config)
        .with_context(|| format!("Unable to open file {}", args.filename.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(table).run(stdin.lock(), stdout.lock())
}
