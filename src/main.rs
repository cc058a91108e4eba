use anyhow::Result;
use clap::Parser;
use sklep::{Config, FileStorage, Session, Store};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File the product list is stored in.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Log more detail to stderr, repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    let config = Config::load(cli.file)?;
    let storage = FileStorage::new(config.file);
    log::info!("Using data file {:?}", storage.path());
    let mut store = Store::open(storage)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(&mut store, stdin.lock(), stdout.lock()).run()
}
