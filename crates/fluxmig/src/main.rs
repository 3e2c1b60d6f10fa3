#[cfg(all(feature = "mimalloc", not(target_family = "wasm")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use colored::Colorize;
use env_logger::Env;

mod app;
mod config;
mod migrate;

#[derive(Parser)]
#[command(name = "fluxmig")]
#[command(
    about = "Migrate app-template HelmReleases to per-app OCIRepository sources",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(flatten)]
    migrate: migrate::MigrateArgs,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug, RUST_LOG overrides it
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    migrate::execute(cli.migrate)
}
