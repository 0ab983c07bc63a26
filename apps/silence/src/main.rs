#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use clap::Parser;
use silence::cli::Cli;
use silence::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(e) = logging::init() {
        eprintln!("logging disabled: {e}");
    }
    tracing::info!(minimized = cli.minimized, "silence! {}", env!("CARGO_PKG_VERSION"));

    run(cli)
}

#[cfg(windows)]
fn run(cli: Cli) -> anyhow::Result<()> {
    use anyhow::Context;

    silence::run(silence::RunOptions {
        minimized: cli.minimized,
    })
    .context("message loop failed")
}

#[cfg(not(windows))]
fn run(_cli: Cli) -> anyhow::Result<()> {
    anyhow::bail!("silence! only runs on Windows")
}
