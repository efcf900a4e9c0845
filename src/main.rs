// SPDX-License-Identifier: GPL-3.0-or-later
//
// autominter
// Copyright (C) 2025  Nikita Podvirnyi <krypt0nn@vk.com>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;

use alloy::primitives::B256;

pub mod consts;
pub mod utils;
pub mod config;
pub mod api;
pub mod chain;
pub mod report;
pub mod controller;

use config::{Config, ConfigArgs};
use api::{Api, ApiClient};
use chain::{Chain, EvmChain};
use controller::Controller;
use report::Printer;

#[derive(Parser)]
#[command(version, about = "Generate images and mint them as NFTs until credits run out")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    config: ConfigArgs,

    /// Increase logging verbosity. Can be repeated.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8
}

#[derive(Subcommand)]
enum Command {
    /// Print user profile and account state.
    Info,

    /// Recover token ID from an already mined mint transaction.
    Token {
        /// Hash of the mint transaction.
        hash: B256
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::new(&self.config);

        for warning in config.warnings() {
            tracing::warn!("{warning}");
        }

        match self.command {
            None => run_rounds(&config).await,
            Some(Command::Info) => print_info(&config).await,
            Some(Command::Token { hash }) => print_token(&config, hash).await
        }
    }
}

async fn run_rounds(config: &Config) -> anyhow::Result<()> {
    let api = ApiClient::new(config)?;

    let user = api.user().await
        .context("failed to fetch user info")?;

    let chain = EvmChain::connect(config)
        .context("failed to connect wallet")?;

    println!("Starting PreTrillions auto generator & minter");
    println!("=============================================");

    let printer = Printer::new(&user);

    let summary = Controller::new(&api, &chain, &config.mint, &config.rounds)
        .run(&user, |report| printer.print(&report))
        .await;

    for line in printer.render_summary(&summary) {
        println!("{line}");
    }

    Ok(())
}

async fn print_info(config: &Config) -> anyhow::Result<()> {
    let api = ApiClient::new(config)?;

    let user = api.user().await
        .context("failed to fetch user info")?;

    let chain = EvmChain::connect(config)
        .context("failed to connect wallet")?;

    let snapshot = Controller::new(&api, &chain, &config.mint, &config.rounds)
        .fetch_snapshot()
        .await?;

    for line in Printer::new(&user).render_snapshot(&snapshot) {
        println!("{line}");
    }

    println!("Wallet: {}", chain.address());

    Ok(())
}

async fn print_token(config: &Config, hash: B256) -> anyhow::Result<()> {
    let chain = EvmChain::connect(config)
        .context("failed to connect wallet")?;

    let Some(receipt) = chain.receipt(hash).await? else {
        anyhow::bail!("transaction {hash} is not mined yet");
    };

    println!("Transaction: {}", receipt.transaction_hash);

    if let Some(block) = receipt.block_number {
        println!("  Block: {block}");
    }

    println!("  Logs: {}", receipt.logs.len());

    match config.mint.extractor.extract(&receipt) {
        Some(token_id) => println!("  Token ID: {token_id}"),
        None => println!("  Token ID not found")
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Missing .env file is fine, the variables may come from the shell.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.run().await {
        tracing::debug!(?err, "fatal error");

        println!("Fatal error: {}", utils::error_message(&err));
    }

    println!("\nProgram finished.");
}
