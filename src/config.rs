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

use std::time::Duration;

use clap::Args;

use alloy::primitives::Address;

use autominter_core::prelude::*;

use crate::consts;

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Bearer token of the PreTrillions session.
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Legacy name of the bearer token variable.
    #[arg(long = "auth", env = "AUTH", hide = true, hide_env_values = true)]
    pub auth: Option<String>,

    /// JSON-RPC endpoint of the chain.
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Hex encoded private key of the minting wallet.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Base URL of the PreTrillions API.
    #[arg(long, env = "API_URL", default_value = consts::API_URL)]
    pub api_url: String,

    /// Address of the NFT contract.
    #[arg(long, env = "CONTRACT_ADDRESS", default_value = consts::CONTRACT_ADDRESS)]
    pub contract: Address,

    /// Token ID recovery strategies in the order they're tried:
    /// mint-event, topic-shape, transfer-topic.
    #[arg(long = "strategy", value_delimiter = ',')]
    pub strategies: Vec<Strategy>,

    /// Prompt to send to the image generator. Can be repeated.
    #[arg(long = "prompt")]
    pub prompts: Vec<String>,

    /// Delay between rounds in milliseconds.
    #[arg(long, default_value_t = consts::ROUND_DELAY_MS)]
    pub round_delay: u64,

    /// Show low credits warning when this many credits or less are left.
    #[arg(long, default_value_t = consts::LOW_CREDITS)]
    pub low_credits: i64,

    /// Stop waiting for the mint transaction inclusion after this many
    /// seconds. Waits forever if unset.
    #[arg(long)]
    pub confirmation_timeout: Option<u64>
}

/// Parameters of the on-chain mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintConfig {
    pub contract: Address,
    pub extractor: TokenIdExtractor
}

/// Parameters of the rounds loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    pub delay: Duration,
    pub low_credits: i64,
    pub prompts: Vec<String>
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(consts::ROUND_DELAY_MS),
            low_credits: consts::LOW_CREDITS,
            prompts: Vec::new()
        }
    }
}

impl RoundConfig {
    /// Get prompts for the image generator, `None` if none were provided.
    #[inline]
    pub fn prompts(&self) -> Option<&[String]> {
        if self.prompts.is_empty() {
            None
        } else {
            Some(&self.prompts)
        }
    }
}

/// Application configuration. Built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub confirmation_timeout: Option<Duration>,
    pub mint: MintConfig,
    pub rounds: RoundConfig
}

impl Config {
    pub fn new(args: &ConfigArgs) -> Self {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value.as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(String::from)
        }

        let extractor = if args.strategies.is_empty() {
            TokenIdExtractor::default()
        } else {
            TokenIdExtractor::new(args.strategies.iter().copied())
        };

        Self {
            api_url: args.api_url.trim_end_matches('/').to_string(),
            auth_token: non_empty(&args.auth_token).or_else(|| non_empty(&args.auth)),
            rpc_url: non_empty(&args.rpc_url),
            private_key: non_empty(&args.private_key),
            confirmation_timeout: args.confirmation_timeout.map(Duration::from_secs),

            mint: MintConfig {
                contract: args.contract,
                extractor
            },

            rounds: RoundConfig {
                delay: Duration::from_millis(args.round_delay),
                low_credits: args.low_credits,
                prompts: args.prompts.clone()
            }
        }
    }

    /// Get list of configuration problems which don't prevent startup but
    /// will make some requests fail later.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if self.auth_token.is_none() {
            warnings.push("AUTH_TOKEN is not set, API requests will fail to authenticate");
        }

        if self.rpc_url.is_none() {
            warnings.push("RPC_URL is not set, chain requests will fail");
        }

        if self.private_key.is_none() {
            warnings.push("PRIVATE_KEY is not set, transactions can't be signed");
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs
    }

    fn parse(args: &[&str]) -> Config {
        let cli = TestCli::try_parse_from(
            std::iter::once("autominter").chain(args.iter().copied())
        ).expect("failed to parse test arguments");

        Config::new(&cli.config)
    }

    #[test]
    fn explicit_values() {
        let config = parse(&[
            "--auth-token", "token",
            "--rpc-url", "http://127.0.0.1:8545",
            "--private-key", "0x01",
            "--api-url", "http://localhost/api/",
            "--strategy", "topic-shape,mint-event",
            "--prompt", "a cat",
            "--prompt", "in space",
            "--round-delay", "250",
            "--low-credits", "3",
            "--confirmation-timeout", "60"
        ]);

        assert_eq!(config.auth_token.as_deref(), Some("token"));
        assert_eq!(config.api_url, "http://localhost/api");
        assert_eq!(config.mint.extractor.strategies(), &[Strategy::TopicShape, Strategy::MintEvent]);
        assert_eq!(config.rounds.prompts(), Some(&[String::from("a cat"), String::from("in space")][..]));
        assert_eq!(config.rounds.delay, Duration::from_millis(250));
        assert_eq!(config.rounds.low_credits, 3);
        assert_eq!(config.confirmation_timeout, Some(Duration::from_secs(60)));
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn legacy_auth_fallback() {
        let config = parse(&["--auth", "legacy", "--auth-token", " "]);

        assert_eq!(config.auth_token.as_deref(), Some("legacy"));
    }

    #[test]
    fn default_mint_config() {
        let config = parse(&["--auth-token", "token"]);

        assert_eq!(config.mint.contract, consts::CONTRACT_ADDRESS.parse::<Address>().expect("invalid contract address"));
        assert_eq!(config.mint.extractor, TokenIdExtractor::default());
        assert_eq!(config.rounds.prompts(), None);
        assert_eq!(config.confirmation_timeout, None);
    }
}
