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

use time::OffsetDateTime;
use time::format_description::OwnedFormatItem;

use autominter_core::prelude::*;

use crate::controller::{RoundOutcome, RunSummary, StopReason};
use crate::utils::short_hash;
use crate::consts::NATIVE_SYMBOL;

lazy_static::lazy_static! {
    /// Format of the timestamp printed before each status line.
    static ref TIME_FORMAT: OwnedFormatItem = time::format_description::parse_owned::<2>(
        "[hour]:[minute]:[second]"
    ).expect("failed to build status line time format");
}

/// Stage of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Generate,
    PrepareMint,
    MintOnChain,
    SetProcessing,
    Confirm
}

impl Step {
    /// Text shown while the step is running.
    pub const fn running(&self) -> &'static str {
        match self {
            Self::Generate      => "Generating image...",
            Self::PrepareMint   => "Preparing mint...",
            Self::MintOnChain   => "Minting on blockchain...",
            Self::SetProcessing => "Setting status to processing...",
            Self::Confirm       => "Confirming mint..."
        }
    }

    /// Text shown when the step has failed.
    pub const fn failed(&self) -> &'static str {
        match self {
            Self::Generate      => "Generation failed",
            Self::PrepareMint   => "Mint preparation failed",
            Self::MintOnChain   => "On-chain mint failed",
            Self::SetProcessing => "Failed to set processing",
            Self::Confirm       => "Confirmation failed"
        }
    }
}

/// Progress event emitted by the rounds controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// New round has started.
    RoundStarted(u64),

    /// Account state fetched at the beginning of the round.
    Snapshot(AccountSnapshot),

    /// Account has only a few credits left.
    LowCredits(i64),

    StepStarted(Step),

    /// Step finished successfully with the given description.
    StepDone(Step, String),

    StepFailed(Step),

    /// Token ID wasn't found so the mint confirmation is not sent.
    ConfirmationSkipped,

    RoundFinished(RoundOutcome),

    /// Waiting before the next round.
    Waiting(Duration),

    /// Rounds loop has stopped.
    Stopped(StopReason)
}

/// Renders controller reports as plain terminal lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printer {
    user: String
}

impl Printer {
    pub fn new(user: &UserProfile) -> Self {
        Self {
            user: user.handle()
        }
    }

    /// Print report to stdout, each line prefixed with the current time.
    pub fn print(&self, report: &Report) {
        let now = OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc());

        let timestamp = now.format(&*TIME_FORMAT)
            .unwrap_or_default();

        for line in self.render(report) {
            if line.is_empty() {
                println!();
            } else {
                println!("[{timestamp}] {line}");
            }
        }
    }

    /// Render account snapshot block.
    pub fn render_snapshot(&self, snapshot: &AccountSnapshot) -> Vec<String> {
        vec![
            String::from("=== USER INFO ==="),
            format!("User: {}", self.user),
            format!("Credits: {}", snapshot.credits),
            format!("Points: {} (Rank: {})", snapshot.points, snapshot.rank),
            format!("Wallet Balance: {} {NATIVE_SYMBOL}", snapshot.balance_ether()),
            String::from("=================")
        ]
    }

    pub fn render(&self, report: &Report) -> Vec<String> {
        match report {
            Report::RoundStarted(round) => vec![String::new(), format!("Round {round}")],
            Report::Snapshot(snapshot) => self.render_snapshot(snapshot),

            Report::LowCredits(credits) => vec![
                format!("Low credits warning! Only {credits} generations left.")
            ],

            Report::StepStarted(step) => vec![format!("  {}", step.running())],
            Report::StepDone(_, text) => vec![format!("✔ {text}")],
            Report::StepFailed(step) => vec![format!("✖ {}", step.failed())],

            Report::ConfirmationSkipped => vec![
                String::from("✖ Token ID not found - skipped confirmation")
            ],

            Report::RoundFinished(RoundOutcome::Confirmed(receipt)) => vec![format!(
                "Round succeeded: tx {}, token {}",
                short_hash(&receipt.transaction_hash),
                receipt.token_id.map(|id| id.to_string()).unwrap_or_default()
            )],

            Report::RoundFinished(RoundOutcome::Unconfirmed(receipt)) => vec![format!(
                "Round minted on-chain (tx {}) but the mint is unconfirmed",
                short_hash(&receipt.transaction_hash)
            )],

            Report::RoundFinished(RoundOutcome::Failed(message)) => vec![
                format!("✖ {message}"),
                String::from("Round failed. Trying again in next round...")
            ],

            Report::Waiting(delay) => vec![
                format!("Waiting {} ms before next round...", delay.as_millis())
            ],

            Report::Stopped(StopReason::NoAccountInfo(message)) => vec![
                format!("✖ {message}"),
                String::from("Failed to get user info. Stopping...")
            ],

            Report::Stopped(StopReason::CreditsExhausted { points, rank }) => vec![
                String::from("Credits exhausted! Stopping the loop."),
                format!("Final stats: {points} points (Rank: {rank})")
            ]
        }
    }

    pub fn render_summary(&self, summary: &RunSummary) -> Vec<String> {
        vec![
            String::new(),
            format!(
                "Rounds: {} ({} attempted), confirmed: {}, unconfirmed: {}, failed: {}",
                summary.rounds,
                summary.cycles(),
                summary.confirmed,
                summary.unconfirmed,
                summary.failed
            )
        ]
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{B256, U256};

    use super::*;

    fn printer() -> Printer {
        Printer::new(&UserProfile {
            external_user_id: String::from("did:privy:1"),
            display_handle: Some(String::from("plasma"))
        })
    }

    #[test]
    fn snapshot_block() {
        let snapshot = AccountSnapshot::new(
            12,
            Points { total_points: 500, rank: 3 },
            U256::from(1_500_000_000_000_000_000_u128)
        );

        let lines = printer().render(&Report::Snapshot(snapshot));

        assert_eq!(lines[1], "User: @plasma");
        assert_eq!(lines[2], "Credits: 12");
        assert_eq!(lines[3], "Points: 500 (Rank: 3)");
        assert_eq!(lines[4], format!("Wallet Balance: 1.5 {NATIVE_SYMBOL}"));
    }

    #[test]
    fn timestamp_format() -> anyhow::Result<()> {
        let moment = OffsetDateTime::from_unix_timestamp(9 * 3600 + 5 * 60 + 7)?;

        assert_eq!(moment.format(&*TIME_FORMAT)?, "09:05:07");

        Ok(())
    }

    #[test]
    fn summary_line() {
        let summary = RunSummary {
            rounds: 5,
            confirmed: 2,
            unconfirmed: 1,
            failed: 1,
            stop: StopReason::CreditsExhausted {
                points: 500,
                rank: 3
            }
        };

        let lines = printer().render_summary(&summary);

        assert_eq!(lines[1], "Rounds: 5 (4 attempted), confirmed: 2, unconfirmed: 1, failed: 1");
    }

    #[test]
    fn round_outcomes() {
        let printer = printer();

        let receipt = MintReceipt {
            transaction_hash: B256::repeat_byte(0x11),
            token_id: Some(U256::from(42))
        };

        let lines = printer.render(&Report::RoundFinished(RoundOutcome::Confirmed(receipt)));

        assert_eq!(lines, vec![String::from("Round succeeded: tx 0x11111111..., token 42")]);

        let lines = printer.render(&Report::RoundFinished(RoundOutcome::Failed(String::from("boom"))));

        assert_eq!(lines[0], "✖ boom");

        let lines = printer.render(&Report::Stopped(StopReason::CreditsExhausted {
            points: 500,
            rank: 3
        }));

        assert_eq!(lines[1], "Final stats: 500 points (Rank: 3)");
    }
}
