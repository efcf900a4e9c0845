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

use autominter_core::prelude::*;

use crate::api::Api;
use crate::chain::Chain;
use crate::config::{MintConfig, RoundConfig};
use crate::report::{Report, Step};
use crate::utils::{error_message, short_hash};

/// Result of a single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Token minted and the mint is confirmed in the service.
    Confirmed(MintReceipt),

    /// Token minted on-chain but its ID wasn't found in the transaction
    /// logs, so the mint confirmation was skipped.
    Unconfirmed(MintReceipt),

    /// Round failed with the given message.
    Failed(String)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Account state couldn't be fetched.
    NoAccountInfo(String),

    /// No generation credits left.
    CreditsExhausted {
        points: i64,
        rank: i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Amount of started rounds, including the one which stopped the loop.
    pub rounds: u64,

    pub confirmed: u64,
    pub unconfirmed: u64,
    pub failed: u64,

    pub stop: StopReason
}

impl RunSummary {
    /// Amount of rounds which went past the account check.
    #[inline]
    pub const fn cycles(&self) -> u64 {
        self.confirmed + self.unconfirmed + self.failed
    }
}

/// Drives generate, mint and confirm rounds until credits are exhausted or
/// the account state can't be fetched.
pub struct Controller<'a, A, C> {
    api: &'a A,
    chain: &'a C,
    mint: &'a MintConfig,
    rounds: &'a RoundConfig
}

impl<'a, A: Api, C: Chain> Controller<'a, A, C> {
    pub const fn new(
        api: &'a A,
        chain: &'a C,
        mint: &'a MintConfig,
        rounds: &'a RoundConfig
    ) -> Self {
        Self {
            api,
            chain,
            mint,
            rounds
        }
    }

    /// Fetch credits, points and wallet balance concurrently.
    pub async fn fetch_snapshot(&self) -> anyhow::Result<AccountSnapshot> {
        let (credits, points, balance) = futures::try_join!(
            async { self.api.credits().await.context("failed to check credits") },
            async { self.api.points().await.context("failed to check points") },
            self.chain.balance()
        )?;

        Ok(AccountSnapshot::new(credits, points, balance))
    }

    /// Run rounds until a stop condition is reached. Failures within a round
    /// are reported through `output` and never stop the loop.
    pub async fn run(
        &self,
        user: &UserProfile,
        output: impl Fn(Report)
    ) -> RunSummary {
        let mut rounds = 0;
        let mut confirmed = 0;
        let mut unconfirmed = 0;
        let mut failed = 0;

        tracing::info!(
            wallet = %self.chain.address(),
            contract = %self.mint.contract,
            strategies = ?self.mint.extractor.strategies(),
            "starting rounds loop"
        );

        let stop = loop {
            rounds += 1;

            output(Report::RoundStarted(rounds));

            let snapshot = match self.fetch_snapshot().await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    tracing::warn!(?err, "failed to fetch account snapshot");

                    break StopReason::NoAccountInfo(error_message(&err));
                }
            };

            output(Report::Snapshot(snapshot));

            if snapshot.is_exhausted() {
                break StopReason::CreditsExhausted {
                    points: snapshot.points,
                    rank: snapshot.rank
                };
            }

            if snapshot.is_low(self.rounds.low_credits) {
                output(Report::LowCredits(snapshot.credits));
            }

            let outcome = match self.run_round(user, &output).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::debug!(round = rounds, ?err, "round failed");

                    RoundOutcome::Failed(error_message(&err))
                }
            };

            match &outcome {
                RoundOutcome::Confirmed(_) => confirmed += 1,
                RoundOutcome::Unconfirmed(_) => unconfirmed += 1,
                RoundOutcome::Failed(_) => failed += 1
            }

            output(Report::RoundFinished(outcome));
            output(Report::Waiting(self.rounds.delay));

            tokio::time::sleep(self.rounds.delay).await;
        };

        output(Report::Stopped(stop.clone()));

        RunSummary {
            rounds,
            confirmed,
            unconfirmed,
            failed,
            stop
        }
    }

    /// Generate an image, mint it and report the mint status.
    async fn run_round(
        &self,
        user: &UserProfile,
        output: &impl Fn(Report)
    ) -> anyhow::Result<RoundOutcome> {
        let failed = |step| move |_: &anyhow::Error| output(Report::StepFailed(step));

        output(Report::StepStarted(Step::Generate));

        let generated = self.api.generate_image(self.rounds.prompts())
            .await
            .context("failed to generate image")
            .inspect_err(failed(Step::Generate))?;

        let image = generated.id()
            .map(String::from)
            .ok_or_else(|| anyhow::Error::from(ApiError::MissingField("imageId")))
            .inspect_err(failed(Step::Generate))?;

        let text = match &generated.image_url {
            Some(url) => format!("Image generated (ID: {image}, URL: {url})"),
            None => format!("Image generated (ID: {image})")
        };

        output(Report::StepDone(Step::Generate, text));
        output(Report::StepStarted(Step::PrepareMint));

        let mint = self.api.register_mint(&image, &user.external_user_id)
            .await
            .context("failed to prepare mint")
            .inspect_err(failed(Step::PrepareMint))?;

        output(Report::StepDone(Step::PrepareMint, format!("Mint prepared (Mint ID: {})", mint.mint_id)));
        output(Report::StepStarted(Step::MintOnChain));

        let receipt = self.chain.mint(&mint.metadata_uri)
            .await
            .context("failed to mint on-chain")
            .inspect_err(failed(Step::MintOnChain))?;

        let hash = receipt.transaction_hash;

        output(Report::StepDone(Step::MintOnChain, format!("Minted on-chain (tx: {})", short_hash(&hash))));

        let token_id = self.mint.extractor.extract(&receipt);

        if token_id.is_none() {
            tracing::warn!(
                %hash,
                block = ?receipt.block_number,
                logs = receipt.logs.len(),
                "token id not found in transaction logs"
            );
        }

        output(Report::StepStarted(Step::SetProcessing));

        let update = MintStatusUpdate::processing(&mint.mint_id, hash);

        self.api.update_status(&update)
            .await
            .context("failed to set processing status")
            .inspect_err(failed(Step::SetProcessing))?;

        output(Report::StepDone(Step::SetProcessing, format!("Status set to {}", update.status)));

        let Some(token_id) = token_id else {
            output(Report::ConfirmationSkipped);

            return Ok(RoundOutcome::Unconfirmed(MintReceipt {
                transaction_hash: hash,
                token_id: None
            }));
        };

        output(Report::StepStarted(Step::Confirm));

        let update = MintStatusUpdate::confirmed(&mint.mint_id, hash, token_id);

        self.api.update_status(&update)
            .await
            .context("failed to confirm mint")
            .inspect_err(failed(Step::Confirm))?;

        tracing::debug!(mint_id = %mint.mint_id, status = %update.status, "mint status updated");

        output(Report::StepDone(Step::Confirm, format!("Mint confirmed (tokenId: {token_id})")));

        Ok(RoundOutcome::Confirmed(MintReceipt {
            transaction_hash: hash,
            token_id: Some(token_id)
        }))
    }
}
