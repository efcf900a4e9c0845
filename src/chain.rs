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

use anyhow::Context;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt as RpcReceipt;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;

use autominter_core::prelude::*;

use crate::config::Config;

sol! {
    #[sol(rpc)]
    contract PlasmaGirl {
        function mintPlasmaGirl(address to, string tokenURI) external;
    }
}

/// Chain access of the minting wallet.
pub trait Chain {
    /// Address of the wallet which signs mint transactions and receives
    /// minted tokens.
    fn address(&self) -> Address;

    /// Native balance of the wallet in wei.
    async fn balance(&self) -> anyhow::Result<U256>;

    /// Submit mint transaction for the given metadata URI and wait until
    /// it's included into a block.
    ///
    /// Reverted transactions are reported as errors.
    async fn mint(&self, token_uri: &str) -> anyhow::Result<TransactionReceipt>;

    /// Get receipt of an already sent transaction. Returns `None` if the
    /// transaction is unknown or not included yet.
    async fn receipt(&self, hash: B256) -> anyhow::Result<Option<TransactionReceipt>>;
}

#[derive(Clone)]
pub struct EvmChain {
    provider: DynProvider,
    address: Address,
    contract: Address,
    confirmation_timeout: Option<Duration>
}

impl EvmChain {
    /// Connect the signing wallet to the configured RPC endpoint.
    pub fn connect(config: &Config) -> anyhow::Result<Self> {
        let rpc_url = config.rpc_url.as_deref()
            .ok_or_else(|| anyhow::anyhow!("RPC_URL is not set"))?;

        let private_key = config.private_key.as_deref()
            .ok_or_else(|| anyhow::anyhow!("PRIVATE_KEY is not set"))?;

        let signer = private_key.parse::<PrivateKeySigner>()
            .context("failed to parse private key")?;

        let rpc_url = rpc_url.parse::<reqwest::Url>()
            .context("failed to parse RPC url")?;

        let address = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();

        tracing::info!(%address, contract = %config.mint.contract, "chain client connected");

        Ok(Self {
            provider,
            address,
            contract: config.mint.contract,
            confirmation_timeout: config.confirmation_timeout
        })
    }
}

impl Chain for EvmChain {
    #[inline]
    fn address(&self) -> Address {
        self.address
    }

    async fn balance(&self) -> anyhow::Result<U256> {
        self.provider.get_balance(self.address)
            .await
            .context("failed to get wallet balance")
    }

    async fn mint(&self, token_uri: &str) -> anyhow::Result<TransactionReceipt> {
        let contract = PlasmaGirl::new(self.contract, self.provider.clone());

        let pending = contract.mintPlasmaGirl(self.address, token_uri.to_string())
            .send()
            .await
            .context("failed to send mint transaction")?;

        tracing::debug!(hash = %pending.tx_hash(), "mint transaction sent");

        let receipt = pending.with_timeout(self.confirmation_timeout)
            .get_receipt()
            .await
            .context("failed to wait for mint transaction")?;

        if !receipt.status() {
            anyhow::bail!("mint transaction {} reverted", receipt.transaction_hash);
        }

        Ok(convert_receipt(receipt))
    }

    async fn receipt(&self, hash: B256) -> anyhow::Result<Option<TransactionReceipt>> {
        let receipt = self.provider.get_transaction_receipt(hash)
            .await
            .context("failed to get transaction receipt")?;

        Ok(receipt.map(convert_receipt))
    }
}

fn convert_receipt(receipt: RpcReceipt) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        logs: receipt.inner.logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect()
    }
}
