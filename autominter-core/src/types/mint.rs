// SPDX-License-Identifier: GPL-3.0-or-later
//
// autominter-core
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

use alloy_primitives::{B256, U256, Log};
use serde::{Serialize, Deserialize, Serializer};

/// Result of the `/generate-random` call.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    #[serde(default)]
    pub image_id: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>
}

impl GeneratedImage {
    /// Get ID of the generated image. Returns `None` if the service didn't
    /// provide a usable identifier.
    pub fn id(&self) -> Option<&str> {
        self.image_id.as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Mint registration issued by the service for a generated image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub mint_id: String,
    pub metadata_uri: String
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MintStatus {
    Processing,
    Confirmed
}

impl std::fmt::Display for MintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => f.write_str("processing"),
            Self::Confirmed  => f.write_str("confirmed")
        }
    }
}

/// Mint lifecycle transition reported to the service. The service owns the
/// state machine, so sending the same update twice is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintStatusUpdate {
    pub mint_id: String,
    pub status: MintStatus,
    pub transaction_hash: B256,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_token_id"
    )]
    pub token_id: Option<U256>
}

impl MintStatusUpdate {
    pub fn processing(mint_id: impl ToString, transaction_hash: B256) -> Self {
        Self {
            mint_id: mint_id.to_string(),
            status: MintStatus::Processing,
            transaction_hash,
            token_id: None
        }
    }

    pub fn confirmed(
        mint_id: impl ToString,
        transaction_hash: B256,
        token_id: U256
    ) -> Self {
        Self {
            mint_id: mint_id.to_string(),
            status: MintStatus::Confirmed,
            transaction_hash,
            token_id: Some(token_id)
        }
    }
}

/// Token IDs are sent as plain JSON numbers. Values which don't fit into
/// `u64` are sent as decimal strings.
fn serialize_token_id<S: Serializer>(
    token_id: &Option<U256>,
    serializer: S
) -> Result<S::Ok, S::Error> {
    match token_id {
        Some(token_id) => match u64::try_from(*token_id) {
            Ok(token_id) => serializer.serialize_u64(token_id),
            Err(_) => serializer.serialize_str(&token_id.to_string())
        }

        None => serializer.serialize_none()
    }
}

/// Receipt of an included transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,

    /// Logs emitted by the transaction in their original order.
    pub logs: Vec<Log>
}

/// Outcome of an on-chain mint. `token_id` is `None` when it couldn't be
/// recovered from the receipt logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    pub transaction_hash: B256,
    pub token_id: Option<U256>
}

#[test]
fn test_generated_image_id() -> Result<(), serde_json::Error> {
    let image: GeneratedImage = serde_json::from_str(r#"{"imageId":"img1","imageUrl":"https://example.com/1.png"}"#)?;

    assert_eq!(image.id(), Some("img1"));

    let image: GeneratedImage = serde_json::from_str(r#"{"imageId":"  "}"#)?;

    assert_eq!(image.id(), None);

    let image: GeneratedImage = serde_json::from_str(r#"{"success":true}"#)?;

    assert_eq!(image.id(), None);

    Ok(())
}

#[test]
fn test_status_update_json() -> Result<(), serde_json::Error> {
    let hash = B256::repeat_byte(0xab);

    let processing = serde_json::to_value(MintStatusUpdate::processing("m1", hash))?;

    assert_eq!(processing, serde_json::json!({
        "mintId": "m1",
        "status": "processing",
        "transactionHash": hash.to_string()
    }));

    let confirmed = serde_json::to_value(MintStatusUpdate::confirmed("m1", hash, U256::from(42)))?;

    assert_eq!(confirmed["status"], "confirmed");
    assert_eq!(confirmed["tokenId"], 42);
    assert_eq!(confirmed["transactionHash"], hash.to_string());

    let huge = serde_json::to_value(MintStatusUpdate::confirmed("m1", hash, U256::MAX))?;

    assert_eq!(huge["tokenId"], U256::MAX.to_string());

    Ok(())
}
