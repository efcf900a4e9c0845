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

use alloy_primitives::U256;
use alloy_primitives::utils::format_ether;
use serde::Deserialize;

/// Profile of the authenticated user as returned by the `/user` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    /// External (privy) user identifier used to register mints.
    #[serde(rename = "privy_user_id")]
    pub external_user_id: String,

    /// Twitter handle linked to the account, if any.
    #[serde(rename = "twitter_username", default)]
    pub display_handle: Option<String>
}

impl UserProfile {
    /// Get printable user handle. Falls back to the external user ID when
    /// no twitter account is linked.
    pub fn handle(&self) -> String {
        match &self.display_handle {
            Some(handle) if !handle.is_empty() => format!("@{handle}"),
            _ => self.external_user_id.clone()
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Points {
    #[serde(rename = "totalPoints", default)]
    pub total_points: i64,

    #[serde(default)]
    pub rank: i64
}

/// State of the account at the beginning of a round. Snapshots are never
/// updated, a new one is fetched every round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// Remaining image generation credits.
    pub credits: i64,

    pub points: i64,
    pub rank: i64,

    /// Native balance of the minting wallet in wei.
    pub wallet_balance: U256
}

impl AccountSnapshot {
    #[inline]
    pub fn new(credits: i64, points: Points, wallet_balance: U256) -> Self {
        Self {
            credits,
            points: points.total_points,
            rank: points.rank,
            wallet_balance
        }
    }

    /// Check if the account has no generation credits left.
    #[inline(always)]
    pub const fn is_exhausted(&self) -> bool {
        self.credits <= 0
    }

    /// Check if the remaining credits are at or below the given threshold.
    /// Exhausted accounts are not considered low.
    #[inline(always)]
    pub const fn is_low(&self, threshold: i64) -> bool {
        self.credits > 0 && self.credits <= threshold
    }

    /// Wallet balance formatted in ether units without trailing zeros,
    /// e.g. `1.5` or `2.0`.
    pub fn balance_ether(&self) -> String {
        let mut balance = format_ether(self.wallet_balance);

        if balance.contains('.') {
            let trimmed = balance.trim_end_matches('0').len();

            balance.truncate(trimmed);

            if balance.ends_with('.') {
                balance.push('0');
            }
        }

        balance
    }
}

#[test]
fn test_credit_thresholds() {
    let mut snapshot = AccountSnapshot::default();

    assert!(snapshot.is_exhausted());
    assert!(!snapshot.is_low(10));

    snapshot.credits = -3;

    assert!(snapshot.is_exhausted());

    snapshot.credits = 1;

    assert!(!snapshot.is_exhausted());
    assert!(snapshot.is_low(10));

    snapshot.credits = 10;

    assert!(snapshot.is_low(10));

    snapshot.credits = 11;

    assert!(!snapshot.is_low(10));
}

#[test]
fn test_balance_format() {
    let snapshot = AccountSnapshot::new(
        12,
        Points { total_points: 500, rank: 3 },
        U256::from(1_500_000_000_000_000_000_u128)
    );

    assert_eq!(snapshot.points, 500);
    assert_eq!(snapshot.rank, 3);
    assert_eq!(snapshot.balance_ether(), "1.5");

    let snapshot = AccountSnapshot::new(
        0,
        Points::default(),
        U256::from(2_000_000_000_000_000_000_u128)
    );

    assert_eq!(snapshot.balance_ether(), "2.0");
    assert_eq!(AccountSnapshot::default().balance_ether(), "0.0");

    let snapshot = AccountSnapshot::new(0, Points::default(), U256::from(1_u64));

    assert_eq!(snapshot.balance_ether(), "0.000000000000000001");
}

#[test]
fn test_user_profile() -> Result<(), serde_json::Error> {
    let user: UserProfile = serde_json::from_str(r#"{
        "twitter_username": "plasma",
        "privy_user_id": "did:privy:abc",
        "email": null
    }"#)?;

    assert_eq!(user.external_user_id, "did:privy:abc");
    assert_eq!(user.handle(), "@plasma");

    let user: UserProfile = serde_json::from_str(r#"{
        "twitter_username": null,
        "privy_user_id": "did:privy:abc"
    }"#)?;

    assert_eq!(user.handle(), "did:privy:abc");

    Ok(())
}
