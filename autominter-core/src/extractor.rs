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

use std::str::FromStr;

use alloy_primitives::{Address, U256, Log};
use alloy_sol_types::{sol, SolEvent};

use crate::types::mint::TransactionReceipt;

sol! {
    /// ERC-721 transfer event. Mints are transfers from the zero address.
    event Transfer(
        address indexed from,
        address indexed to,
        uint256 indexed tokenId
    );
}

/// Token ID recovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    /// Decode logs as `Transfer` events and take the first one sent from the
    /// zero address.
    MintEvent,

    /// Take the first non-zero 4th topic of a log with at least 4 topics.
    /// Doesn't depend on the event ABI at all.
    TopicShape,

    /// Take the 4th topic of the first log which has the `Transfer` event
    /// signature as its first topic, whoever the sender is.
    TransferTopic
}

impl Strategy {
    /// Try to find the minted token ID in the provided logs.
    pub fn apply(&self, logs: &[Log]) -> Option<U256> {
        match self {
            Self::MintEvent => logs.iter().find_map(|log| {
                let transfer = Transfer::decode_log_data(&log.data).ok()?;

                (transfer.from == Address::ZERO).then_some(transfer.tokenId)
            }),

            Self::TopicShape => logs.iter()
                .filter_map(|log| log.topics().get(3))
                .map(|topic| U256::from_be_bytes(topic.0))
                .find(|token_id| !token_id.is_zero()),

            Self::TransferTopic => logs.iter()
                .find(|log| {
                    log.topics().len() >= 4 &&
                    log.topics()[0] == Transfer::SIGNATURE_HASH
                })
                .map(|log| U256::from_be_bytes(log.topics()[3].0))
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MintEvent     => f.write_str("mint-event"),
            Self::TopicShape    => f.write_str("topic-shape"),
            Self::TransferTopic => f.write_str("transfer-topic")
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mint-event"     | "event"    => Ok(Self::MintEvent),
            "topic-shape"    | "topics"   => Ok(Self::TopicShape),
            "transfer-topic" | "transfer" => Ok(Self::TransferTopic),

            _ => Err(format!("unknown token id strategy: {s}"))
        }
    }
}

/// Recovers the ID of a freshly minted token from transaction logs.
///
/// Strategies are applied in the configured order and the first one which
/// finds a token ID wins. Failing to find any is a valid outcome, not an
/// error: the mint itself may still have succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdExtractor {
    strategies: Vec<Strategy>
}

impl Default for TokenIdExtractor {
    #[inline]
    fn default() -> Self {
        Self::new([Strategy::MintEvent, Strategy::TopicShape])
    }
}

impl TokenIdExtractor {
    /// Create extractor with provided strategies. Repeated strategies are
    /// ignored, the order of their first appearance is kept.
    pub fn new(strategies: impl IntoIterator<Item = Strategy>) -> Self {
        let mut unique = Vec::new();

        for strategy in strategies {
            if !unique.contains(&strategy) {
                unique.push(strategy);
            }
        }

        Self {
            strategies: unique
        }
    }

    #[inline(always)]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    #[inline]
    pub fn extract(&self, receipt: &TransactionReceipt) -> Option<U256> {
        self.extract_from_logs(&receipt.logs)
    }

    pub fn extract_from_logs(&self, logs: &[Log]) -> Option<U256> {
        for strategy in &self.strategies {
            if let Some(token_id) = strategy.apply(logs) {
                tracing::trace!(%strategy, %token_id, "token id recovered");

                return Some(token_id);
            }

            tracing::trace!(%strategy, logs = logs.len(), "strategy found no token id");
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256, Bytes, B256};

    use super::*;

    const CONTRACT: Address = address!("0xC5c28aA8DA13588CBf8B23D9c57FB2DA98aebcE0");
    const OWNER: Address = address!("0x00000000000000000000000000000000000000aa");
    const SENDER: Address = address!("0x00000000000000000000000000000000000000bb");

    const OTHER_EVENT: B256 = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");

    fn transfer_log(from: Address, to: Address, token_id: u64) -> Log {
        let data = Transfer {
            from,
            to,
            tokenId: U256::from(token_id)
        }.encode_log_data();

        Log {
            address: CONTRACT,
            data
        }
    }

    fn raw_log(topics: Vec<B256>) -> Log {
        Log::new_unchecked(CONTRACT, topics, Bytes::new())
    }

    fn topic(value: u64) -> B256 {
        B256::from(U256::from(value).to_be_bytes::<32>())
    }

    #[test]
    fn mint_event_wins_over_topic_shape() {
        let logs = [
            raw_log(vec![OTHER_EVENT, topic(1), topic(2), topic(7)]),
            transfer_log(Address::ZERO, OWNER, 42)
        ];

        assert_eq!(TokenIdExtractor::default().extract_from_logs(&logs), Some(U256::from(42)));

        let topics_first = TokenIdExtractor::new([Strategy::TopicShape, Strategy::MintEvent]);

        assert_eq!(topics_first.extract_from_logs(&logs), Some(U256::from(7)));
    }

    #[test]
    fn falls_back_to_topic_shape() {
        let logs = [
            raw_log(vec![OTHER_EVENT, topic(1), topic(2)]),
            raw_log(vec![OTHER_EVENT, topic(1), topic(2), topic(0)]),
            transfer_log(SENDER, OWNER, 5)
        ];

        assert_eq!(TokenIdExtractor::default().extract_from_logs(&logs), Some(U256::from(5)));

        let decode_only = TokenIdExtractor::new([Strategy::MintEvent]);

        assert_eq!(decode_only.extract_from_logs(&logs), None);
    }

    #[test]
    fn absent_token_id() {
        let extractor = TokenIdExtractor::default();

        assert_eq!(extractor.extract_from_logs(&[]), None);

        // ERC-20 style transfer: same signature, but the value is not indexed.
        let logs = [
            Log::new_unchecked(
                CONTRACT,
                vec![Transfer::SIGNATURE_HASH, topic(0), topic(1)],
                Bytes::from(U256::from(100).to_be_bytes_vec())
            ),
            raw_log(vec![OTHER_EVENT, topic(3), topic(4), topic(0)])
        ];

        assert_eq!(extractor.extract_from_logs(&logs), None);

        let receipt = TransactionReceipt {
            logs: logs.to_vec(),
            ..TransactionReceipt::default()
        };

        assert_eq!(extractor.extract(&receipt), None);
    }

    #[test]
    fn zero_token_id_from_mint_event() {
        let logs = [transfer_log(Address::ZERO, OWNER, 0)];

        assert_eq!(TokenIdExtractor::default().extract_from_logs(&logs), Some(U256::ZERO));
        assert_eq!(Strategy::TopicShape.apply(&logs), None);
    }

    #[test]
    fn transfer_topic_ignores_sender() {
        let logs = [
            raw_log(vec![OTHER_EVENT, topic(1), topic(2), topic(3)]),
            transfer_log(SENDER, OWNER, 9)
        ];

        let extractor = TokenIdExtractor::new([Strategy::TransferTopic]);

        assert_eq!(extractor.extract_from_logs(&logs), Some(U256::from(9)));
        assert_eq!(Strategy::MintEvent.apply(&logs), None);
    }

    #[test]
    fn strategies_are_deduplicated() {
        let extractor = TokenIdExtractor::new([
            Strategy::TopicShape,
            Strategy::MintEvent,
            Strategy::TopicShape
        ]);

        assert_eq!(extractor.strategies(), &[Strategy::TopicShape, Strategy::MintEvent]);
    }

    #[test]
    fn strategy_names() {
        for strategy in [Strategy::MintEvent, Strategy::TopicShape, Strategy::TransferTopic] {
            assert_eq!(Strategy::from_str(&strategy.to_string()), Ok(strategy));
        }

        assert_eq!(Strategy::from_str("topics"), Ok(Strategy::TopicShape));
        assert!(Strategy::from_str("guess").is_err());
    }
}
