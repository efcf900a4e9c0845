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

use alloy::primitives::B256;

use autominter_core::error::{ApiError, UNKNOWN_ERROR};

/// Get human-readable message of the given error.
///
/// Messages reported by the API in a failed response body win over the
/// error's own description.
pub fn error_message(err: &anyhow::Error) -> String {
    let reported = err.chain()
        .filter_map(|err| err.downcast_ref::<ApiError>())
        .find_map(ApiError::reported_message);

    if let Some(message) = reported {
        return message.to_string();
    }

    let message = format!("{err:#}");

    if message.trim().is_empty() {
        return String::from(UNKNOWN_ERROR);
    }

    message
}

/// Shorten transaction hash for display: `0x12345678...`.
pub fn short_hash(hash: &B256) -> String {
    let hash = hash.to_string();

    format!("{}...", &hash[..10])
}
