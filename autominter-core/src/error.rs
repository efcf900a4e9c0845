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

use serde_json::Value as Json;

/// Fallback text for failures which carry no description at all.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed with status {status}")]
    Status {
        endpoint: String,
        status: u16,

        /// JSON body of the failed response, if it had one.
        body: Option<Json>
    },

    #[error("response field '{0}' is missing")]
    MissingField(&'static str)
}

impl ApiError {
    /// Get error message reported by the service in the response body.
    pub fn reported_message(&self) -> Option<&str> {
        match self {
            Self::Status { body: Some(body), .. } => reported_message(body),
            _ => None
        }
    }
}

/// Extract a human-readable error message from a service response body.
///
/// Fields are checked in this order: `data.error`, `error`, `message`.
pub fn reported_message(body: &Json) -> Option<&str> {
    ["/data/error", "/error", "/message"].into_iter()
        .find_map(|path| {
            body.pointer(path)
                .and_then(Json::as_str)
                .filter(|message| !message.is_empty())
        })
}

#[test]
fn test_reported_message() {
    use serde_json::json;

    let body = json!({
        "data": { "error": "nested" },
        "error": "shallow",
        "message": "generic"
    });

    assert_eq!(reported_message(&body), Some("nested"));

    let body = json!({
        "data": { "status": "failed" },
        "error": "shallow",
        "message": "generic"
    });

    assert_eq!(reported_message(&body), Some("shallow"));

    let body = json!({
        "error": { "code": 12 },
        "message": "generic"
    });

    assert_eq!(reported_message(&body), Some("generic"));

    // Empty fields don't hide the next ones.
    let body = json!({
        "data": { "error": "" },
        "error": "shallow",
        "message": "generic"
    });

    assert_eq!(reported_message(&body), Some("shallow"));

    let body = json!({
        "error": "",
        "message": "generic"
    });

    assert_eq!(reported_message(&body), Some("generic"));

    assert_eq!(reported_message(&json!({ "message": "" })), None);
    assert_eq!(reported_message(&json!({ "ok": false })), None);
    assert_eq!(reported_message(&json!("plain text")), None);
}

#[test]
fn test_api_error_message() {
    let error = ApiError::Status {
        endpoint: String::from("/nft/mint"),
        status: 402,
        body: Some(serde_json::json!({ "error": "Insufficient credits" }))
    };

    assert_eq!(error.reported_message(), Some("Insufficient credits"));
    assert_eq!(error.to_string(), "request to /nft/mint failed with status 402");

    assert_eq!(ApiError::MissingField("mintId").reported_message(), None);
}
