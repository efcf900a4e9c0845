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
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{json, Value as Json};

use reqwest::header::{HeaderMap, HeaderValue};

use autominter_core::prelude::*;

use crate::config::Config;
use crate::consts;

/// Account and image service used by the rounds loop.
pub trait Api {
    /// Get profile of the authenticated user.
    async fn user(&self) -> anyhow::Result<UserProfile>;

    /// Get remaining image generation credits.
    async fn credits(&self) -> anyhow::Result<i64>;

    async fn points(&self) -> anyhow::Result<Points>;

    /// Generate a random image, optionally steered by the given prompts.
    async fn generate_image(
        &self,
        prompts: Option<&[String]>
    ) -> anyhow::Result<GeneratedImage>;

    /// Register generated image for minting.
    async fn register_mint(
        &self,
        image_id: &str,
        user_id: &str
    ) -> anyhow::Result<MintRequest>;

    async fn update_status(&self, update: &MintStatusUpdate) -> anyhow::Result<()>;
}

/// HTTP client of the PreTrillions API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String
}

impl ApiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(consts::USER_AGENT)
            .default_headers(default_headers(config.auth_token.as_deref())?)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            base_url: config.api_url.clone()
        })
    }

    #[inline]
    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> anyhow::Result<T> {
        tracing::debug!(endpoint, "GET");

        let response = self.client.get(self.url(endpoint))
            .send()
            .await
            .with_context(|| format!("failed to send request to {endpoint}"))?;

        read_response(endpoint, response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize
    ) -> anyhow::Result<T> {
        tracing::debug!(endpoint, "POST");

        let response = self.client.post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to send request to {endpoint}"))?;

        read_response(endpoint, response).await
    }
}

fn default_headers(auth_token: Option<&str>) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert("Accept", HeaderValue::from_static("*/*"));
    headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert("Content-Type", HeaderValue::from_static("application/json"));
    headers.insert("Sec-GPC", HeaderValue::from_static("1"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("same-origin"));
    headers.insert("Priority", HeaderValue::from_static("u=4"));

    if let Some(token) = auth_token {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("auth token contains invalid characters")?;

        let mut cookie = HeaderValue::from_str(&format!("privy-session=t; privy-token={token}"))
            .context("auth token contains invalid characters")?;

        authorization.set_sensitive(true);
        cookie.set_sensitive(true);

        headers.insert("Authorization", authorization);
        headers.insert("Cookie", cookie);
    }

    Ok(headers)
}

/// Decode successful response body or turn a failed one into `ApiError`.
async fn read_response<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response
) -> anyhow::Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.json::<Json>().await.ok();

        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body
        }.into());
    }

    let body = response.bytes()
        .await
        .with_context(|| format!("failed to read {endpoint} response"))?;

    // Some endpoints acknowledge with an empty body.
    let body = if body.is_empty() { &b"null"[..] } else { &body[..] };

    serde_json::from_slice(body)
        .with_context(|| format!("failed to decode {endpoint} response"))
}

fn field<T: DeserializeOwned>(
    body: &Json,
    name: &'static str
) -> anyhow::Result<T> {
    let value = body.get(name)
        .filter(|value| !value.is_null())
        .ok_or(ApiError::MissingField(name))?;

    serde_json::from_value(value.clone())
        .with_context(|| format!("invalid '{name}' field format"))
}

impl Api for ApiClient {
    async fn user(&self) -> anyhow::Result<UserProfile> {
        let body = self.get::<Json>("/user").await?;

        field(&body, "user")
    }

    async fn credits(&self) -> anyhow::Result<i64> {
        let body = self.get::<Json>("/credits").await?;

        field(&body, "balance")
    }

    async fn points(&self) -> anyhow::Result<Points> {
        self.get("/points").await
    }

    async fn generate_image(
        &self,
        prompts: Option<&[String]>
    ) -> anyhow::Result<GeneratedImage> {
        let body = match prompts {
            Some(prompts) => json!({ "prompts": prompts }),
            None => json!({})
        };

        self.post("/generate-random", &body).await
    }

    async fn register_mint(
        &self,
        image_id: &str,
        user_id: &str
    ) -> anyhow::Result<MintRequest> {
        self.post("/nft/mint", &json!({
            "imageId": image_id,
            "userId": user_id
        })).await
    }

    async fn update_status(&self, update: &MintStatusUpdate) -> anyhow::Result<()> {
        self.post::<Json>("/nft/status", update).await?;

        Ok(())
    }
}

#[test]
fn test_default_headers() -> anyhow::Result<()> {
    let headers = default_headers(Some("abc"))?;

    assert_eq!(headers["Authorization"], "Bearer abc");
    assert_eq!(headers["Cookie"], "privy-session=t; privy-token=abc");
    assert_eq!(headers["Content-Type"], "application/json");

    let headers = default_headers(None)?;

    assert!(!headers.contains_key("Authorization"));
    assert!(!headers.contains_key("Cookie"));

    assert!(default_headers(Some("bad\ntoken")).is_err());

    Ok(())
}

#[test]
fn test_response_fields() -> anyhow::Result<()> {
    let body = json!({
        "balance": 12,
        "user": null
    });

    assert_eq!(field::<i64>(&body, "balance")?, 12);

    let err = field::<UserProfile>(&body, "user").unwrap_err();

    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::MissingField("user"))));

    assert!(field::<i64>(&json!({ "balance": "many" }), "balance").is_err());

    Ok(())
}
