// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Service map API client for fetching playground units.
//!
//! Handles:
//! - The filtered unit list request
//! - Following `next` links across pages
//! - Classifying transport, status and decode failures

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::UnitPage;

/// Open-data service map client.
#[derive(Clone)]
pub struct ServiceMapClient {
    http: reqwest::Client,
    base_url: String,
    service: String,
    page_size: u32,
    max_pages: u32,
}

impl ServiceMapClient {
    /// Create a client for the endpoint and filters in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("playground-map/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.units_api_url.clone(),
            service: config.units_service.clone(),
            page_size: config.page_size,
            max_pages: config.max_pages.max(1),
        })
    }

    /// Fetch the full unit list.
    ///
    /// Pages are concatenated; `count` is taken from the first page. Stops
    /// after `max_pages` pages even if the API offers more.
    pub async fn fetch_units(&self) -> Result<UnitPage> {
        let first = self
            .get_page(
                self.http.get(&self.base_url).query(&[
                    ("service", self.service.clone()),
                    ("page_size", self.page_size.to_string()),
                ]),
            )
            .await?;

        let mut results = first.results;
        let mut next = first.next;
        let mut pages = 1;

        while let Some(url) = next.take() {
            if pages >= self.max_pages {
                tracing::warn!(
                    pages,
                    fetched = results.len(),
                    expected = first.count,
                    "Page limit reached, unit list truncated"
                );
                break;
            }

            let page = self.get_page(self.http.get(&url)).await?;
            pages += 1;
            results.extend(page.results);
            // Guard against an API that links a page to itself
            next = page.next.filter(|n| *n != url);
        }

        tracing::debug!(pages, units = results.len(), count = first.count, "Fetched units");

        Ok(UnitPage {
            count: first.count,
            next: None,
            previous: None,
            results,
        })
    }

    async fn get_page(&self, request: reqwest::RequestBuilder) -> Result<UnitPage> {
        let response = request.send().await?;
        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json(&self, response: reqwest::Response) -> Result<UnitPage> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Network(format!(
                "HTTP {}: {}",
                status,
                truncate(&body, 200)
            )));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| AppError::Decode(e.to_string()))
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
