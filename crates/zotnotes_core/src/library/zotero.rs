//! Blocking Zotero Web API v3 client.
//!
//! # Responsibility
//! - Implement `LibrarySource` over `https://api.zotero.org`.
//! - Own auth headers, library prefixes and `limit`/`start` pagination.
//!
//! # Invariants
//! - Every request carries `Zotero-API-Key` and `Zotero-API-Version: 3`.
//! - Paged listings stop at `Total-Results`, on a short page, or on an
//!   empty page, whichever comes first.

use super::{LibraryError, LibraryResult, LibrarySource};
use crate::config::{LibraryConfig, LibraryKind};
use crate::model::collection::Collection;
use crate::model::item::{Group, Item};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.zotero.org";
const API_KEY_HEADER: &str = "zotero-api-key";
const API_VERSION_HEADER: &str = "zotero-api-version";
const API_VERSION: &str = "3";
const TOTAL_RESULTS_HEADER: &str = "total-results";
const PAGE_SIZE: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_BODY_MAX_CHARS: usize = 200;

/// HTTP-backed library source for one user or group library.
pub struct ZoteroClient {
    http: Client,
    base_url: String,
    library_prefix: String,
    user_prefix: String,
}

impl ZoteroClient {
    /// Builds a client from validated library config.
    ///
    /// # Errors
    /// - `InvalidConfig` when the API key is blank or not header-safe, or a
    ///   group library has no group id.
    /// - `Http` when the underlying client cannot be constructed.
    pub fn from_config(config: &LibraryConfig) -> LibraryResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LibraryError::InvalidConfig("api_key is required".to_string()))?;
        let key_value = HeaderValue::from_str(api_key).map_err(|_| {
            LibraryError::InvalidConfig("api_key contains invalid header characters".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            base_url,
            library_prefix: library_prefix(config)?,
            user_prefix: format!("users/{}", config.user_id.trim()),
        })
    }

    /// Path prefix of the addressed library, e.g. `users/123`.
    pub fn library_prefix(&self) -> &str {
        &self.library_prefix
    }

    fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> LibraryResult<(T, Option<usize>)> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send()?;
        let status = response.status();
        let total = response
            .headers()
            .get(TOTAL_RESULTS_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<usize>().ok());
        let body = response.text()?;

        debug!(
            "event=library_request module=library status={} path={} total={:?}",
            status.as_u16(),
            path,
            total
        );

        if !status.is_success() {
            return Err(LibraryError::Status {
                status: status.as_u16(),
                url,
                body: truncate_chars(&body, ERROR_BODY_MAX_CHARS),
            });
        }

        let parsed =
            serde_json::from_str(&body).map_err(|source| LibraryError::Decode { url, source })?;
        Ok((parsed, total))
    }

    fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> LibraryResult<Vec<T>> {
        let mut results = Vec::new();
        let mut start = 0usize;
        loop {
            let mut paged = query.to_vec();
            paged.push(("limit", PAGE_SIZE.to_string()));
            paged.push(("start", start.to_string()));

            let (page, total): (Vec<T>, _) = self.get_page(path, &paged)?;
            let page_len = page.len();
            results.extend(page);

            match next_start(start, page_len, total) {
                Some(next) => start = next,
                None => break,
            }
        }
        Ok(results)
    }
}

impl LibrarySource for ZoteroClient {
    fn collections(&self) -> LibraryResult<Vec<Collection>> {
        self.get_all(&format!("{}/collections", self.library_prefix), &[])
    }

    fn items(&self) -> LibraryResult<Vec<Item>> {
        self.get_all(&format!("{}/items", self.library_prefix), &[])
    }

    fn collection_items(&self, collection_key: &str) -> LibraryResult<Vec<Item>> {
        self.get_all(
            &format!("{}/collections/{collection_key}/items", self.library_prefix),
            &[],
        )
    }

    fn search_top_items(&self, query: &str) -> LibraryResult<Vec<Item>> {
        self.get_all(
            &format!("{}/items/top", self.library_prefix),
            &[("q", query.to_string()), ("qmode", "everything".to_string())],
        )
    }

    fn children(&self, item_key: &str) -> LibraryResult<Vec<Item>> {
        self.get_all(
            &format!("{}/items/{item_key}/children", self.library_prefix),
            &[],
        )
    }

    fn item(&self, item_key: &str) -> LibraryResult<Item> {
        match self.get_page(&format!("{}/items/{item_key}", self.library_prefix), &[]) {
            Ok((item, _)) => Ok(item),
            Err(LibraryError::Status { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Err(LibraryError::NotFound(item_key.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    fn groups(&self) -> LibraryResult<Vec<Group>> {
        self.get_all(&format!("{}/groups", self.user_prefix), &[])
    }
}

fn library_prefix(config: &LibraryConfig) -> LibraryResult<String> {
    match config.kind {
        LibraryKind::User => Ok(format!("users/{}", config.user_id.trim())),
        LibraryKind::Group => config
            .group_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| format!("groups/{id}"))
            .ok_or_else(|| {
                LibraryError::InvalidConfig("group_id is required for group libraries".to_string())
            }),
    }
}

/// Returns the next `start` offset, or `None` when the listing is complete.
fn next_start(start: usize, page_len: usize, total: Option<usize>) -> Option<usize> {
    if page_len == 0 || page_len < PAGE_SIZE {
        return None;
    }
    let next = start + page_len;
    match total {
        Some(total) if next >= total => None,
        _ => Some(next),
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut truncated: String = value.chars().take(max_chars).collect();
    if value.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
