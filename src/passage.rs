use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::catalog::Book;
use crate::error::FetchError;

pub const DEFAULT_PASSAGE_URL: &str = "https://bible-api.com";

pub const PASSAGE_FALLBACK: &str = "Could not fetch passage";

/// One dispatched chapter fetch. `token` identifies the dispatch so that a
/// late response to an older request can be told apart from the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassageRequest {
    pub token: u64,
    pub book: Book,
    pub chapter: u32,
}

impl PassageRequest {
    pub fn reference(&self) -> String {
        format!("{} {}", self.book.name(), self.chapter)
    }
}

/// Builds `<base>/<book> <chapter>` with the reference percent-encoded as a
/// single path segment, e.g. `https://bible-api.com/1%20John%203`.
pub fn passage_url(base: &str, book: Book, chapter: u32) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;

    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl(format!("{}: cannot hold a path", base)))?
        .pop_if_empty()
        .push(&format!("{} {}", book.name(), chapter));

    Ok(url)
}

/// Splits chapter text into display lines. A trailing newline does not
/// produce an empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[derive(Deserialize)]
struct PassageResponse {
    text: String,
}

#[derive(Clone)]
pub struct PassageClient {
    client: Client,
    base_url: String,
}

impl PassageClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Fetches the full text of one chapter.
    pub async fn fetch(&self, book: Book, chapter: u32) -> Result<String, FetchError> {
        let url = passage_url(&self.base_url, book, chapter)?;
        debug!(%url, "fetching passage");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: PassageResponse = serde_json::from_str(&body)?;
        Ok(parsed.text)
    }
}
