use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FetchError;

pub const DEFAULT_VERSE_URL: &str = "https://beta.ourmanna.com/api/v1/get/?format=json";

/// The verse service never names a translation, so every verse is labelled KJV.
pub const TRANSLATION: &str = "KJV";

pub const VERSE_FALLBACK: &str = "Could not load verse";

/// A verse of the day as shown on the home tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub reference: String,
    pub text: String,
    pub translation: String,
}

impl Verse {
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
            translation: TRANSLATION.to_string(),
        }
    }

    /// What the home tab shows when the service could not be reached.
    pub fn fallback() -> Self {
        Self {
            reference: String::new(),
            text: VERSE_FALLBACK.to_string(),
            translation: String::new(),
        }
    }

    /// `"<reference> (<translation>)"`, or nothing when there is no reference.
    pub fn citation(&self) -> Option<String> {
        if self.reference.is_empty() {
            None
        } else {
            Some(format!("{} ({})", self.reference, self.translation))
        }
    }
}

#[derive(Deserialize)]
struct VerseResponse {
    verse: VerseBody,
}

#[derive(Deserialize)]
struct VerseBody {
    details: VerseDetails,
}

#[derive(Deserialize)]
struct VerseDetails {
    reference: String,
    text: String,
}

#[derive(Clone)]
pub struct VerseClient {
    client: Client,
    url: String,
}

impl VerseClient {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    pub async fn fetch(&self) -> Result<Verse, FetchError> {
        debug!(url = %self.url, "fetching verse of the day");

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: VerseResponse = serde_json::from_str(&body)?;
        Ok(Verse::new(parsed.verse.details.reference, parsed.verse.details.text))
    }

    /// Like [`fetch`](Self::fetch), but any failure becomes [`Verse::fallback`].
    pub async fn load(&self) -> Verse {
        match self.fetch().await {
            Ok(verse) => verse,
            Err(e) => {
                warn!(error = %e, "could not load verse of the day");
                Verse::fallback()
            }
        }
    }
}
