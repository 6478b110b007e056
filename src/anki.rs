//! Anki review analysis via AnkiConnect
//!
//! Talks to a local Anki instance through the AnkiConnect add-on, pulls
//! every card reviewed in the last day, and picks out the cards the user
//! keeps struggling with so they know what to revisit.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Default AnkiConnect endpoint
pub const DEFAULT_ANKI_URL: &str = "http://localhost:8765";

/// AnkiConnect protocol version
const ANKI_CONNECT_VERSION: u32 = 6;

/// A card counts as a struggle card at this many lapses
const LAPSE_THRESHOLD: u32 = 2;

/// ...or below this ease factor (permille, Anki's native unit)
const EASE_THRESHOLD: u32 = 2000;

/// Errors from talking to AnkiConnect
#[derive(Debug, Error)]
pub enum AnkiError {
    #[error("Could not reach AnkiConnect at {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("AnkiConnect error: {0}")]
    Api(String),
}

/// One reviewed card with the scheduling stats the analysis keys on
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewedCard {
    pub question: String,
    pub answer: String,
    /// Ease factor in permille (2500 = 250%)
    pub ease: u32,
    pub interval: i64,
    pub lapses: u32,
    pub deck: String,
}

impl ReviewedCard {
    /// Whether this card deserves a revisit recommendation
    pub fn is_struggle(&self) -> bool {
        self.lapses >= LAPSE_THRESHOLD || self.ease < EASE_THRESHOLD
    }
}

// AnkiConnect wire types

#[derive(Debug, Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CardInfo {
    #[serde(default)]
    fields: HashMap<String, CardField>,

    /// Ease factor in permille
    #[serde(default)]
    factor: u32,

    #[serde(default)]
    interval: i64,

    #[serde(default)]
    lapses: u32,

    #[serde(default, rename = "deckName")]
    deck_name: String,
}

#[derive(Debug, Deserialize)]
struct CardField {
    #[serde(default)]
    value: String,

    #[serde(default)]
    order: u32,
}

impl CardInfo {
    fn into_reviewed(self) -> ReviewedCard {
        // Front/Back per the standard note type, first field as fallback
        let question = match self.fields.get("Front") {
            Some(f) => f.value.clone(),
            None => self
                .fields
                .values()
                .min_by_key(|f| f.order)
                .map(|f| f.value.clone())
                .unwrap_or_default(),
        };
        let answer = self.fields.get("Back").map(|f| f.value.clone()).unwrap_or_default();

        ReviewedCard {
            question,
            answer,
            ease: self.factor,
            interval: self.interval,
            lapses: self.lapses,
            deck: self.deck_name,
        }
    }
}

/// AnkiConnect HTTP client
pub struct AnkiClient {
    url: String,
    http: reqwest::Client,
}

impl AnkiClient {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        debug!(%url, "AnkiClient::new: called");
        Self {
            url,
            http: reqwest::Client::new(),
        }
    }

    /// Invoke one AnkiConnect action
    async fn invoke<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<T, AnkiError> {
        debug!(%action, "invoke: called");
        let body = serde_json::json!({
            "action": action,
            "version": ANKI_CONNECT_VERSION,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|source| AnkiError::Connect {
                url: self.url.clone(),
                source,
            })?;

        let parsed: AnkiResponse<T> = response.json().await.map_err(|source| AnkiError::Connect {
            url: self.url.clone(),
            source,
        })?;

        if let Some(error) = parsed.error {
            debug!(%action, %error, "invoke: AnkiConnect reported an error");
            return Err(AnkiError::Api(error));
        }

        parsed
            .result
            .ok_or_else(|| AnkiError::Api(format!("{action} returned no result")))
    }

    /// Fetch every card with a review in the last day
    pub async fn fetch_reviewed_cards(&self) -> Result<Vec<ReviewedCard>, AnkiError> {
        debug!("fetch_reviewed_cards: called");

        let card_ids: Vec<u64> = self
            .invoke("findCards", serde_json::json!({"query": "rated:1"}))
            .await?;

        if card_ids.is_empty() {
            info!("No reviewed cards found");
            return Ok(Vec::new());
        }

        let info: Vec<CardInfo> = self
            .invoke("cardsInfo", serde_json::json!({"cards": card_ids}))
            .await?;

        info!(card_count = info.len(), "Fetched reviewed cards");
        Ok(info.into_iter().map(CardInfo::into_reviewed).collect())
    }
}

/// Keep only the cards worth a revisit recommendation
pub fn struggle_cards(cards: Vec<ReviewedCard>) -> Vec<ReviewedCard> {
    debug!(card_count = cards.len(), "struggle_cards: called");
    cards.into_iter().filter(ReviewedCard::is_struggle).collect()
}

/// Group cards by deck, worst first within each deck
///
/// Decks keep their first-seen order; within a deck cards sort by lapse
/// count descending, then ease ascending.
pub fn group_by_deck(cards: Vec<ReviewedCard>) -> Vec<(String, Vec<ReviewedCard>)> {
    debug!(card_count = cards.len(), "group_by_deck: called");
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<ReviewedCard>> = HashMap::new();

    for card in cards {
        if !grouped.contains_key(&card.deck) {
            order.push(card.deck.clone());
        }
        grouped.entry(card.deck.clone()).or_default().push(card);
    }

    order
        .into_iter()
        .map(|deck| {
            let mut cards = grouped.remove(&deck).unwrap_or_default();
            cards.sort_by(|a, b| b.lapses.cmp(&a.lapses).then(a.ease.cmp(&b.ease)));
            (deck, cards)
        })
        .collect()
}
