//! HTTP client for the remote word bank.

use std::env;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use vocab_core::model::{DEFAULT_WORDS, EntryId, VocabularyEntry};

use crate::error::{BankApiError, BankConfigError};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankConfig {
    base_url: String,
}

impl BankConfig {
    /// Validate `raw` as an http(s) URL. A trailing slash is dropped.
    ///
    /// # Errors
    ///
    /// Returns `BankConfigError` if `raw` is not an absolute http(s) URL.
    pub fn new(raw: &str) -> Result<Self, BankConfigError> {
        let trimmed = raw.trim();
        let parsed = Url::parse(trimmed).map_err(|source| BankConfigError::InvalidBaseUrl {
            raw: trimmed.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BankConfigError::UnsupportedScheme(
                parsed.scheme().to_string(),
            ));
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    /// Read `VOCAB_API_BASE`, falling back to [`DEFAULT_API_BASE`].
    ///
    /// # Errors
    ///
    /// Returns `BankConfigError` if the variable holds an invalid URL.
    pub fn from_env() -> Result<Self, BankConfigError> {
        let raw = env::var("VOCAB_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.into());
        Self::new(&raw)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

/// Contents of `GET /api/bank`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankSnapshot {
    pub items: Vec<VocabularyEntry>,
    /// Words saved by the signed-in user; the item count when unreported.
    pub my_list_count: usize,
    /// Server-side default words; the built-in default count when unreported.
    pub default_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddStatus {
    Added,
    Exists,
}

/// Reply to `POST /api/bank`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResponse {
    pub status: AddStatus,
    pub id: Option<EntryId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub target_text: String,
    pub transliteration: Option<String>,
}

/// What the vision endpoint recognized in a picture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Identification {
    #[serde(rename = "english", default)]
    pub source_text: String,
    #[serde(rename = "tamil", default)]
    pub target_text: String,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(rename = "partOfSpeech", default)]
    pub part_of_speech: Option<String>,
    /// Model confidence in `0.0..=1.0`, when reported.
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Identification {
    /// Confidence as a whole percentage, clamped to `0..=100`.
    #[must_use]
    pub fn confidence_percent(&self) -> Option<u8> {
        let value = self.confidence?;
        if !value.is_finite() {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (value * 100.0).round().clamp(0.0, 100.0) as u8;
        Some(percent)
    }
}

/// Image sent to the identify endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl ImageUpload {
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "capture.jpg".into(),
            mime_type: "image/jpeg".into(),
        }
    }
}

/// Streak counters kept by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Quiz,
    Scan,
}

impl Activity {
    fn path(self) -> &'static str {
        match self {
            Activity::Quiz => "/api/activity/quiz",
            Activity::Scan => "/api/activity/scan",
        }
    }
}

//
// ─── API SEAM ──────────────────────────────────────────────────────────────────
//

/// Remote collaborator behind the word bank.
///
/// Calls that change server state require a token; without one they fail
/// with `BankApiError::Unauthorized` before any request is sent.
#[async_trait]
pub trait BankApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `BankApiError` on transport failures or non-2xx replies.
    async fn fetch_bank(&self, token: Option<&str>) -> Result<BankSnapshot, BankApiError>;

    /// # Errors
    ///
    /// Returns `BankApiError` on transport failures or non-2xx replies.
    async fn add_entry(
        &self,
        entry: &VocabularyEntry,
        token: Option<&str>,
    ) -> Result<AddResponse, BankApiError>;

    /// # Errors
    ///
    /// Returns `BankApiError::NotFound` when the server has no such word.
    async fn delete_entry(&self, id: EntryId, token: Option<&str>) -> Result<(), BankApiError>;

    /// # Errors
    ///
    /// Returns `BankApiError` on transport failures or non-2xx replies.
    async fn translate(&self, text: &str) -> Result<Translation, BankApiError>;

    /// # Errors
    ///
    /// Returns `BankApiError` on transport failures or non-2xx replies.
    async fn identify(&self, image: &ImageUpload) -> Result<Identification, BankApiError>;

    /// # Errors
    ///
    /// Returns `BankApiError` on transport failures or non-2xx replies.
    async fn report_activity(
        &self,
        activity: Activity,
        token: Option<&str>,
    ) -> Result<(), BankApiError>;
}

//
// ─── HTTP CLIENT ───────────────────────────────────────────────────────────────
//

#[derive(Clone)]
pub struct HttpBankClient {
    client: Client,
    config: BankConfig,
}

impl HttpBankClient {
    #[must_use]
    pub fn new(config: BankConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl BankApi for HttpBankClient {
    async fn fetch_bank(&self, token: Option<&str>) -> Result<BankSnapshot, BankApiError> {
        let url = self.config.endpoint("/api/bank");
        debug!(%url, signed_in = token.is_some(), "fetching word bank");
        let request = with_token(self.client.get(url), token);
        let body: BankPayload = check_status(request.send().await?)?.json().await?;
        Ok(body.into_snapshot())
    }

    async fn add_entry(
        &self,
        entry: &VocabularyEntry,
        token: Option<&str>,
    ) -> Result<AddResponse, BankApiError> {
        let token = token.ok_or(BankApiError::Unauthorized)?;
        let url = self.config.endpoint("/api/bank");
        debug!(%url, key = %entry.identity_key(), "adding word");
        let payload = NewWordPayload {
            english: entry.source_text(),
            tamil: entry.target_text(),
            transliteration: entry.transliteration(),
        };
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;
        let body: AddPayload = check_status(response)?.json().await?;
        Ok(AddResponse {
            status: body.status.unwrap_or(AddStatus::Added),
            id: body.id,
        })
    }

    async fn delete_entry(&self, id: EntryId, token: Option<&str>) -> Result<(), BankApiError> {
        let token = token.ok_or(BankApiError::Unauthorized)?;
        let url = self.config.endpoint(&format!("/api/bank/{id}"));
        debug!(%url, "deleting word");
        let response = self.client.delete(url).bearer_auth(token).send().await?;
        check_status(response)?;
        Ok(())
    }

    async fn translate(&self, text: &str) -> Result<Translation, BankApiError> {
        let url = self.config.endpoint("/api/translate");
        debug!(%url, "translating");
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;
        let body: TranslatePayload = check_status(response)?.json().await?;
        Ok(Translation {
            target_text: body.tamil.unwrap_or_default().trim().to_string(),
            transliteration: body
                .transliteration
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        })
    }

    async fn identify(&self, image: &ImageUpload) -> Result<Identification, BankApiError> {
        let url = self.config.endpoint("/api/identify");
        debug!(%url, bytes = image.bytes.len(), "identifying image");
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        let form = Form::new().part("image", part);
        let response = self.client.post(url).multipart(form).send().await?;
        Ok(check_status(response)?.json().await?)
    }

    async fn report_activity(
        &self,
        activity: Activity,
        token: Option<&str>,
    ) -> Result<(), BankApiError> {
        let token = token.ok_or(BankApiError::Unauthorized)?;
        let url = self.config.endpoint(activity.path());
        debug!(%url, "reporting activity");
        let response = self.client.post(url).bearer_auth(token).send().await?;
        check_status(response)?;
        Ok(())
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

fn check_status(response: Response) -> Result<Response, BankApiError> {
    match response.status() {
        StatusCode::UNAUTHORIZED => Err(BankApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(BankApiError::NotFound),
        status if !status.is_success() => Err(BankApiError::HttpStatus(status)),
        _ => Ok(response),
    }
}

#[derive(Debug, Serialize)]
struct NewWordPayload<'a> {
    english: &'a str,
    tamil: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    transliteration: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AddPayload {
    #[serde(default)]
    status: Option<AddStatus>,
    #[serde(default)]
    id: Option<EntryId>,
}

#[derive(Debug, Deserialize)]
struct TranslatePayload {
    #[serde(default)]
    tamil: Option<String>,
    #[serde(default)]
    transliteration: Option<String>,
}

/// Older servers answer `GET /api/bank` with a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BankPayload {
    Legacy(Vec<VocabularyEntry>),
    Current {
        #[serde(default)]
        items: Option<Vec<VocabularyEntry>>,
        #[serde(rename = "myListCount", default)]
        my_list_count: Option<usize>,
        #[serde(rename = "defaultCount", default)]
        default_count: Option<usize>,
    },
}

impl BankPayload {
    fn into_snapshot(self) -> BankSnapshot {
        match self {
            BankPayload::Legacy(items) => BankSnapshot {
                my_list_count: items.len(),
                default_count: DEFAULT_WORDS.len(),
                items,
            },
            BankPayload::Current {
                items,
                my_list_count,
                default_count,
            } => {
                let items = items.unwrap_or_default();
                BankSnapshot {
                    my_list_count: my_list_count.unwrap_or(items.len()),
                    default_count: default_count.unwrap_or(DEFAULT_WORDS.len()),
                    items,
                }
            }
        }
    }
}
