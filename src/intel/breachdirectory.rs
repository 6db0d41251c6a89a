//! BreachDirectory lookup (RapidAPI). Only runs when the user supplies an
//! API key.

use anyhow::Context;
use serde::Deserialize;

const API_HOST: &str = "breachdirectory.p.rapidapi.com";

#[derive(Debug, Deserialize)]
pub struct BreachResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub result: Vec<BreachEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BreachEntry {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub hash_password: bool,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub sources: Option<SourceField>,
}

/// Sources come back as one name or a list depending on the record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SourceField {
    Single(String),
    Multiple(Vec<String>),
}

impl SourceField {
    pub fn join(&self) -> String {
        match self {
            SourceField::Single(name) => name.clone(),
            SourceField::Multiple(names) => names.join(", "),
        }
    }
}

pub async fn lookup(
    client: &reqwest::Client,
    username: &str,
    api_key: &str,
) -> anyhow::Result<BreachResponse> {
    let url = format!("https://{API_HOST}/?func=auto&term={username}");
    client
        .get(&url)
        .header("x-rapidapi-key", api_key)
        .header("x-rapidapi-host", API_HOST)
        .send()
        .await
        .context("querying BreachDirectory")?
        .error_for_status()
        .context("BreachDirectory returned an error status")?
        .json::<BreachResponse>()
        .await
        .context("decoding BreachDirectory response")
}
