//! ProxyNova COMB lookup: leaked `email:password` lines matching the
//! username.

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.proxynova.com";

#[derive(Debug, Deserialize)]
pub struct CombResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub lines: Vec<String>,
}

pub async fn lookup(
    client: &reqwest::Client,
    username: &str,
    limit: usize,
) -> anyhow::Result<CombResponse> {
    lookup_at(client, DEFAULT_BASE_URL, username, limit).await
}

pub async fn lookup_at(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    limit: usize,
) -> anyhow::Result<CombResponse> {
    let url = format!(
        "{}/comb?query={username}&start=0&limit={limit}",
        base_url.trim_end_matches('/')
    );
    client
        .get(&url)
        .send()
        .await
        .context("querying ProxyNova")?
        .error_for_status()
        .context("ProxyNova returned an error status")?
        .json::<CombResponse>()
        .await
        .context("decoding ProxyNova response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_with_missing_fields() {
        let r: CombResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r.count, 0);
        assert!(r.lines.is_empty());

        let r: CombResponse =
            serde_json::from_str(r#"{"count": 2, "lines": ["a@b.com:pw1", "a@c.com:pw2"]}"#)
                .unwrap();
        assert_eq!(r.count, 2);
        assert_eq!(r.lines.len(), 2);
    }
}
