//! HudsonRock Cavalier lookup: has this username appeared on a machine
//! infected by an info-stealer?

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://cavalier.hudsonrock.com";

#[derive(Debug, Deserialize)]
pub struct StealerReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stealers: Vec<StealerEntry>,
}

impl StealerReport {
    pub fn is_clean(&self) -> bool {
        self.stealers.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct StealerEntry {
    #[serde(default)]
    pub stealer_family: Option<String>,
    #[serde(default)]
    pub date_compromised: Option<String>,
    #[serde(default)]
    pub computer_name: Option<String>,
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(default)]
    pub malware_path: Option<String>,
    #[serde(default)]
    pub antiviruses: Option<AntivirusField>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub top_passwords: Vec<String>,
    #[serde(default)]
    pub top_logins: Vec<String>,
}

/// The upstream API serves this field as either a single name or a list,
/// depending on the record. Resolved at parse time, never kept untyped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AntivirusField {
    Single(String),
    Multiple(Vec<String>),
}

impl AntivirusField {
    pub fn join(&self) -> String {
        match self {
            AntivirusField::Single(name) => name.clone(),
            AntivirusField::Multiple(names) => names.join(", "),
        }
    }
}

pub async fn lookup(client: &reqwest::Client, username: &str) -> anyhow::Result<StealerReport> {
    lookup_at(client, DEFAULT_BASE_URL, username).await
}

pub async fn lookup_at(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
) -> anyhow::Result<StealerReport> {
    let url = format!(
        "{}/api/json/v2/osint-tools/search-by-username?username={username}",
        base_url.trim_end_matches('/')
    );
    client
        .get(&url)
        .send()
        .await
        .context("querying HudsonRock")?
        .error_for_status()
        .context("HudsonRock returned an error status")?
        .json::<StealerReport>()
        .await
        .context("decoding HudsonRock response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antiviruses_field_accepts_both_shapes() {
        let single: StealerEntry =
            serde_json::from_str(r#"{"antiviruses": "Windows Defender"}"#).unwrap();
        assert_eq!(
            single.antiviruses,
            Some(AntivirusField::Single("Windows Defender".into()))
        );

        let multiple: StealerEntry =
            serde_json::from_str(r#"{"antiviruses": ["Windows Defender", "Norton"]}"#).unwrap();
        assert_eq!(
            multiple.antiviruses.unwrap().join(),
            "Windows Defender, Norton"
        );
    }

    #[test]
    fn report_without_stealers_is_clean() {
        let report: StealerReport = serde_json::from_str(
            r#"{"message": "This username is not associated with a computer infected by an info-stealer."}"#,
        )
        .unwrap();
        assert!(report.is_clean());
    }
}
