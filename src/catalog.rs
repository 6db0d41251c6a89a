use anyhow::Context;
use serde::Deserialize;

/// Placeholder token substituted with the subject username.
pub const PLACEHOLDER: &str = "{}";

/// How a site signals whether a profile exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DetectionStrategy {
    /// Absence is a specific HTTP status (`error_code`).
    #[serde(rename = "status_code")]
    StatusCode,
    /// Absence is an error phrase in the body (`error_msg`).
    #[serde(rename = "errorMsg")]
    ErrorMessage,
    /// Presence is a marker phrase in the body (`error_msg`).
    #[serde(rename = "profilePresence")]
    ProfilePresence,
    /// Absence is a redirect to a known miss URL (`response_url`).
    #[serde(rename = "response_url")]
    ResponseUrl,
    /// No reliable heuristic; reported as a tentative hit without probing.
    #[serde(rename = "unknown")]
    Unverified,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookiePair {
    pub name: String,
    pub value: String,
}

/// One catalog entry. Loaded once, read-only for the rest of the run.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteDescriptor {
    pub name: String,
    pub base_url: String,
    /// Alternate endpoint for the existence check when it differs from the
    /// profile URL shown to the user.
    #[serde(default)]
    pub url_probe: Option<String>,
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub error_type: DetectionStrategy,
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default)]
    pub response_url: Option<String>,
    #[serde(default)]
    pub cookies: Vec<CookiePair>,
}

fn default_follow_redirects() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub websites: Vec<SiteDescriptor>,
}

impl Catalog {
    /// Fetch and parse the site catalog from a URL or a local path. Any
    /// failure here is fatal to the run; a partial catalog is never used.
    pub async fn load(source: &str) -> anyhow::Result<Catalog> {
        // Windows drive letters parse as URL schemes, so check the scheme
        // rather than parse success.
        let is_remote = url::Url::parse(source)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        let raw = if is_remote {
            reqwest::Client::new()
                .get(source)
                .send()
                .await
                .with_context(|| format!("fetching site catalog from {source}"))?
                .error_for_status()
                .with_context(|| format!("fetching site catalog from {source}"))?
                .text()
                .await
                .context("reading site catalog body")?
        } else {
            std::fs::read_to_string(source)
                .with_context(|| format!("reading site catalog file {source}"))?
        };
        let catalog: Catalog =
            serde_json::from_str(&raw).context("parsing site catalog JSON")?;
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.websites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.websites.is_empty()
    }
}

/// Substitute the username into a URL template. Only the first placeholder is
/// replaced; a second occurrence is a catalog defect and stays intact.
pub fn fill_template(template: &str, username: &str) -> String {
    template.replacen(PLACEHOLDER, username, 1)
}
