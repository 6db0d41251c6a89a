//! Auxiliary intelligence lookups that run after the site sweep: info-stealer
//! exposure, compromised-credential dumps and breach indexes. Each lookup is
//! best-effort; failures degrade to a warning and never affect the sweep.

pub mod breachdirectory;
pub mod hudsonrock;
pub mod proxynova;

use std::time::Duration;

use anyhow::Context;

use crate::probe::transport::DEFAULT_USER_AGENT;

/// Plain client for the JSON intelligence APIs. None of them need the
/// hardened per-site transport.
pub fn client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .context("building intelligence lookup client")
}
