pub mod decoder;
pub mod strategy;
pub mod transport;

use reqwest::header::CONTENT_ENCODING;

use crate::catalog::{fill_template, DetectionStrategy, SiteDescriptor};
use crate::sink::ProbeResult;
use strategy::Signal;

/// Run one existence check: build the request from the descriptor, execute it
/// under the hardened transport, decode the body if the strategy needs it and
/// map the response to a verdict.
///
/// Every failure is local: the returned result is `Errored` and the caller
/// moves on to the next site.
pub async fn probe_site(site: &SiteDescriptor, username: &str, timeout_secs: u64) -> ProbeResult {
    // What we report to the user is always the profile URL, even when the
    // check itself hits a different endpoint.
    let display_url = fill_template(&site.base_url, username);

    if site.error_type == DetectionStrategy::Unverified {
        return ProbeResult::unknown(&site.name, display_url);
    }

    let request_url = match site.url_probe.as_deref() {
        Some(probe) => fill_template(probe, username),
        None => display_url.clone(),
    };

    let client = match transport::build_client(site, timeout_secs) {
        Ok(client) => client,
        Err(e) => return ProbeResult::errored(&site.name, display_url, format!("client setup: {e:#}")),
    };

    let response = match client.get(&request_url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("{}: request failed: {e}", site.name);
            return ProbeResult::errored(&site.name, display_url, format!("request: {e}"));
        }
    };

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_encoding = response
        .headers()
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let signal = match site.error_type {
        DetectionStrategy::StatusCode => {
            let Some(expected) = site.error_code else {
                return ProbeResult::errored(
                    &site.name,
                    display_url,
                    "catalog entry missing error_code".into(),
                );
            };
            strategy::status_code(status, expected)
        }
        DetectionStrategy::ErrorMessage | DetectionStrategy::ProfilePresence => {
            let Some(needle) = site.error_msg.clone() else {
                return ProbeResult::errored(
                    &site.name,
                    display_url,
                    "catalog entry missing error_msg".into(),
                );
            };
            let raw = match response.bytes().await {
                Ok(raw) => raw,
                Err(e) => {
                    return ProbeResult::errored(&site.name, display_url, format!("body read: {e}"))
                }
            };
            let body = match decoder::decode_body(content_encoding.as_deref(), &raw) {
                Ok(body) => body,
                Err(e) => return ProbeResult::errored(&site.name, display_url, format!("{e:#}")),
            };
            if site.error_type == DetectionStrategy::ErrorMessage {
                strategy::error_message(status, &body, &needle)
            } else {
                strategy::profile_presence(status, &body, &needle)
            }
        }
        DetectionStrategy::ResponseUrl => {
            let Some(expected) = site.response_url.as_deref() else {
                return ProbeResult::errored(
                    &site.name,
                    display_url,
                    "catalog entry missing response_url".into(),
                );
            };
            strategy::response_url(status, &final_url, &fill_template(expected, username))
        }
        DetectionStrategy::Unverified => return ProbeResult::unknown(&site.name, display_url),
    };

    match signal {
        Signal::Found => ProbeResult::found(&site.name, display_url),
        Signal::NotFound => {
            ProbeResult::not_found(&site.name, display_url, format!("status {status}"))
        }
        Signal::NoSignal => ProbeResult::not_found(
            &site.name,
            display_url,
            format!("status {status} carries no signal"),
        ),
    }
}
