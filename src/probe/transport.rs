use std::time::Duration;

use anyhow::Context;
use once_cell::sync::Lazy;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, COOKIE,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{redirect, Client, ClientBuilder};

use crate::catalog::SiteDescriptor;

/// Fallback UA when a catalog entry carries no override.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pinned TLS policy: 1.2 floor, modern AEAD suites only, X25519 preferred.
/// Built once and cloned into every per-site client.
static TLS_CONFIG: Lazy<rustls::ClientConfig> = Lazy::new(|| {
    let mut roots = rustls::RootCertStore::empty();
    roots.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|ta| {
        rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
            ta.subject,
            ta.spki,
            ta.name_constraints,
        )
    }));

    let suites = [
        rustls::cipher_suite::TLS13_AES_256_GCM_SHA384,
        rustls::cipher_suite::TLS13_AES_128_GCM_SHA256,
        rustls::cipher_suite::TLS13_CHACHA20_POLY1305_SHA256,
        rustls::cipher_suite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
        rustls::cipher_suite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
        rustls::cipher_suite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
        rustls::cipher_suite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
        rustls::cipher_suite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256,
        rustls::cipher_suite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
    ];
    let kx_groups: [&'static rustls::SupportedKxGroup; 3] = [
        &rustls::kx_group::X25519,
        &rustls::kx_group::SECP256R1,
        &rustls::kx_group::SECP384R1,
    ];

    let mut cfg = rustls::ClientConfig::builder()
        .with_cipher_suites(&suites)
        .with_kx_groups(&kx_groups)
        .with_protocol_versions(&[&rustls::version::TLS13, &rustls::version::TLS12])
        .expect("TLS 1.2/1.3 accept the configured suites")
        .with_root_certificates(roots)
        .with_no_client_auth();
    cfg.alpn_protocols = vec![b"http/1.1".to_vec()];
    cfg
});

/// Browser-like header set attached to every probe.
///
/// Accept-Encoding is pinned here, which disables reqwest's transparent
/// decompression; the decoder normalizes bodies instead.
static BROWSER_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers
});

/// Build the HTTP client for one site: pinned TLS, bounded timeouts, the
/// descriptor's redirect policy, cookies and user agent.
pub fn build_client(site: &SiteDescriptor, timeout_secs: u64) -> anyhow::Result<Client> {
    let redirect_policy = if site.follow_redirects {
        redirect::Policy::limited(10)
    } else {
        // stop at the first redirect and expose it to the strategy
        redirect::Policy::none()
    };

    let mut headers = BROWSER_HEADERS.clone();
    if !site.cookies.is_empty() {
        let joined = site
            .cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&joined)
                .with_context(|| format!("cookie header for {}", site.name))?,
        );
    }

    ClientBuilder::new()
        .use_preconfigured_tls(TLS_CONFIG.clone())
        .default_headers(headers)
        .user_agent(site.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
        // Timeouts: one stuck site must never stall the run
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(30))
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_nodelay(true)
        .redirect(redirect_policy)
        .build()
        .with_context(|| format!("building HTTP client for {}", site.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CookiePair, DetectionStrategy};

    fn descriptor(follow_redirects: bool) -> SiteDescriptor {
        SiteDescriptor {
            name: "Example".into(),
            base_url: "https://example.com/{}".into(),
            url_probe: None,
            follow_redirects,
            user_agent: None,
            error_type: DetectionStrategy::StatusCode,
            error_code: Some(404),
            error_msg: None,
            response_url: None,
            cookies: vec![CookiePair {
                name: "session".into(),
                value: "abc".into(),
            }],
        }
    }

    #[test]
    fn client_builds_for_both_redirect_policies() {
        assert!(build_client(&descriptor(true), 120).is_ok());
        assert!(build_client(&descriptor(false), 120).is_ok());
    }

    #[test]
    fn newline_in_cookie_value_is_rejected() {
        let mut site = descriptor(true);
        site.cookies[0].value = "a\nb".into();
        assert!(build_client(&site, 120).is_err());
    }
}
