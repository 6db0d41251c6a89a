//! Domain-permutation sweep: does `<username>.<tld>` resolve to a live site?
//! Any HTTP response at all marks the domain as taken; a connection failure
//! suggests it is unregistered or parked without a web server.

use futures::stream::{self, StreamExt};

pub const TLDS: &[&str] = &[
    "com", "net", "org", "io", "dev", "me", "app", "co", "xyz", "info", "online", "site", "biz",
    "us", "tv", "pro", "cc", "store", "tech", "shop", "blog", "live", "club", "one",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainStatus {
    Taken,
    Available,
}

#[derive(Debug, Clone)]
pub struct DomainProbe {
    pub domain: String,
    pub status: DomainStatus,
}

pub fn permutations(username: &str) -> Vec<String> {
    TLDS.iter().map(|tld| format!("{username}.{tld}")).collect()
}

pub async fn sweep(client: &reqwest::Client, username: &str) -> Vec<DomainProbe> {
    stream::iter(permutations(username))
        .map(|domain| {
            let client = client.clone();
            async move {
                let status = match client.get(format!("http://{domain}")).send().await {
                    Ok(_) => DomainStatus::Taken,
                    Err(_) => DomainStatus::Available,
                };
                DomainProbe { domain, status }
            }
        })
        .buffer_unordered(16)
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutations_cover_every_tld_once() {
        let perms = permutations("ghost123");
        assert_eq!(perms.len(), TLDS.len());
        assert!(perms.contains(&"ghost123.com".to_string()));
        assert!(perms.iter().all(|d| d.starts_with("ghost123.")));
    }
}
