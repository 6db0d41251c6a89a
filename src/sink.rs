use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use colored::Colorize;
use parking_lot::Mutex;

/// Final classification of one site probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Found,
    NotFound,
    Unknown,
    Errored,
}

/// One probe outcome, consumed once by the sink.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub site_name: String,
    pub display_url: String,
    pub verdict: Verdict,
    pub evidence: Option<String>,
}

impl ProbeResult {
    pub fn found(site_name: &str, display_url: String) -> Self {
        Self {
            site_name: site_name.to_string(),
            display_url,
            verdict: Verdict::Found,
            evidence: None,
        }
    }

    pub fn not_found(site_name: &str, display_url: String, evidence: String) -> Self {
        Self {
            site_name: site_name.to_string(),
            display_url,
            verdict: Verdict::NotFound,
            evidence: Some(evidence),
        }
    }

    pub fn unknown(site_name: &str, display_url: String) -> Self {
        Self {
            site_name: site_name.to_string(),
            display_url,
            verdict: Verdict::Unknown,
            evidence: None,
        }
    }

    pub fn errored(site_name: &str, display_url: String, evidence: String) -> Self {
        Self {
            site_name: site_name.to_string(),
            display_url,
            verdict: Verdict::Errored,
            evidence: Some(evidence),
        }
    }
}

/// Shared hit counter. Unverified sites count as tentative hits.
#[derive(Debug, Default)]
pub struct RunCounters {
    found: AtomicUsize,
}

impl RunCounters {
    pub fn record_hit(&self) {
        self.found.fetch_add(1, Ordering::SeqCst);
    }

    pub fn found(&self) -> usize {
        self.found.load(Ordering::SeqCst)
    }
}

/// Per-invocation state threaded through every probe task: counters, output
/// destination and color choice. No process-level globals.
pub struct RunContext {
    pub username: String,
    pub counters: RunCounters,
    output: Option<PathBuf>,
    file_lock: Mutex<()>,
    color: bool,
}

impl RunContext {
    pub fn new(username: &str, output: Option<PathBuf>, color: bool) -> Self {
        Self {
            username: username.to_string(),
            counters: RunCounters::default(),
            output,
            file_lock: Mutex::new(()),
            color,
        }
    }

    pub fn found(&self) -> usize {
        self.counters.found()
    }

    /// Console + file emission for one verdict. Safe for concurrent callers;
    /// file writes are serialized so lines never interleave.
    pub fn report(&self, result: &ProbeResult) {
        match result.verdict {
            Verdict::Found => {
                println!("{}", self.paint(format!(":: {}", result.display_url).green()));
                self.counters.record_hit();
                if let Err(e) = self.append_line(&result.display_url) {
                    tracing::warn!("failed to record {}: {e:#}", result.site_name);
                }
            }
            Verdict::Unknown => {
                println!(
                    "{}",
                    self.paint(format!(":: [?] {}", result.display_url).yellow())
                );
                self.counters.record_hit();
                if let Err(e) = self.append_line(&format!("[?] {}", result.display_url)) {
                    tracing::warn!("failed to record {}: {e:#}", result.site_name);
                }
            }
            Verdict::NotFound => {
                println!("{}", self.paint(format!("-- {}", result.display_url).dimmed()));
            }
            Verdict::Errored => {
                let detail = result.evidence.as_deref().unwrap_or("unknown error");
                println!(
                    "{}",
                    self.paint(format!("!! {}: {detail}", result.site_name).red())
                );
            }
        }
    }

    /// Append one line to the per-username results file. Open, write and close
    /// happen as one unit under the lock.
    pub fn append_line(&self, line: &str) -> anyhow::Result<()> {
        let Some(path) = &self.output else {
            return Ok(());
        };
        let _guard = self.file_lock.lock();
        let mut f = OpenOptions::new().append(true).create(true).open(path)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        Ok(())
    }

    fn paint(&self, s: colored::ColoredString) -> String {
        if self.color {
            s.to_string()
        } else {
            s.clear().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn concurrent_hits_are_all_counted() {
        let ctx = Arc::new(RunContext::new("ghost123", None, false));
        let mut handles = Vec::new();
        for i in 0..32 {
            let ctx = Arc::clone(&ctx);
            handles.push(tokio::spawn(async move {
                ctx.report(&ProbeResult::found(
                    "site",
                    format!("https://example.com/u{i}"),
                ));
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(ctx.found(), 32);
    }

    #[test]
    fn append_creates_file_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost123.txt");
        let ctx = RunContext::new("ghost123", Some(path.clone()), false);

        // misses and errors never touch the file
        ctx.report(&ProbeResult::not_found(
            "site",
            "https://example.com/u/ghost123".into(),
            "status 404".into(),
        ));
        assert!(!path.exists());

        ctx.report(&ProbeResult::found(
            "site",
            "https://example.com/u/ghost123".into(),
        ));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "https://example.com/u/ghost123\n");
    }
}
