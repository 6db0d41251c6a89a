use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::catalog::{Catalog, DetectionStrategy};
use crate::probe;
use crate::sink::RunContext;

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// None: one task per site, no cap (the historical behavior).
    /// Some(n): bounded worker pool, the recommended production mode.
    pub workers: Option<usize>,
    pub timeout_secs: u64,
    /// Skip Unverified catalog entries entirely.
    pub skip_unverified: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            workers: None,
            timeout_secs: 120,
            skip_unverified: false,
        }
    }
}

/// Probe every catalog entry concurrently and report each verdict to the run
/// context. Returns only after every task has been observed to completion;
/// the returned count always equals the catalog length.
pub async fn run(
    ctx: Arc<RunContext>,
    catalog: Arc<Catalog>,
    username: &str,
    opts: &DispatchOptions,
) -> usize {
    let indices: Vec<usize> = catalog
        .websites
        .iter()
        .enumerate()
        .filter(|(_, site)| {
            !(opts.skip_unverified && site.error_type == DetectionStrategy::Unverified)
        })
        .map(|(idx, _)| idx)
        .collect();
    // Skipped entries still count as observed: a decision was made for them.
    let skipped = catalog.websites.len() - indices.len();
    if skipped > 0 {
        tracing::info!("skipping {skipped} unverified sites");
    }

    let completed = match opts.workers {
        None => run_unbounded(&ctx, &catalog, username, opts.timeout_secs, indices).await,
        Some(workers) => {
            run_bounded(&ctx, &catalog, username, opts.timeout_secs, indices, workers.max(1)).await
        }
    };

    completed + skipped
}

async fn run_unbounded(
    ctx: &Arc<RunContext>,
    catalog: &Arc<Catalog>,
    username: &str,
    timeout_secs: u64,
    indices: Vec<usize>,
) -> usize {
    let mut handles = Vec::with_capacity(indices.len());
    for idx in indices {
        let ctx = Arc::clone(ctx);
        let catalog = Arc::clone(catalog);
        let username = username.to_string();
        handles.push(tokio::spawn(async move {
            let site = &catalog.websites[idx];
            let result = probe::probe_site(site, &username, timeout_secs).await;
            ctx.report(&result);
        }));
    }

    // Join barrier: every task is awaited, none is dropped or leaked. A
    // panicked task is still an observed completion.
    let mut completed = 0usize;
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::warn!("probe task aborted: {e}");
        }
        completed += 1;
    }
    completed
}

async fn run_bounded(
    ctx: &Arc<RunContext>,
    catalog: &Arc<Catalog>,
    username: &str,
    timeout_secs: u64,
    indices: Vec<usize>,
    workers: usize,
) -> usize {
    let mut completed = 0usize;
    let probes = stream::iter(indices)
        .map(|idx| {
            let ctx = Arc::clone(ctx);
            let catalog = Arc::clone(catalog);
            let username = username.to_string();
            async move {
                let site = &catalog.websites[idx];
                let result = probe::probe_site(site, &username, timeout_secs).await;
                ctx.report(&result);
            }
        })
        .buffer_unordered(workers);

    futures::pin_mut!(probes);
    while probes.next().await.is_some() {
        completed += 1;
    }
    completed
}
