use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use crate::cli::Cli;
use handle_hunter::catalog::Catalog;
use handle_hunter::dispatch::{self, DispatchOptions};
use handle_hunter::domains::{self, DomainStatus};
use handle_hunter::intel;
use handle_hunter::sink::RunContext;

fn print_ascii_logo() {
    println!(
        r#"
  _   _    _    _   _ ____  _     _____   _   _ _   _ _   _ _____ _____ ____
 | | | |  / \  | \ | |  _ \| |   | ____| | | | | | | | \ | |_   _| ____|  _ \
 | |_| | / _ \ |  \| | | | | |   |  _|   | |_| | | | |  \| | | | |  _| | |_) |
 |  _  |/ ___ \| |\  | |_| | |___| |___  |  _  | |_| | |\  | | | | |___|  _ <
 |_| |_/_/   \_\_| \_|____/|_____|_____| |_| |_|\___/|_| \_| |_| |_____|_| \_\

                         Username Hunter v0.1.0
    "#
    );
}

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Configure logging based on global flags. External crates stay at INFO
    // so a noisy transport doesn't flood the CLI.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter_str =
        format!("handle_hunter={crate_level},reqwest=info,hyper=info,rustls=info");
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();

    print_ascii_logo();

    // A partial catalog is never acceptable: any fetch/parse failure aborts
    // the run before probing starts.
    let catalog = Catalog::load(&cli.catalog).await?;
    anyhow::ensure!(!catalog.is_empty(), "site catalog {} lists no websites", cli.catalog);

    let out_dir = PathBuf::from(&cli.out);
    if !out_dir.exists() {
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    }
    let output_path = out_dir.join(format!("{}.txt", cli.username));

    println!("{}", "-".repeat(60));
    println!(":: Username : {}", cli.username);
    println!(":: Websites : {}", catalog.len());
    match cli.workers {
        Some(n) => println!(":: Workers  : {n}"),
        None => println!(":: Workers  : one task per site (unbounded)"),
    }
    println!("{}", "-".repeat(60));
    println!(":: A yellow [?] link means the site gives no way to verify the username.\n");

    let ctx = Arc::new(RunContext::new(
        &cli.username,
        Some(output_path.clone()),
        !cli.no_color,
    ));
    let catalog = Arc::new(catalog);
    let opts = DispatchOptions {
        workers: cli.workers,
        timeout_secs: cli.timeout,
        skip_unverified: cli.no_false_positives,
    };

    let started = Instant::now();
    let completed = dispatch::run(Arc::clone(&ctx), Arc::clone(&catalog), &cli.username, &opts).await;

    let found = ctx.found();
    println!("\n{}", "-".repeat(60));
    println!(
        "[+] {} profiles found across {} sites in {:.1}s",
        found,
        completed,
        started.elapsed().as_secs_f64()
    );
    if let Err(e) = ctx.append_line(&format!(":: {found} profiles found for {}", cli.username)) {
        tracing::warn!("failed to append summary line: {e:#}");
    }

    run_intel(&ctx, &cli).await;

    if cli.domains {
        run_domain_sweep(&ctx, &cli.username).await;
    }

    println!("\n[=] Results saved to: {}", output_path.display());
    Ok(())
}

/// Post-sweep intelligence lookups. All best-effort: a dead API degrades to a
/// warning, never a failed run.
async fn run_intel(ctx: &RunContext, cli: &Cli) {
    let client = match intel::client() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("skipping intelligence lookups: {e:#}");
            return;
        }
    };

    println!("\n[*] Checking stealer logs (HudsonRock)...");
    match intel::hudsonrock::lookup(&client, &cli.username).await {
        Ok(report) if report.is_clean() => {
            println!("    No stealer infections associated with this username");
        }
        Ok(report) => {
            println!(
                "    [!] {} infected machine(s) reference this username",
                report.stealers.len()
            );
            for entry in &report.stealers {
                if let Some(family) = &entry.stealer_family {
                    println!("      Stealer     : {family}");
                }
                if let Some(date) = &entry.date_compromised {
                    println!("      Compromised : {date}");
                }
                if let Some(name) = &entry.computer_name {
                    println!("      Computer    : {name}");
                }
                if let Some(os) = &entry.operating_system {
                    println!("      OS          : {os}");
                }
                if let Some(path) = &entry.malware_path {
                    println!("      Malware path: {path}");
                }
                if let Some(av) = &entry.antiviruses {
                    println!("      Antiviruses : {}", av.join());
                }
                let family = entry.stealer_family.as_deref().unwrap_or("unknown stealer");
                let date = entry.date_compromised.as_deref().unwrap_or("unknown date");
                if let Err(e) = ctx.append_line(&format!("[stealer] {family} ({date})")) {
                    tracing::warn!("failed to record stealer entry: {e:#}");
                }
            }
        }
        Err(e) => tracing::warn!("HudsonRock lookup failed: {e:#}"),
    }

    println!("[*] Checking compromised credentials (ProxyNova)...");
    match intel::proxynova::lookup(&client, &cli.username, 20).await {
        Ok(comb) if comb.lines.is_empty() => {
            println!("    No leaked credentials for this username");
        }
        Ok(comb) => {
            println!(
                "    [!] {} leaked credential line(s), showing {}",
                comb.count,
                comb.lines.len()
            );
            for line in &comb.lines {
                println!("      {line}");
                if let Err(e) = ctx.append_line(&format!("[comb] {line}")) {
                    tracing::warn!("failed to record credential line: {e:#}");
                }
            }
        }
        Err(e) => tracing::warn!("ProxyNova lookup failed: {e:#}"),
    }

    if let Some(key) = &cli.breach_key {
        println!("[*] Checking breach index (BreachDirectory)...");
        match intel::breachdirectory::lookup(&client, &cli.username, key).await {
            Ok(resp) if resp.result.is_empty() => println!("    No breach records"),
            Ok(resp) => {
                println!("    [!] {} breach record(s)", resp.found);
                for entry in &resp.result {
                    if let Some(sources) = &entry.sources {
                        println!("      Sources : {}", sources.join());
                    }
                    if let Some(password) = &entry.password {
                        println!("      Password: {password}");
                    } else if let Some(sha1) = &entry.sha1 {
                        println!("      SHA-1   : {sha1}");
                    } else if let Some(hash) = &entry.hash {
                        println!("      Hash    : {hash}");
                    }
                    let source = entry
                        .sources
                        .as_ref()
                        .map(|s| s.join())
                        .unwrap_or_else(|| "unknown source".to_string());
                    if let Err(e) = ctx.append_line(&format!("[breach] {source}")) {
                        tracing::warn!("failed to record breach entry: {e:#}");
                    }
                }
            }
            Err(e) => tracing::warn!("BreachDirectory lookup failed: {e:#}"),
        }
    }
}

async fn run_domain_sweep(ctx: &RunContext, username: &str) {
    println!("\n[*] Sweeping domain permutations...");
    let client = match intel::client() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("skipping domain sweep: {e:#}");
            return;
        }
    };
    let probes = domains::sweep(&client, username).await;
    let mut taken = 0usize;
    for probe in &probes {
        if probe.status == DomainStatus::Taken {
            taken += 1;
            println!("    [+] {} is registered", probe.domain);
            if let Err(e) = ctx.append_line(&format!("[domain] {}", probe.domain)) {
                tracing::warn!("failed to record domain: {e:#}");
            }
        }
    }
    println!("    {} of {} permutations answered", taken, probes.len());
}
