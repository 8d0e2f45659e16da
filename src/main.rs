use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use subscan_rs::config::{self, ScanConfig};
use subscan_rs::progress::ProgressSink;
use subscan_rs::scanner::Scanner;
use subscan_rs::types::ScanOutcome;
use subscan_rs::{ports, store, wordlist};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// subscan-rs — resolve subdomains of a domain, then sample latency and probe ports.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "subscan-rs",
    version,
    about = "Resolve a subdomain wordlist against a domain, then sample latency and probe ports.",
    long_about = None
)]
struct Cli {
    /// Target domain (e.g. example.com). Prompted for interactively when omitted.
    #[arg(long)]
    domain: Option<String>,

    /// Comma-separated ports or ranges to probe on each live host (e.g. 80,443,8000-8010).
    #[arg(long)]
    ports: Option<String>,

    /// Wordlist with one subdomain label per line.
    #[arg(long, default_value = config::DEFAULT_WORDLIST)]
    wordlist: PathBuf,

    /// JSON file that results are appended to.
    #[arg(long, default_value = config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Number of concurrent workers.
    #[arg(long, default_value_t = config::DEFAULT_WORKERS)]
    workers: usize,

    /// Timeout for each DNS lookup and TCP connect, in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = config::DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Connect attempts used to average latency against port 80.
    #[arg(long = "ping-count", default_value_t = config::DEFAULT_PING_COUNT)]
    ping_count: u32,
}

/// Redraws a single `Scanned N / total` status line.
struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn report(&self, current: u64, total: u64) {
        let line = format!("Scanned {} / {} subdomains", current, total);
        print!("\r{}", line.yellow().bold());
        let _ = io::stdout().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (domain, port_input) = match cli.domain.clone() {
        Some(d) => (d, cli.ports.clone().unwrap_or_default()),
        None => {
            let d = prompt("Enter domain (e.g., google.com):")?;
            let p = match cli.ports.clone() {
                Some(p) => p,
                None => prompt("Enter ports to scan (comma-separated, optional):")?,
            };
            (d, p)
        }
    };

    let ports = ports::parse_port_list(&port_input)?;
    let candidates = wordlist::load_wordlist(&cli.wordlist)?;

    let cfg = ScanConfig::new(domain)
        .with_ports(ports)
        .with_workers(cli.workers)
        .with_timeout(Duration::from_millis(cli.timeout_ms))
        .with_ping_count(cli.ping_count);
    let scanner = Scanner::new(cfg).context("invalid scan configuration")?;

    let outcome = scanner.run(&candidates, Arc::new(ConsoleProgress)).await;

    store::merge_results(&cli.output, &outcome.results)?;
    println!(
        "\n{}",
        format!("Done. Results saved to {}", cli.output.display()).blue().bold()
    );
    print_results(&outcome);

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{} ", label.green().bold());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn print_results(outcome: &ScanOutcome) {
    if outcome.results.is_empty() {
        println!("\n{}", "No subdomains found reachable.".red().bold());
        return;
    }

    println!("\n{}", "Reachable Subdomains:".cyan().bold());
    for res in &outcome.results {
        let host = format!("{:<30}", res.host);
        print!(
            "  {} [IP: {} | Avg: {:.2}ms]",
            host.green().bold(),
            res.ip_address.as_deref().unwrap_or("-"),
            res.avg_response_ms
        );
        if !res.open_ports.is_empty() {
            let ports: Vec<String> = res
                .open_ports
                .iter()
                .map(|p| p.magenta().bold().to_string())
                .collect();
            print!(" Open ports: {}", ports.join(", "));
        }
        println!();
    }
    println!(
        "\n{} of {} candidates reachable ({} ms, started {})",
        outcome.summary.reachable,
        outcome.summary.total,
        outcome.summary.elapsed_ms,
        outcome.summary.started_at
    );
}
