// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rgaabot CLI - RGAA Website Accessibility Compliance Scanner

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rgaabot::analyzer::Analyzer;
use rgaabot::config::Config;
use rgaabot::crawler::HttpCrawler;
use rgaabot::model::{ScanStatus, Site};
use rgaabot::quota::UnlimitedQuota;
use rgaabot::report::{self, TextReportGenerator};
use rgaabot::scanner::ScanService;
use rgaabot::store::MemoryStore;

/// RGAA accessibility compliance scanner for websites
#[derive(Parser)]
#[command(name = "rgaabot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "rgaabot.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a website and audit it against the RGAA checks
    Scan {
        /// Root URL to scan
        url: String,

        /// Crawl depth below the root page
        #[arg(long, default_value_t = 1)]
        max_depth: usize,

        /// Also follow links to subdomains of the root host
        #[arg(long)]
        include_subdomains: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Audit a local HTML file without touching the network
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("rgaabot=debug")
    } else {
        EnvFilter::new("rgaabot=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            url,
            max_depth,
            include_subdomains,
            format,
            output,
            verbose,
        } => {
            init_logging(verbose);
            let config = Config::load(&cli.config)?;
            let exit =
                handle_scan(&config, &url, max_depth, include_subdomains, format, output).await?;
            if exit != 0 {
                std::process::exit(exit);
            }
        }

        Commands::Analyze {
            file,
            format,
            verbose,
        } => {
            init_logging(verbose);
            let exit = handle_analyze(&file, format)?;
            if exit != 0 {
                std::process::exit(exit);
            }
        }
    }

    Ok(())
}

async fn handle_scan(
    config: &Config,
    url: &str,
    max_depth: usize,
    include_subdomains: bool,
    format: FormatArg,
    output: Option<PathBuf>,
) -> anyhow::Result<i32> {
    let store = Arc::new(MemoryStore::new());
    let crawler = Arc::new(HttpCrawler::new(&config.crawler)?);
    let analyzer = Arc::new(Analyzer::new());
    let report = Arc::new(TextReportGenerator::new(config.report.output_dir.clone()));
    let quota = Arc::new(UnlimitedQuota);

    let service = ScanService::new(
        store,
        crawler,
        analyzer,
        report,
        quota,
        config.scan.clone(),
    );

    let site = service
        .register_site(Site::new(url, url, "cli").with_max_depth(max_depth).with_subdomains(include_subdomains))
        .await?;

    let run = service.start_scan(site.id, "cli").await?;
    eprintln!("Scanning {} (scan {})...", url, run.id);

    // The execution task enforces its own timeout, so this loop always
    // observes a terminal status eventually.
    let run = loop {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let current = service
            .get_scan_result(run.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("scan record disappeared"))?;
        if current.status.is_terminal() {
            break current;
        }
    };

    if run.status == ScanStatus::Failed {
        eprintln!(
            "Scan failed: {}",
            run.error_message.as_deref().unwrap_or("unknown error")
        );
        return Ok(2);
    }

    let findings = service.get_scan_findings(run.id).await?;
    let rendered = match format {
        FormatArg::Text => report::render_text(&run, &findings),
        FormatArg::Json => report::render_json(&run, &findings)?,
    };
    write_output(&rendered, output.as_deref())?;

    if run.critical_issues > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn handle_analyze(file: &std::path::Path, format: FormatArg) -> anyhow::Result<i32> {
    let content = std::fs::read_to_string(file)?;
    let analyzer = Analyzer::new();

    let page_url = format!("file://{}", file.display());
    let findings = analyzer.analyze(&page_url, &content);

    match format {
        FormatArg::Text => {
            if findings.is_empty() {
                println!("No accessibility issues found. All checks passed.");
            } else {
                println!("Found {} issue(s) in {}:\n", findings.len(), file.display());
                for finding in &findings {
                    println!("[{}] {} ({})", finding.rule, finding.title, finding.severity);
                    if let Some(ref suggestion) = finding.fix_suggestion {
                        println!("  Fix: {}", suggestion);
                    }
                }
            }
        }
        FormatArg::Json => {
            println!("{}", serde_json::to_string_pretty(&findings)?);
        }
    }

    let criticals = findings
        .iter()
        .filter(|f| f.severity == rgaabot::model::Severity::Critical)
        .count();
    if criticals > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
