//! # news_pulse
//!
//! Command-line front end for the extraction pipeline and the daily
//! aggregator.
//!
//! ## Usage
//!
//! ```sh
//! news_pulse extract --site vtv --urls vtv_urls.txt --out-dir data/
//! news_pulse aggregate --site vtv --site laodong --combined --out figs/
//! ```
//!
//! ## Flow
//!
//! 1. **Config**: load YAML (or defaults) and compile the rule registry
//! 2. **Extract**: fetch listed pages, extract, filter, append JSONL
//! 3. **Aggregate**: read JSONL back, dedup, count, smooth, write JSON series

use clap::Parser;
use news_pulse::aggregate::{self, DateRange};
use news_pulse::config::PipelineConfig;
use news_pulse::extract::Extractor;
use news_pulse::fetch::{self, Fetcher};
use news_pulse::models::DailySeries;
use news_pulse::outputs::{jsonl, series};
use news_pulse::pipeline::Pipeline;
use news_pulse::utils::ensure_writable_dir;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = PipelineConfig::load_or_default(args.config.as_deref())?;

    let result = match args.command {
        Command::Extract {
            site,
            urls,
            out_dir,
            concurrency,
        } => run_extract(config, &site, &urls, &out_dir, concurrency).await,
        Command::Aggregate {
            sites,
            data_dir,
            from,
            to,
            combined,
            out,
        } => {
            let base = config.date_range()?;
            let range = DateRange::new(from.unwrap_or(base.start), to.unwrap_or(base.end))?;
            run_aggregate(&config, &sites, &data_dir, range, combined, &out).await
        }
        Command::Sites => list_sites(&config),
    };

    if let Err(e) = &result {
        error!(error = %e, "Run failed");
    }
    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), millis = elapsed.subsec_millis(), "Execution complete");
    result
}

#[instrument(level = "info", skip(config, urls, out_dir))]
async fn run_extract(
    mut config: PipelineConfig,
    site: &str,
    urls: &Path,
    out_dir: &Path,
    concurrency: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    if let Some(n) = concurrency {
        config.fetch.concurrency = n;
    }

    // Resolve everything that can fail before the first request goes out.
    let registry = config.registry()?;
    let extractor = Extractor::new(&registry).for_site(site)?;
    let window = config.date_window();
    let keywords = config.keyword_set();
    ensure_writable_dir(out_dir).await?;
    let urls = fetch::read_url_list(urls).await?;
    let fetcher = Fetcher::new(&config.fetch)?;

    info!(
        urls = urls.len(),
        concurrency = config.fetch.concurrency,
        keywords = ?keywords.as_slice(),
        "Starting extraction"
    );

    let mut sink = jsonl::JsonlSink::open(jsonl::site_path(out_dir, site)).await?;
    let mut pipeline = Pipeline::new(extractor, &window, &keywords);
    let stats = fetch::run_site(&fetcher, &mut pipeline, urls, &mut sink).await?;
    sink.finish().await?;
    stats.log_summary(site);
    Ok(())
}

#[instrument(level = "info", skip(config, data_dir, out))]
async fn run_aggregate(
    config: &PipelineConfig,
    sites: &[String],
    data_dir: &Path,
    range: DateRange,
    combined: bool,
    out: &Path,
) -> Result<(), Box<dyn Error>> {
    let smoothing = config.smoothing()?;
    ensure_writable_dir(out).await?;

    let mut per_site = Vec::with_capacity(sites.len());
    for site in sites {
        let records = jsonl::read_records(jsonl::site_path(data_dir, site)).await?;
        let counts = aggregate::aggregate(&records, &range, &smoothing);
        let daily = DailySeries::from_counts(site.as_str(), &counts);
        info!(
            site = %site,
            articles = daily.total(),
            days = daily.len(),
            "Aggregated site"
        );
        series::write_series(&daily, out.join(format!("series_{site}.json"))).await?;
        per_site.push(records);
    }

    if combined {
        let counts = aggregate::aggregate_sites(per_site.iter().map(Vec::as_slice), &range, &smoothing);
        let daily = DailySeries::from_counts("all", &counts);
        info!(sites = sites.len(), articles = daily.total(), "Aggregated all sites");
        series::write_series(&daily, out.join("series_all.json")).await?;
    }
    Ok(())
}

fn list_sites(config: &PipelineConfig) -> Result<(), Box<dyn Error>> {
    let registry = config.registry()?;
    for id in registry.site_ids() {
        let rule = registry.lookup(id)?;
        println!("{id}\t{}", rule.start_urls.join(" "));
    }
    Ok(())
}
