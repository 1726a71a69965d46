//! Command-line interface definitions.
//!
//! Options that have an environment fallback say so in `--help`. Values given
//! on the command line override the YAML configuration file.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extract topical articles from news sites and count them per day.
///
/// # Examples
///
/// ```sh
/// # Fetch a URL list for one site and append accepted records to data/vtv.jsonl
/// news_pulse extract --site vtv --urls vtv_urls.txt
///
/// # Daily series for two sites plus their combined total
/// news_pulse aggregate --site vtv --site laodong --combined --out figs/
///
/// # List the registered sites
/// news_pulse sites
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "NEWS_PULSE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch listed pages for one site and append accepted records as JSONL
    Extract {
        /// Site id, e.g. vnexpress or laodong
        #[arg(short, long)]
        site: String,

        /// File with one article URL per line
        #[arg(short, long)]
        urls: PathBuf,

        /// Directory for `{site}.jsonl`
        #[arg(short, long, env = "NEWS_PULSE_DATA_DIR", default_value = "data")]
        out_dir: PathBuf,

        /// Requests in flight at once (overrides config)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Count deduplicated records per day and write smoothed series as JSON
    Aggregate {
        /// Site ids to aggregate (repeatable)
        #[arg(short, long = "site", required = true)]
        sites: Vec<String>,

        /// Directory holding `{site}.jsonl` files
        #[arg(short, long, env = "NEWS_PULSE_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        /// First day of the range, YYYY-MM-DD (overrides config)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the range, inclusive (overrides config)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Also write the sum over all listed sites
        #[arg(long)]
        combined: bool,

        /// Output directory for `series_{site}.json`
        #[arg(short, long, default_value = "figs")]
        out: PathBuf,
    },

    /// List registered site ids
    Sites,
}
