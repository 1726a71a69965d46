//! # news_pulse
//!
//! Rule-driven extraction of topical news articles and per-day counting.
//!
//! Each supported site is described by a [`rules::SiteRuleSpec`]: how to
//! recognise an article page, where its publish date lives and in which
//! format, and where the title, keywords and description are. The pipeline
//! applies that rule to a page, filters the result by a date window and a
//! keyword list, and appends accepted records to a per-site JSONL file. The
//! aggregator later reads those files back, deduplicates by URL and turns
//! them into a daily count with a smoothed curve and its gradient.
//!
//! ## Architecture
//!
//! 1. **Rules** ([`rules`], [`sites`]): compiled, validated per-site rules
//! 2. **Extraction** ([`extract`], [`dates`]): page to [`models::RawCandidate`]
//! 3. **Filtering** ([`filter`], [`pipeline`]): candidate to [`models::AcceptedRecord`]
//! 4. **Output** ([`outputs`]): JSONL records and JSON daily series
//! 5. **Aggregation** ([`aggregate`]): records to [`models::DailyCount`]
//!
//! ```no_run
//! use news_pulse::{config::PipelineConfig, extract::Extractor, pipeline::Pipeline, rules::RuleRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let registry = RuleRegistry::builtin()?;
//! let (window, keywords) = (config.date_window(), config.keyword_set());
//! let mut pipeline = Pipeline::new(Extractor::new(&registry).for_site("vtv")?, &window, &keywords);
//! let record = pipeline.process_html("https://vtv.vn/a.htm", "<html>...</html>");
//! # let _ = record;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod config;
pub mod dates;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod rules;
pub mod sites;
pub mod utils;

pub use error::{ConfigError, SinkError};
