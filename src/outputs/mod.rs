//! Persistence for pipeline output.
//!
//! - [`jsonl`]: append-only per-site record files and a tolerant reader
//! - [`series`]: aggregated daily series as JSON for charting
//!
//! ```text
//! data/
//! ├── vnexpress.jsonl
//! └── laodong.jsonl
//!
//! figs/
//! ├── series_vnexpress.json
//! └── series_all.json
//! ```

pub mod jsonl;
pub mod series;
