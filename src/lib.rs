/// Climate monitoring service: fetches historical daily climate records for
/// a registry of geocoded sites, derives seasonal statistics and yearly
/// trends, and writes timestamped CSV/JSON artifacts.
///
/// The aggregation core (`analysis`) is pure and I/O-free; everything
/// touching the network, the clock, or the filesystem lives at the edges
/// (`ingest`, `export`, `main`).

pub mod analysis;
pub mod config;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod sites;
