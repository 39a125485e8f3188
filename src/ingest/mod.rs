/// External data ingestion for the climate monitoring service.
///
/// Submodules:
/// - `open_meteo` — Open-Meteo archive API client for historical daily
///   climate records.

pub mod open_meteo;
