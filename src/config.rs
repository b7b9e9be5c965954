//! Environment-driven configuration.
//!
//! Every external capability (search, primary provider, secondary provider) is
//! enabled by the presence of its credentials and disabled by their absence.
//! A missing credential never fails startup.

use std::env;

const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "5000";

/// Trimmed value of the variable `name`; unset and blank both count as absent.
pub fn env_nonempty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Listen address, from `BIND_ADDR` and `PORT` (defaults to `0.0.0.0:5000`).
pub fn bind_addr() -> String {
    let host = env_nonempty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND.to_string());
    let port = env_nonempty("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
    format!("{host}:{port}")
}
