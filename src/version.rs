// Crate name and version baked in at build time; reported by /health and sent upstream.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `User-Agent` for eero API requests, e.g. `eero-dashboard/0.3.0`.
pub fn user_agent() -> String {
    format!("{}/{}", NAME, VERSION)
}
