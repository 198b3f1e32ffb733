// Build-time identity from Cargo.toml, shown in the dashboard title

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Title line for the dashboard, e.g. "dockerview 0.3.0".
pub fn title() -> String {
    format!("{NAME} {VERSION}")
}
