//! Tracing and logging setup shared by the storefront binaries.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide tracing, reading `LOG_FORMAT` and `RUST_LOG`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .map(|raw| LogFormat::parse(&raw))
        .unwrap_or_default();
    self::tracing::init(format);
}
