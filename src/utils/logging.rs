//! Logger setup for binaries and examples embedding the engine.

/// Initialize the logger with default settings.
/// Uses INFO level by default; the RUST_LOG environment variable can
/// override it. Parameter clamping and underrun details log at DEBUG.
pub fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .init();
}
