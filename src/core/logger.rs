use log::LevelFilter;

/// Info by default with HTTP client internals held at warn; `RUST_LOG`
/// overrides both.
pub fn setup_logging() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
