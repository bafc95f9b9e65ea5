//! Logging integration for restio.
//!
//! Provides a helper for installing a [`tracing`]-based subscriber and for
//! creating per-resolution spans. The library itself only emits `debug` and
//! `trace` events (rule registration, invalidation, cache flushes); it never
//! logs at `info` or above.

/// Sets up the global tracing subscriber.
///
/// `level` is an `EnvFilter` directive string (e.g. `"debug"`,
/// `"restio_config=trace"`). With `pretty` set, a human-readable format with
/// file/line locations is used; otherwise output is structured JSON.
///
/// Installation is best-effort: if a subscriber is already set (common in
/// tests), the call is a no-op.
pub fn setup_logging(level: &str, pretty: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    if pretty {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span covering one configuration resolution.
///
/// # Examples
///
/// ```
/// use restio_core::logging::resolve_span;
///
/// let span = resolve_span("https://api.example.com/items");
/// let _guard = span.enter();
/// tracing::debug!("recomputing configuration");
/// ```
pub fn resolve_span(url: &str) -> tracing::Span {
    tracing::debug_span!("resolve", url = url)
}
