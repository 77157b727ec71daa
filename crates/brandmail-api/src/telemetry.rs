use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize tracing with a compact console format.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    // Console: compact format (message string for convenience).
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brandmail=debug,tower_http=debug".into()),
        )
        .with(console_fmt)
        .init();

    Ok(())
}
