//! Logging setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Inside Lambda, logs are JSON lines without
/// timestamps since CloudWatch stamps every line itself.
pub fn init_tracing(debug: bool, json: bool) {
    let log_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "todo_gateway={level},todo_core={level},tower_http=debug",
            level = log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_ansi(false).without_time())
            .init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
