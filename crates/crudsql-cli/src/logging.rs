use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` for crudsql targets with `--debug`.
pub fn init(debug: bool) -> anyhow::Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{directives}': {e}"))?,
        _ => EnvFilter::new(default_directives(debug)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn default_directives(debug: bool) -> &'static str {
    if debug {
        "info,crudsql=debug,crudsql.sql=debug,tokio_postgres=warn"
    } else {
        "info,tokio_postgres=warn"
    }
}
