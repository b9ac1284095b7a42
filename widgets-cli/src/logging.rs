use tracing_subscriber::EnvFilter;

/// Log targets for the `widgets` binary and the `widgets-core` library it drives.
const CRATE_TARGETS: &[&str] = &["widgets_cli", "widgets_core"];

/// Initialize tracing for the `widgets_cli` and `widgets_core` targets from the `-v` count.
/// Other crates (reqwest, hyper) are filtered out unless `RUST_LOG` names them.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `RUST_LOG` env var overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter: String =
        CRATE_TARGETS.iter().map(|t| format!("{t}={level}")).collect::<Vec<_>>().join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
