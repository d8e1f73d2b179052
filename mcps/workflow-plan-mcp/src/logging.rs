//! Tracing setup
//!
//! Logs go to stderr; stdout carries the MCP protocol.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Targets logged at `info` unless `RUST_LOG` says otherwise
const LOG_TARGETS: [&str; 2] = ["workflow_plan_mcp", "plan_core"];

fn env_filter() -> anyhow::Result<EnvFilter> {
    LOG_TARGETS
        .iter()
        .try_fold(EnvFilter::from_default_env(), |filter, target| {
            Ok(filter.add_directive(format!("{}=info", target).parse()?))
        })
}

fn json_requested() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Install the global subscriber
///
/// Set `LOG_FORMAT=json` for one JSON object per event.
pub fn init_tracing() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter()?);

    if json_requested() {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer.with_ansi(false)).init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so only
    // the filter is checked here.
    #[test]
    fn test_env_filter_covers_both_crates() {
        let filter = env_filter().unwrap().to_string();
        for target in LOG_TARGETS {
            assert!(filter.contains(&format!("{}=info", target)), "{}", filter);
        }
    }
}
