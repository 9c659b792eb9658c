use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "stay_market";

/// 預設過濾規則；設定 `RUST_LOG` 時以環境變數為準
fn default_directives(level: &str, verbose: bool) -> String {
    if verbose {
        format!("{}=debug,info", CRATE_TARGET)
    } else {
        format!("{}={}", CRATE_TARGET, level)
    }
}

fn filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level, verbose)))
}

fn plain_layer<S>() -> fmt::Layer<S> {
    fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Compact human-readable output for interactive CLI runs.
pub fn init_cli_logger(level: &str, verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(level, verbose))
        .with(plain_layer().compact())
        .init();
}

/// JSON 格式日誌，給集中式 log 收集使用
pub fn init_json_logger(level: &str, verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(level, verbose))
        .with(plain_layer().json())
        .init();
}
