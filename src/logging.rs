//! tracingによる構造化ログの初期化
//!
//! 利用者向けの進捗表示は標準出力（println!）、内部ログはtracing経由で標準エラーへ出す。

use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// グローバルsubscriberを初期化（2回目以降の呼び出しは無視）
pub fn init_tracing(verbose: bool, json: bool) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(default_filter(verbose));

        if json {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
                .init();
        } else {
            registry
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .init();
        }

        tracing::debug!(json, "tracing initialized");
    });
}
