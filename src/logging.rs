//! 日誌初始化

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌
///
/// 由 `RUST_LOG` 控制層級，未設定時為 `info`，例如 `RUST_LOG=im_calc=debug`
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 測試用日誌，可重複呼叫
///
/// 預設只開啟規劃引擎與匯出層的 debug 日誌
pub fn init_test() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("im_calc=debug,im_export=debug"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
