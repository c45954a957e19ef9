//! # IM Export
//!
//! 匯入/匯出層：讀取標準化的表格資料（CSV），寫出可直接上傳的庫內移動檔與診斷檔

pub mod reader;
pub mod writer;

// Re-export 主要函式
pub use reader::{read_bin_master, read_bin_rows, read_demand_rows, read_lots};
pub use writer::{write_diagnostics, write_movements, IM_FILE_HEADER};

/// 匯入/匯出錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV 錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("檔案錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("資料錯誤: {0}")]
    Data(#[from] im_core::ImError),
}

pub type Result<T> = std::result::Result<T, ExportError>;
