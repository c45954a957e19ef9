//! # IM Core
//!
//! 庫內移動（Internal Movement）規劃的核心資料模型與類型定義

pub mod bin_master;
pub mod config;
pub mod decision;
pub mod demand;
pub mod inventory;
pub mod lot;
pub mod movement;

// Re-export 主要類型
pub use bin_master::BinMasterEntry;
pub use config::{PlanningConfig, ZoneRange};
pub use decision::{Action, DecisionRecord, FailureReason};
pub use demand::{DemandLine, RawDemandRow};
pub use inventory::{BinStock, ProductBatchKey, ProductBatchSummary, RawBinRow};
pub use lot::{LotAvailability, PriorityClass};
pub use movement::{MovementInstruction, MovementKind};

/// 規劃錯誤類型
///
/// 所有變體皆屬資料錯誤：在規劃開始前中止整次執行
#[derive(Debug, thiserror::Error)]
pub enum ImError {
    #[error("第 {row} 列缺少必要欄位: {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("第 {row} 列欄位 {field} 不是有效數字: {value:?}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("第 {row} 列的日期無效: {value:?}")]
    InvalidDate { row: usize, value: String },

    #[error("配置無效: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ImError>;

/// 標準化代碼（去除空白並轉為大寫），所有鍵值比對前皆須經過此處理
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}
