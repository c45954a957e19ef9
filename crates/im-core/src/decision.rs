//! 決策與診斷記錄模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProductBatchKey;

/// 決策動作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// 現有儲位數 > 所需儲位數
    Consolidate,
    /// 現有儲位數 < 所需儲位數
    Distribute,
    /// 持平
    NoAction,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Consolidate => write!(f, "CONSOLIDATE"),
            Action::Distribute => write!(f, "DISTRIBUTE"),
            Action::NoAction => write!(f, "NO_ACTION"),
        }
    }
}

/// 可恢復的單筆失敗原因（不中止整次執行，交由人工跟進）
///
/// 顯示文字是診斷檔的對外格式，保持英文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// 找不到可用的目的儲位
    NoDestinationAvailable,
    /// 級聯找不到可整併的兄弟批次
    NoConsolidationCandidate,
    /// 只完成部分分散
    PartialFulfillment { requested: u32, fulfilled: u32 },
}

impl FailureReason {
    /// 是否完全沒有產生移動
    pub fn blocks_movement(&self) -> bool {
        !matches!(self, FailureReason::PartialFulfillment { .. })
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "manual intervention required: ")?;
        match self {
            FailureReason::NoDestinationAvailable => write!(f, "no destination available"),
            FailureReason::NoConsolidationCandidate => write!(f, "no consolidation candidate"),
            FailureReason::PartialFulfillment {
                requested,
                fulfilled,
            } => write!(f, "partial fulfillment ({}/{} bins)", fulfilled, requested),
        }
    }
}

/// 每筆評估的產品批次對應一筆決策記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub product_id: String,
    pub sku: String,
    pub batch: String,
    pub action: Action,

    /// 規劃時的儲位數
    pub current_bins: u32,

    pub required_zones: u32,

    /// 每儲位平均行數 / 門檻
    pub pressure_index: Option<Decimal>,

    /// 此筆決策產生的移動數
    pub moves_emitted: usize,

    pub error_reason: Option<FailureReason>,

    /// 級聯時提供釋放儲位的兄弟批次
    pub donor_batch: Option<String>,
}

impl DecisionRecord {
    /// 創建決策記錄
    pub fn new(
        key: &ProductBatchKey,
        sku: &str,
        action: Action,
        current_bins: u32,
        required_zones: u32,
    ) -> Self {
        Self {
            product_id: key.product_id.clone(),
            sku: sku.to_string(),
            batch: key.batch.clone(),
            action,
            current_bins,
            required_zones,
            pressure_index: None,
            moves_emitted: 0,
            error_reason: None,
            donor_batch: None,
        }
    }

    pub fn key(&self) -> ProductBatchKey {
        ProductBatchKey::new(&self.product_id, &self.batch)
    }

    /// 是否需要人工介入
    pub fn requires_manual_intervention(&self) -> bool {
        self.error_reason.is_some()
    }
}
