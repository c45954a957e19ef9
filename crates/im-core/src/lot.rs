//! 批號可用量模型（FEFO 路徑）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 分配優先級：可揀貨庫存優先於僅儲備庫存
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityClass {
    /// 可揀貨
    Pickable,
    /// 僅儲備
    Reserve,
}

impl Default for PriorityClass {
    fn default() -> Self {
        PriorityClass::Pickable
    }
}

impl std::str::FromStr for PriorityClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pickable" | "pick" => Ok(PriorityClass::Pickable),
            "reserve" | "reserve-only" | "reserve_only" => Ok(PriorityClass::Reserve),
            _ => Err(format!("無效的優先級: {}", s)),
        }
    }
}

/// 批號可用量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotAvailability {
    #[serde(alias = "SKU")]
    pub sku: String,

    #[serde(alias = "Batch")]
    pub batch: String,

    #[serde(alias = "Quantity")]
    pub quantity: Decimal,

    /// 有效期限
    #[serde(alias = "Expiry")]
    pub expiry_date: NaiveDate,

    #[serde(default, alias = "Priority")]
    pub priority_class: PriorityClass,
}

impl LotAvailability {
    /// 創建批號可用量
    pub fn new(sku: &str, batch: &str, quantity: Decimal, expiry_date: NaiveDate) -> Self {
        Self {
            sku: sku.to_string(),
            batch: batch.to_string(),
            quantity,
            expiry_date,
            priority_class: PriorityClass::Pickable,
        }
    }

    /// 建構器模式：設置優先級
    pub fn with_priority_class(mut self, priority_class: PriorityClass) -> Self {
        self.priority_class = priority_class;
        self
    }
}
