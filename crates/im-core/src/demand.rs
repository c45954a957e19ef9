//! 揀貨需求模型

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ProductBatchKey;

/// 原始需求列（外部匯入層提供，尚未驗證）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDemandRow {
    /// 產品ID（缺省時以 SKU 代替）
    #[serde(default, alias = "Product")]
    pub product_id: Option<String>,

    #[serde(default, alias = "SKU")]
    pub sku: Option<String>,

    #[serde(default, alias = "Batch")]
    pub batch: Option<String>,

    /// 預測揀貨行數（日均）
    #[serde(default, alias = "Lines")]
    pub lines: Option<String>,

    /// 預測揀貨數量（日均）
    #[serde(default, alias = "Quantity")]
    pub quantity: Option<String>,
}

impl RawDemandRow {
    /// 創建原始需求列
    pub fn new(sku: &str, batch: &str, lines: impl ToString, quantity: impl ToString) -> Self {
        Self {
            product_id: None,
            sku: Some(sku.to_string()),
            batch: Some(batch.to_string()),
            lines: Some(lines.to_string()),
            quantity: Some(quantity.to_string()),
        }
    }

    /// 建構器模式：設置產品ID
    pub fn with_product_id(mut self, product_id: &str) -> Self {
        self.product_id = Some(product_id.to_string());
        self
    }
}

/// 標準化需求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandLine {
    pub product_id: String,
    pub sku: String,
    pub batch: String,

    /// 揀貨行數
    pub lines: Decimal,

    /// 揀貨數量
    pub quantity: Decimal,

    /// 所需儲位數 = ceil(lines / threshold)，至少為 1
    pub required_zones: u32,

    /// 輸入順序（同分時的穩定排序依據）
    pub input_order: usize,
}

impl DemandLine {
    /// 創建標準化需求，並依門檻計算所需儲位數
    pub fn new(
        product_id: String,
        sku: String,
        batch: String,
        lines: Decimal,
        quantity: Decimal,
        threshold: u32,
    ) -> Self {
        let required_zones = Self::required_zones_for(lines, threshold);
        Self {
            product_id,
            sku,
            batch,
            lines,
            quantity,
            required_zones,
            input_order: 0,
        }
    }

    /// 建構器模式：設置輸入順序
    pub fn with_input_order(mut self, input_order: usize) -> Self {
        self.input_order = input_order;
        self
    }

    pub fn key(&self) -> ProductBatchKey {
        ProductBatchKey::new(&self.product_id, &self.batch)
    }

    /// ceil(lines / threshold)，下限為 1
    pub fn required_zones_for(lines: Decimal, threshold: u32) -> u32 {
        if threshold == 0 || lines <= Decimal::ZERO {
            return 1;
        }
        (lines / Decimal::from(threshold))
            .ceil()
            .to_u32()
            .unwrap_or(u32::MAX)
            .max(1)
    }

    /// 壓力指數 = 每儲位平均行數 / 門檻
    pub fn pressure_index(&self, bin_count: u32, threshold: u32) -> Option<Decimal> {
        if bin_count == 0 || threshold == 0 {
            return None;
        }
        let per_bin = self.lines / Decimal::from(bin_count);
        Some((per_bin / Decimal::from(threshold)).round_dp(4))
    }
}
