//! 庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 原始儲位庫存列（外部匯入層提供，尚未驗證）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBinRow {
    /// 揀貨區（如 PTL）
    #[serde(default, alias = "Area")]
    pub area: Option<String>,

    /// 產品ID（缺省時以 SKU 代替）
    #[serde(default, alias = "Product")]
    pub product_id: Option<String>,

    #[serde(default, alias = "SKU")]
    pub sku: Option<String>,

    #[serde(default, alias = "Batch")]
    pub batch: Option<String>,

    #[serde(default, alias = "Bin")]
    pub bin: Option<String>,

    #[serde(default, alias = "Zone")]
    pub zone: Option<String>,

    #[serde(default, alias = "Qty")]
    pub qty: Option<String>,

    /// 儲位類別
    #[serde(default, alias = "Bin Type")]
    pub bin_type: Option<String>,
}

impl RawBinRow {
    /// 創建原始列
    pub fn new(sku: &str, batch: &str, bin: &str, zone: u32, qty: impl ToString) -> Self {
        Self {
            area: Some("PTL".to_string()),
            product_id: None,
            sku: Some(sku.to_string()),
            batch: Some(batch.to_string()),
            bin: Some(bin.to_string()),
            zone: Some(zone.to_string()),
            qty: Some(qty.to_string()),
            bin_type: None,
        }
    }

    /// 建構器模式：設置產品ID
    pub fn with_product_id(mut self, product_id: &str) -> Self {
        self.product_id = Some(product_id.to_string());
        self
    }

    /// 建構器模式：設置揀貨區
    pub fn with_area(mut self, area: Option<&str>) -> Self {
        self.area = area.map(str::to_string);
        self
    }

    /// 建構器模式：設置儲位類別
    pub fn with_bin_type(mut self, bin_type: &str) -> Self {
        self.bin_type = Some(bin_type.to_string());
        self
    }
}

impl From<&BinStock> for RawBinRow {
    fn from(stock: &BinStock) -> Self {
        Self {
            area: stock.area.clone(),
            product_id: Some(stock.product_id.clone()),
            sku: Some(stock.sku.clone()),
            batch: Some(stock.batch.clone()),
            bin: Some(stock.bin.clone()),
            zone: Some(stock.zone.to_string()),
            qty: Some(stock.qty.to_string()),
            bin_type: stock.bin_type.clone(),
        }
    }
}

/// 儲位庫存（已驗證、已標準化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinStock {
    pub product_id: String,
    pub sku: String,
    pub batch: String,
    pub bin: String,
    pub zone: u32,
    pub qty: Decimal,
    pub area: Option<String>,
    pub bin_type: Option<String>,
}

impl BinStock {
    /// 該列所屬的產品批次鍵
    pub fn key(&self) -> ProductBatchKey {
        ProductBatchKey::new(&self.product_id, &self.batch)
    }
}

/// 產品批次複合鍵
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductBatchKey {
    pub product_id: String,
    pub batch: String,
}

impl ProductBatchKey {
    pub fn new(product_id: &str, batch: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            batch: batch.to_string(),
        }
    }
}

impl fmt::Display for ProductBatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.batch)
    }
}

/// 產品批次彙總（由儲位庫存衍生）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBatchSummary {
    pub product_id: String,
    pub batch: String,

    /// 持有數量 > 0 的不同儲位數
    pub bin_count: u32,

    pub total_qty: Decimal,
}

impl ProductBatchSummary {
    pub fn key(&self) -> ProductBatchKey {
        ProductBatchKey::new(&self.product_id, &self.batch)
    }
}
