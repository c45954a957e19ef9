//! 儲位主檔模型（靜態容量參考）

use serde::{Deserialize, Serialize};

/// 儲位主檔項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinMasterEntry {
    #[serde(alias = "Bin")]
    pub bin: String,

    #[serde(alias = "Zone")]
    pub zone: u32,

    /// 指派給該儲位的產品（None 表示不限產品）
    #[serde(default, alias = "Product")]
    pub product_affinity: Option<String>,

    /// 儲位類別
    #[serde(default, alias = "Bin Type")]
    pub bin_type: Option<String>,
}

impl BinMasterEntry {
    /// 創建儲位主檔項目
    pub fn new(bin: &str, zone: u32) -> Self {
        Self {
            bin: bin.to_string(),
            zone,
            product_affinity: None,
            bin_type: None,
        }
    }

    /// 建構器模式：設置產品指派
    pub fn with_product_affinity(mut self, product_id: &str) -> Self {
        self.product_affinity = Some(product_id.to_string());
        self
    }

    /// 建構器模式：設置儲位類別
    pub fn with_bin_type(mut self, bin_type: &str) -> Self {
        self.bin_type = Some(bin_type.to_string());
        self
    }
}
