//! 規劃配置模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{normalize_code, ImError};

/// 可管理的區域範圍（含頭尾）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRange {
    pub start: u32,
    pub end: u32,
}

impl ZoneRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// 檢查區域是否在範圍內
    pub fn contains(&self, zone: u32) -> bool {
        zone >= self.start && zone <= self.end
    }
}

impl Default for ZoneRange {
    fn default() -> Self {
        Self { start: 1, end: 8 }
    }
}

/// 移動規劃參數配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// 單一儲位每個規劃週期可吸收的揀貨行數
    pub lines_per_bin_threshold: u32,

    /// 僅評估需求壓力最高的前 N 筆
    pub top_n_demand_lines: usize,

    /// 引擎可操作的實體區域
    pub managed_zone_range: ZoneRange,

    /// 永不作為來源或目的的儲位類別
    pub excluded_bin_types: BTreeSet<String>,

    /// 受管揀貨區（None 表示不過濾）
    pub managed_area: Option<String>,

    /// 目的儲位是否必須不含其他庫存
    pub enforce_bin_exclusivity: bool,

    /// 是否啟用供體級聯（釋放兄弟批次的儲位）
    pub enable_donor_cascade: bool,

    /// 移動指令上的品質等級
    pub quality_grade: String,

    /// 移動指令上的計量單位
    pub unit_of_measure: String,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            lines_per_bin_threshold: 55,
            top_n_demand_lines: 30,
            managed_zone_range: ZoneRange::default(),
            excluded_bin_types: BTreeSet::new(),
            managed_area: Some("PTL".to_string()),
            enforce_bin_exclusivity: true,
            enable_donor_cascade: true,
            quality_grade: "Good".to_string(),
            unit_of_measure: "L0".to_string(),
        }
    }
}

impl PlanningConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 字串載入配置（未提供的欄位使用預設值）
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ImError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置每儲位揀貨行數門檻
    pub fn with_lines_per_bin_threshold(mut self, threshold: u32) -> Self {
        self.lines_per_bin_threshold = threshold;
        self
    }

    /// 建構器模式：設置評估筆數
    pub fn with_top_n_demand_lines(mut self, top_n: usize) -> Self {
        self.top_n_demand_lines = top_n;
        self
    }

    /// 建構器模式：設置區域範圍
    pub fn with_managed_zone_range(mut self, start: u32, end: u32) -> Self {
        self.managed_zone_range = ZoneRange::new(start, end);
        self
    }

    /// 建構器模式：排除儲位類別
    pub fn with_excluded_bin_type(mut self, bin_type: &str) -> Self {
        self.excluded_bin_types.insert(normalize_code(bin_type));
        self
    }

    /// 建構器模式：設置受管揀貨區
    pub fn with_managed_area(mut self, area: Option<String>) -> Self {
        self.managed_area = area;
        self
    }

    /// 建構器模式：設置目的儲位獨佔
    pub fn with_bin_exclusivity(mut self, enforce: bool) -> Self {
        self.enforce_bin_exclusivity = enforce;
        self
    }

    /// 建構器模式：設置供體級聯
    pub fn with_donor_cascade(mut self, enable: bool) -> Self {
        self.enable_donor_cascade = enable;
        self
    }

    /// 驗證配置
    pub fn validate(&self) -> crate::Result<()> {
        if self.lines_per_bin_threshold == 0 {
            return Err(ImError::InvalidConfig(
                "lines_per_bin_threshold 必須大於 0".to_string(),
            ));
        }
        if self.top_n_demand_lines == 0 {
            return Err(ImError::InvalidConfig(
                "top_n_demand_lines 必須大於 0".to_string(),
            ));
        }
        if self.managed_zone_range.start > self.managed_zone_range.end {
            return Err(ImError::InvalidConfig(format!(
                "區域範圍無效: {}..={}",
                self.managed_zone_range.start, self.managed_zone_range.end
            )));
        }
        Ok(())
    }

    /// 檢查儲位類別是否被排除（不分大小寫）
    pub fn is_excluded_bin_type(&self, bin_type: Option<&str>) -> bool {
        match bin_type {
            Some(t) => {
                let label = normalize_code(t);
                self.excluded_bin_types
                    .iter()
                    .any(|excluded| normalize_code(excluded) == label)
            }
            None => false,
        }
    }

    /// 檢查揀貨區是否受管
    pub fn is_managed_area(&self, area: Option<&str>) -> bool {
        match (&self.managed_area, area) {
            (None, _) => true,
            (Some(managed), Some(a)) => normalize_code(a) == normalize_code(managed),
            (Some(_), None) => false,
        }
    }
}
