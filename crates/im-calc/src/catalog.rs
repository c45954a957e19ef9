//! 儲位容量參考（靜態儲位主檔）

use im_core::{normalize_code, BinMasterEntry, PlanningConfig};
use std::collections::{BTreeMap, HashMap};

/// 儲位目錄：儲位 → 區域、產品指派
#[derive(Debug, Clone, Default)]
pub struct BinCatalog {
    bins: BTreeMap<String, BinMasterEntry>,
    by_product: HashMap<String, Vec<String>>,
}

impl BinCatalog {
    /// 建立儲位目錄，受管區域外或被排除類別的儲位不納入
    pub fn new(entries: &[BinMasterEntry], config: &PlanningConfig) -> Self {
        let mut catalog = Self::default();

        for entry in entries {
            if !config.managed_zone_range.contains(entry.zone)
                || config.is_excluded_bin_type(entry.bin_type.as_deref())
            {
                continue;
            }

            let bin = normalize_code(&entry.bin);
            let affinity = entry
                .product_affinity
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(normalize_code);

            if catalog.bins.contains_key(&bin) {
                tracing::debug!("儲位主檔重複項目 {}，保留第一筆", bin);
                continue;
            }

            if let Some(product) = &affinity {
                catalog
                    .by_product
                    .entry(product.clone())
                    .or_default()
                    .push(bin.clone());
            }

            catalog.bins.insert(
                bin.clone(),
                BinMasterEntry {
                    bin,
                    zone: entry.zone,
                    product_affinity: affinity,
                    bin_type: entry.bin_type.as_deref().map(normalize_code),
                },
            );
        }

        for bins in catalog.by_product.values_mut() {
            bins.sort();
        }

        catalog
    }

    /// 空目錄（只依現場快照中的空儲位找目的地）
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn zone_of(&self, bin: &str) -> Option<u32> {
        self.bins.get(bin).map(|entry| entry.zone)
    }

    /// 指派給某產品的儲位（依儲位代碼排序）
    pub fn bins_for_product(&self, product_id: &str) -> &[String] {
        self.by_product
            .get(product_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, bin: &str) -> bool {
        self.bins.contains_key(bin)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
