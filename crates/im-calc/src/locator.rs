//! 候選目的儲位搜尋

use im_core::{PlanningConfig, ProductBatchKey};
use std::collections::BTreeMap;

use crate::catalog::BinCatalog;
use crate::state::InventoryState;

/// 候選目的儲位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBin {
    pub bin: String,
    pub zone: u32,
}

/// 候選儲位搜尋器
pub struct CandidateLocator;

impl CandidateLocator {
    /// 搜尋分散的目的儲位
    ///
    /// 候選 = (指派給該產品的儲位 − 已持有該批次的儲位 − 持有其他庫存的儲位〔獨佔時〕)
    ///       ∪ 該批次所在區域內的空儲位
    ///
    /// 結果依儲位代碼排序
    pub fn locate(
        key: &ProductBatchKey,
        state: &InventoryState,
        catalog: &BinCatalog,
        config: &PlanningConfig,
    ) -> Vec<CandidateBin> {
        let mut candidates: BTreeMap<String, u32> = BTreeMap::new();

        for bin in catalog.bins_for_product(&key.product_id) {
            if state.qty_in(bin, key) > rust_decimal::Decimal::ZERO {
                continue;
            }
            if config.enforce_bin_exclusivity && state.holds_other_stock(bin, key) {
                continue;
            }
            let Some(zone) = catalog.zone_of(bin).or_else(|| state.zone_of(bin)) else {
                continue;
            };
            candidates.insert(bin.clone(), zone);
        }

        for zone in state.zones_of(key) {
            for bin in state.empty_bins_in_zone(zone) {
                candidates.insert(bin.to_string(), zone);
            }
        }

        tracing::trace!("產品批次 {} 候選目的儲位 {} 個", key, candidates.len());

        candidates
            .into_iter()
            .map(|(bin, zone)| CandidateBin { bin, zone })
            .collect()
    }

    /// 由指定儲位（如級聯釋放的儲位）與一般搜尋結果合併
    pub fn merge(primary: Vec<CandidateBin>, extra: &[CandidateBin]) -> Vec<CandidateBin> {
        let mut merged: BTreeMap<String, u32> = primary
            .into_iter()
            .map(|candidate| (candidate.bin, candidate.zone))
            .collect();
        for candidate in extra {
            merged
                .entry(candidate.bin.clone())
                .or_insert(candidate.zone);
        }
        merged
            .into_iter()
            .map(|(bin, zone)| CandidateBin { bin, zone })
            .collect()
    }
}
