//! 執行期儲位佔用狀態
//!
//! 每次規劃從快照建立一份私有副本；整併產生的數量變化直接套用在此副本上，
//! 使後續的分散與級聯步驟看見整併後的狀態（被釋放的儲位即為空儲位）。

use im_core::{BinStock, ProductBatchKey, ProductBatchSummary};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 單一儲位
#[derive(Debug, Clone, Default)]
pub struct BinSlot {
    pub zone: u32,
    pub bin_type: Option<String>,
    holdings: BTreeMap<ProductBatchKey, Decimal>,
}

impl BinSlot {
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// 儲位內的所有持有（數量 > 0）
    pub fn holdings(&self) -> impl Iterator<Item = (&ProductBatchKey, &Decimal)> {
        self.holdings.iter()
    }
}

/// 執行期庫存狀態（以儲位代碼排序，確保決定性）
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    bins: BTreeMap<String, BinSlot>,
    batch_bins: HashMap<ProductBatchKey, BTreeSet<String>>,
    skus: HashMap<ProductBatchKey, String>,
    first_seen: HashMap<ProductBatchKey, usize>,
    area: Option<String>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置輸出時標註的揀貨區
    pub fn with_area(mut self, area: Option<String>) -> Self {
        self.area = area;
        self
    }

    /// 登記儲位（已存在時保留原資料）
    pub fn ensure_bin(&mut self, bin: &str, zone: u32, bin_type: Option<String>) {
        self.bins.entry(bin.to_string()).or_insert_with(|| BinSlot {
            zone,
            bin_type,
            holdings: BTreeMap::new(),
        });
    }

    /// 登記產品批次（不含數量），保留第一次出現的順序
    pub fn register_batch(&mut self, key: &ProductBatchKey, sku: &str) {
        let next = self.first_seen.len();
        self.first_seen.entry(key.clone()).or_insert(next);
        self.skus
            .entry(key.clone())
            .or_insert_with(|| sku.to_string());
    }

    /// 累加持有數量；數量 <= 0 不會成為持有
    pub fn add_holding(&mut self, bin: &str, key: &ProductBatchKey, qty: Decimal) {
        if qty <= Decimal::ZERO {
            return;
        }
        let Some(slot) = self.bins.get_mut(bin) else {
            return;
        };
        *slot.holdings.entry(key.clone()).or_insert(Decimal::ZERO) += qty;
        self.batch_bins
            .entry(key.clone())
            .or_default()
            .insert(bin.to_string());
    }

    /// 由來源儲位移出、移入目的儲位，回傳實際移動數量
    ///
    /// 移動量以來源現有數量為上限
    pub fn apply_move(
        &mut self,
        source: &str,
        destination: &str,
        destination_zone: u32,
        key: &ProductBatchKey,
        qty: Decimal,
    ) -> Decimal {
        let available = self.qty_in(source, key);
        let moved = qty.min(available);
        if moved <= Decimal::ZERO || source == destination {
            return Decimal::ZERO;
        }

        if let Some(slot) = self.bins.get_mut(source) {
            let remaining = available - moved;
            if remaining > Decimal::ZERO {
                slot.holdings.insert(key.clone(), remaining);
            } else {
                slot.holdings.remove(key);
                if let Some(bins) = self.batch_bins.get_mut(key) {
                    bins.remove(source);
                }
            }
        }

        self.ensure_bin(destination, destination_zone, None);
        self.add_holding(destination, key, moved);
        moved
    }

    /// 某儲位內某產品批次的數量
    pub fn qty_in(&self, bin: &str, key: &ProductBatchKey) -> Decimal {
        self.bins
            .get(bin)
            .and_then(|slot| slot.holdings.get(key))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 產品批次目前佔用的儲位數
    pub fn bin_count(&self, key: &ProductBatchKey) -> u32 {
        self.batch_bins.get(key).map(|b| b.len() as u32).unwrap_or(0)
    }

    /// 產品批次的佔用儲位與數量（依儲位代碼排序）
    pub fn bins_of(&self, key: &ProductBatchKey) -> Vec<(String, Decimal)> {
        self.batch_bins
            .get(key)
            .map(|bins| {
                bins.iter()
                    .map(|bin| (bin.clone(), self.qty_in(bin, key)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 產品批次所在的區域
    pub fn zones_of(&self, key: &ProductBatchKey) -> BTreeSet<u32> {
        self.batch_bins
            .get(key)
            .map(|bins| bins.iter().filter_map(|b| self.zone_of(b)).collect())
            .unwrap_or_default()
    }

    /// 產品批次彙總
    pub fn summary(&self, key: &ProductBatchKey) -> Option<ProductBatchSummary> {
        let bins = self.bins_of(key);
        if bins.is_empty() {
            return None;
        }
        Some(ProductBatchSummary {
            product_id: key.product_id.clone(),
            batch: key.batch.clone(),
            bin_count: bins.len() as u32,
            total_qty: bins.iter().map(|(_, qty)| *qty).sum(),
        })
    }

    /// 所有有庫存的產品批次彙總（依輸入順序）
    pub fn summaries(&self) -> Vec<ProductBatchSummary> {
        self.batches_in_input_order()
            .iter()
            .filter_map(|key| self.summary(key))
            .collect()
    }

    /// 依輸入順序列出產品批次
    pub fn batches_in_input_order(&self) -> Vec<ProductBatchKey> {
        let mut keys: Vec<_> = self.first_seen.iter().collect();
        keys.sort_by_key(|(_, order)| **order);
        keys.into_iter().map(|(key, _)| key.clone()).collect()
    }

    /// 同產品、不同批次且仍有庫存的兄弟批次（依輸入順序）
    pub fn siblings_of(&self, key: &ProductBatchKey) -> Vec<ProductBatchKey> {
        self.batches_in_input_order()
            .into_iter()
            .filter(|k| k.product_id == key.product_id && k.batch != key.batch)
            .filter(|k| self.bin_count(k) > 0)
            .collect()
    }

    /// 輸入順序索引
    pub fn input_order(&self, key: &ProductBatchKey) -> usize {
        self.first_seen.get(key).copied().unwrap_or(usize::MAX)
    }

    pub fn sku_of(&self, key: &ProductBatchKey) -> Option<&str> {
        self.skus.get(key).map(String::as_str)
    }

    pub fn zone_of(&self, bin: &str) -> Option<u32> {
        self.bins.get(bin).map(|slot| slot.zone)
    }

    pub fn contains_bin(&self, bin: &str) -> bool {
        self.bins.contains_key(bin)
    }

    /// 已知且無任何持有的儲位
    pub fn is_empty_bin(&self, bin: &str) -> bool {
        self.bins.get(bin).map(BinSlot::is_empty).unwrap_or(false)
    }

    /// 儲位是否持有其他產品批次的庫存
    pub fn holds_other_stock(&self, bin: &str, key: &ProductBatchKey) -> bool {
        self.bins
            .get(bin)
            .map(|slot| slot.holdings.keys().any(|k| k != key))
            .unwrap_or(false)
    }

    /// 某區域內的空儲位（依儲位代碼排序）
    pub fn empty_bins_in_zone(&self, zone: u32) -> impl Iterator<Item = &str> {
        self.bins
            .iter()
            .filter(move |(_, slot)| slot.zone == zone && slot.is_empty())
            .map(|(bin, _)| bin.as_str())
    }

    pub fn bin(&self, bin: &str) -> Option<&BinSlot> {
        self.bins.get(bin)
    }

    pub fn bin_total(&self) -> usize {
        self.bins.len()
    }

    /// 匯出為儲位庫存列；空儲位以數量 0 輸出，可作為下一次規劃的快照
    pub fn to_bin_stock(&self) -> Vec<BinStock> {
        let mut rows = Vec::new();
        for (bin, slot) in &self.bins {
            if slot.holdings.is_empty() {
                // 空儲位仍需保留以供下次規劃辨識
                rows.push(BinStock {
                    product_id: String::new(),
                    sku: String::new(),
                    batch: String::new(),
                    bin: bin.clone(),
                    zone: slot.zone,
                    qty: Decimal::ZERO,
                    area: self.area.clone(),
                    bin_type: slot.bin_type.clone(),
                });
                continue;
            }
            for (key, qty) in &slot.holdings {
                rows.push(BinStock {
                    product_id: key.product_id.clone(),
                    sku: self.sku_of(key).unwrap_or(&key.product_id).to_string(),
                    batch: key.batch.clone(),
                    bin: bin.clone(),
                    zone: slot.zone,
                    qty: *qty,
                    area: self.area.clone(),
                    bin_type: slot.bin_type.clone(),
                });
            }
        }
        rows
    }
}
