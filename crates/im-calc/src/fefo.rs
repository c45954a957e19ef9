//! FEFO（先到期先出）批號分配

use chrono::NaiveDate;
use im_core::{normalize_code, LotAvailability, PriorityClass};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 單一批號的分配量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotPick {
    pub batch: String,
    pub quantity: Decimal,
    pub expiry_date: NaiveDate,
    pub priority_class: PriorityClass,
}

/// 單一 SKU 的分配結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotAllocation {
    pub sku: String,
    pub requested: Decimal,
    pub picks: Vec<LotPick>,

    /// 未滿足的剩餘需求（只回報，不延後補單也不重試）
    pub unsatisfied: Decimal,
}

impl LotAllocation {
    pub fn allocated(&self) -> Decimal {
        self.picks.iter().map(|p| p.quantity).sum()
    }

    pub fn is_satisfied(&self) -> bool {
        self.unsatisfied.is_zero()
    }
}

/// FEFO 分配器
pub struct FefoAllocator;

impl FefoAllocator {
    /// 依到期日遞增、再依優先級（可揀貨優先）消耗批號，直到滿足需求或批號耗盡
    ///
    /// 最後一個批號可部分消耗
    pub fn allocate(sku: &str, demand_qty: Decimal, lots: &[LotAvailability]) -> LotAllocation {
        let sku = normalize_code(sku);
        let mut candidates: Vec<&LotAvailability> = lots
            .iter()
            .filter(|lot| normalize_code(&lot.sku) == sku && lot.quantity > Decimal::ZERO)
            .collect();
        // 穩定排序：同到期日同優先級時保留輸入順序
        candidates.sort_by_key(|lot| (lot.expiry_date, lot.priority_class));

        let mut remaining = demand_qty.max(Decimal::ZERO);
        let mut picks = Vec::new();

        for lot in candidates {
            if remaining <= Decimal::ZERO {
                break;
            }
            let take = lot.quantity.min(remaining);
            picks.push(LotPick {
                batch: normalize_code(&lot.batch),
                quantity: take,
                expiry_date: lot.expiry_date,
                priority_class: lot.priority_class,
            });
            remaining -= take;
        }

        if remaining > Decimal::ZERO {
            tracing::debug!("SKU {} FEFO 分配不足，剩餘 {}", sku, remaining);
        }

        LotAllocation {
            sku,
            requested: demand_qty,
            picks,
            unsatisfied: remaining,
        }
    }

    /// 批次分配多個 SKU 的需求（各 SKU 互不相依，平行計算並保持輸入順序）
    pub fn allocate_all(
        demands: &[(String, Decimal)],
        lots: &[LotAvailability],
    ) -> Vec<LotAllocation> {
        let mut by_sku: HashMap<String, Vec<LotAvailability>> = HashMap::new();
        for lot in lots {
            by_sku
                .entry(normalize_code(&lot.sku))
                .or_default()
                .push(lot.clone());
        }

        demands
            .par_iter()
            .map(|(sku, qty)| {
                let sku_lots = by_sku
                    .get(&normalize_code(sku))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                Self::allocate(sku, *qty, sku_lots)
            })
            .collect()
    }
}
