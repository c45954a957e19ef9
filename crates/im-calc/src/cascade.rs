//! 供體級聯
//!
//! 分散目標找不到目的儲位時，從同產品的兄弟批次整併出空儲位：
//! 第一輪找超額配置（儲位數 > 所需儲位數）的兄弟批次，整併到其所需儲位數；
//! 第二輪退而找持有多於一個儲位的兄弟批次，只釋放目標所需的儲位數。
//! 兄弟批次依分配優先級（可揀貨優先於僅儲備）再依輸入順序排序。

use im_core::{LotAvailability, MovementInstruction, MovementKind, PriorityClass, ProductBatchKey};
use std::collections::{HashMap, HashSet};

use crate::consolidation::Consolidation;
use crate::emitter::MovementEmitter;
use crate::locator::CandidateBin;
use crate::state::InventoryState;

/// 級聯結果
#[derive(Debug, Clone, Default)]
pub struct CascadeOutcome {
    pub movements: Vec<MovementInstruction>,

    /// 提供儲位的兄弟批次
    pub donor: Option<ProductBatchKey>,

    pub freed_bins: Vec<CandidateBin>,
}

impl CascadeOutcome {
    pub fn succeeded(&self) -> bool {
        !self.freed_bins.is_empty()
    }
}

/// 供體級聯
pub struct DonorCascade<'a> {
    /// 所有有需求的產品批次的所需儲位數
    required_zones: &'a HashMap<ProductBatchKey, u32>,

    /// (SKU, 批次) → 分配優先級
    priorities: &'a HashMap<(String, String), PriorityClass>,

    /// 不可作為供體的批次（本次規劃中的分散目標）
    protected: &'a HashSet<ProductBatchKey>,
}

impl<'a> DonorCascade<'a> {
    pub fn new(
        required_zones: &'a HashMap<ProductBatchKey, u32>,
        priorities: &'a HashMap<(String, String), PriorityClass>,
        protected: &'a HashSet<ProductBatchKey>,
    ) -> Self {
        Self {
            required_zones,
            priorities,
            protected,
        }
    }

    /// 由批號可用量建立優先級索引；同一批次有多筆時取最優先者
    pub fn priority_index(lots: &[LotAvailability]) -> HashMap<(String, String), PriorityClass> {
        let mut index: HashMap<(String, String), PriorityClass> = HashMap::new();
        for lot in lots {
            let key = (
                im_core::normalize_code(&lot.sku),
                im_core::normalize_code(&lot.batch),
            );
            index
                .entry(key)
                .and_modify(|p| *p = (*p).min(lot.priority_class))
                .or_insert(lot.priority_class);
        }
        index
    }

    /// 為目標批次釋放至少一個儲位
    pub fn run(
        &self,
        state: &mut InventoryState,
        emitter: &MovementEmitter,
        target: &ProductBatchKey,
        needed: u32,
    ) -> CascadeOutcome {
        let siblings = self.ranked_siblings(state, target);

        // 第一輪：超額配置的兄弟批次
        for sibling in &siblings {
            let Some(&required) = self.required_zones.get(sibling) else {
                continue;
            };
            if state.bin_count(sibling) <= required {
                continue;
            }
            let outcome = self.consolidate(state, emitter, sibling, required);
            if outcome.succeeded() {
                return outcome;
            }
        }

        // 第二輪：持有多於一個儲位的兄弟批次
        for sibling in &siblings {
            let bin_count = state.bin_count(sibling);
            if bin_count <= 1 {
                continue;
            }
            let keep = bin_count.saturating_sub(needed).max(1);
            let outcome = self.consolidate(state, emitter, sibling, keep);
            if outcome.succeeded() {
                return outcome;
            }
        }

        tracing::debug!("產品批次 {} 的級聯找不到可整併的兄弟批次", target);
        CascadeOutcome::default()
    }

    fn consolidate(
        &self,
        state: &mut InventoryState,
        emitter: &MovementEmitter,
        sibling: &ProductBatchKey,
        keep: u32,
    ) -> CascadeOutcome {
        // 在副本上試算，只有真正清空儲位時才套用
        let mut trial = state.clone();
        let outcome = Consolidation::run(&mut trial, emitter, sibling, keep, MovementKind::Cascade);
        if outcome.freed_bins.is_empty() {
            tracing::trace!("兄弟批次 {} 整併後沒有空出的儲位", sibling);
            return CascadeOutcome::default();
        }

        tracing::debug!(
            "級聯整併兄弟批次 {}，釋放 {} 個儲位",
            sibling,
            outcome.freed_bins.len()
        );
        *state = trial;
        CascadeOutcome {
            movements: outcome.movements,
            donor: Some(sibling.clone()),
            freed_bins: outcome.freed_bins,
        }
    }

    /// 兄弟批次：依優先級、再依輸入順序
    fn ranked_siblings(
        &self,
        state: &InventoryState,
        target: &ProductBatchKey,
    ) -> Vec<ProductBatchKey> {
        let mut siblings: Vec<_> = state
            .siblings_of(target)
            .into_iter()
            .filter(|sibling| !self.protected.contains(sibling))
            .collect();
        siblings.sort_by_key(|sibling| {
            (
                self.priority_of(state, sibling),
                state.input_order(sibling),
            )
        });
        siblings
    }

    fn priority_of(&self, state: &InventoryState, key: &ProductBatchKey) -> PriorityClass {
        let sku = state.sku_of(key).unwrap_or(&key.product_id).to_string();
        self.priorities
            .get(&(sku, key.batch.clone()))
            .copied()
            .unwrap_or_default()
    }
}
