//! 整併：把產品批次的庫存合併到較少的儲位

use im_core::{MovementInstruction, MovementKind, ProductBatchKey};
use rust_decimal::Decimal;

use crate::emitter::MovementEmitter;
use crate::locator::CandidateBin;
use crate::state::InventoryState;

/// 整併結果
#[derive(Debug, Clone, Default)]
pub struct ConsolidationOutcome {
    pub movements: Vec<MovementInstruction>,

    /// 保留儲位（數量最大者）
    pub target_bin: Option<String>,

    /// 被完全清空、可在本次執行中再利用的儲位
    pub freed_bins: Vec<CandidateBin>,
}

/// 整併計算器
pub struct Consolidation;

impl Consolidation {
    /// 整併到剩下 `keep` 個儲位（`keep` <= 1 時清空其他所有儲位）
    ///
    /// 儲位依數量遞增排序（同量時儲位代碼小者優先），保留數量最大的儲位為目標，
    /// 從最小的開始把整個儲位的數量移入目標。整併永遠是整儲位移動，不做部分轉移。
    pub fn run(
        state: &mut InventoryState,
        emitter: &MovementEmitter,
        key: &ProductBatchKey,
        keep: u32,
        kind: MovementKind,
    ) -> ConsolidationOutcome {
        let keep = keep.max(1) as usize;
        let mut bins = state.bins_of(key);
        if bins.len() <= keep {
            return ConsolidationOutcome::default();
        }

        // bins_of 已依儲位代碼排序，穩定排序保留同量時的代碼順序
        bins.sort_by(|a, b| a.1.cmp(&b.1));

        let Some((target, _)) = Self::largest_bin(&bins) else {
            return ConsolidationOutcome::default();
        };
        let Some(target_zone) = state.zone_of(&target) else {
            return ConsolidationOutcome::default();
        };
        let destination = CandidateBin {
            bin: target.clone(),
            zone: target_zone,
        };

        let mut outcome = ConsolidationOutcome {
            target_bin: Some(target.clone()),
            ..Default::default()
        };
        let mut remaining = bins.len();

        for (donor, qty) in bins.iter().filter(|(bin, _)| *bin != target) {
            if remaining <= keep {
                break;
            }
            let donor_zone = state.zone_of(donor).unwrap_or(target_zone);

            if let Some(movement) = emitter.emit(state, key, donor, &destination, *qty, kind) {
                tracing::debug!(
                    "整併 {}: {} → {} 數量 {}",
                    key,
                    donor,
                    target,
                    movement.quantity
                );
                outcome.movements.push(movement);
                // 儲位仍有其他庫存時不算釋放
                if state.is_empty_bin(donor) {
                    outcome.freed_bins.push(CandidateBin {
                        bin: donor.clone(),
                        zone: donor_zone,
                    });
                }
                remaining -= 1;
            }
        }

        outcome
    }

    /// 數量最大的儲位；同量時取儲位代碼最小者
    fn largest_bin(bins: &[(String, Decimal)]) -> Option<(String, Decimal)> {
        let mut best: Option<&(String, Decimal)> = None;
        for entry in bins {
            match best {
                Some((bin, qty)) if entry.1 < *qty || (entry.1 == *qty && entry.0 > *bin) => {}
                _ => best = Some(entry),
            }
        }
        best.cloned()
    }
}
