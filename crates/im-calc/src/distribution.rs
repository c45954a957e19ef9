//! 分散：把產品批次的庫存拆到更多儲位

use im_core::{MovementInstruction, MovementKind, ProductBatchKey};
use rust_decimal::Decimal;

use crate::emitter::MovementEmitter;
use crate::locator::CandidateBin;
use crate::state::InventoryState;

/// 分散結果
#[derive(Debug, Clone, Default)]
pub struct DistributionOutcome {
    pub movements: Vec<MovementInstruction>,
    pub source_bin: Option<String>,

    /// 需要的新儲位數
    pub requested: u32,

    /// 實際分配的新儲位數
    pub fulfilled: u32,
}

impl DistributionOutcome {
    pub fn is_partial(&self) -> bool {
        self.fulfilled < self.requested
    }
}

/// 分散計算器
pub struct Distribution;

impl Distribution {
    /// 由目前數量最大的儲位拆出到 `needed` 個候選儲位
    ///
    /// 每個目的儲位分得 max(1, floor(來源數量 / needed))，餘數留在來源儲位；
    /// 候選不足時只完成部分分散。
    ///
    /// 第一筆移動不可搬空來源（那只是換儲位，儲位數不變），此時保留 1 個單位在來源。
    /// `fulfilled` 是實際增加的儲位數。
    pub fn run(
        state: &mut InventoryState,
        emitter: &MovementEmitter,
        key: &ProductBatchKey,
        needed: u32,
        candidates: &[CandidateBin],
    ) -> DistributionOutcome {
        let mut outcome = DistributionOutcome {
            requested: needed,
            ..Default::default()
        };
        if needed == 0 {
            return outcome;
        }

        let Some((source, source_qty)) = Self::source_bin(state, key) else {
            return outcome;
        };
        outcome.source_bin = Some(source.clone());

        let per_destination = Self::per_destination_qty(source_qty, needed);
        let bins_before = state.bin_count(key);

        for candidate in candidates {
            if outcome.movements.len() >= needed as usize {
                break;
            }
            if candidate.bin == source || state.qty_in(&candidate.bin, key) > Decimal::ZERO {
                continue;
            }

            let available = state.qty_in(&source, key);
            let mut qty = per_destination.min(available);
            if qty >= available && outcome.movements.is_empty() {
                qty = available - Decimal::ONE;
            }
            if qty <= Decimal::ZERO {
                tracing::debug!("產品批次 {} 來源 {} 數量 {} 不足以拆分", key, source, available);
                break;
            }

            match emitter.emit(
                state,
                key,
                &source,
                candidate,
                qty,
                MovementKind::Distribution,
            ) {
                Some(movement) => {
                    tracing::debug!(
                        "分散 {}: {} → {} 數量 {}",
                        key,
                        source,
                        candidate.bin,
                        movement.quantity
                    );
                    outcome.movements.push(movement);
                }
                // 來源已耗盡
                None => break,
            }
        }

        outcome.fulfilled = state.bin_count(key).saturating_sub(bins_before);
        outcome
    }

    /// max(1, floor(來源數量 / needed))
    pub fn per_destination_qty(source_qty: Decimal, needed: u32) -> Decimal {
        if needed == 0 {
            return Decimal::ZERO;
        }
        (source_qty / Decimal::from(needed))
            .floor()
            .max(Decimal::ONE)
    }

    /// 數量最大的儲位；同量時取儲位代碼最小者
    fn source_bin(state: &InventoryState, key: &ProductBatchKey) -> Option<(String, Decimal)> {
        state
            .bins_of(key)
            .into_iter()
            .fold(None, |best: Option<(String, Decimal)>, (bin, qty)| match best {
                Some((_, best_qty)) if qty <= best_qty => best,
                _ => Some((bin, qty)),
            })
    }
}
