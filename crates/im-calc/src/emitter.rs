//! 移動指令產出

use im_core::{MovementInstruction, MovementKind, PlanningConfig, ProductBatchKey};
use rust_decimal::Decimal;

use crate::locator::CandidateBin;
use crate::state::InventoryState;

/// 產出移動指令，並同步套用到執行期狀態
#[derive(Debug, Clone)]
pub struct MovementEmitter {
    quality_grade: String,
    unit_of_measure: String,
}

impl MovementEmitter {
    pub fn new(config: &PlanningConfig) -> Self {
        Self {
            quality_grade: config.quality_grade.clone(),
            unit_of_measure: config.unit_of_measure.clone(),
        }
    }

    /// 產出一筆移動
    ///
    /// 數量以來源現有數量為上限；數量 <= 0 時靜默略過
    pub fn emit(
        &self,
        state: &mut InventoryState,
        key: &ProductBatchKey,
        source: &str,
        destination: &CandidateBin,
        qty: Decimal,
        kind: MovementKind,
    ) -> Option<MovementInstruction> {
        if qty <= Decimal::ZERO {
            tracing::trace!("略過數量為 {} 的移動 {} → {}", qty, source, destination.bin);
            return None;
        }

        let moved = state.apply_move(source, &destination.bin, destination.zone, key, qty);
        if moved <= Decimal::ZERO {
            return None;
        }

        let sku = state.sku_of(key).unwrap_or(&key.product_id).to_string();
        Some(MovementInstruction {
            source_bin: source.to_string(),
            destination_bin: destination.bin.clone(),
            product_id: key.product_id.clone(),
            sku,
            batch: key.batch.clone(),
            quality_grade: self.quality_grade.clone(),
            unit_of_measure: self.unit_of_measure.clone(),
            quantity: moved,
            kind,
        })
    }
}
