//! 移動指令模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 移動類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    /// 整併：捐出儲位全數移入保留儲位
    Consolidation,
    /// 分散：由最大儲位拆出到新儲位
    Distribution,
    /// 級聯：為其他批次釋放儲位而整併的兄弟批次
    Cascade,
}

/// 移動指令（產出後不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementInstruction {
    pub source_bin: String,
    pub destination_bin: String,
    pub product_id: String,
    pub sku: String,
    pub batch: String,
    pub quality_grade: String,
    pub unit_of_measure: String,
    pub quantity: Decimal,
    pub kind: MovementKind,
}

impl MovementInstruction {
    pub fn is_consolidation(&self) -> bool {
        matches!(self.kind, MovementKind::Consolidation | MovementKind::Cascade)
    }

    pub fn is_distribution(&self) -> bool {
        self.kind == MovementKind::Distribution
    }
}
