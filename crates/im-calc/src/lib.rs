//! # IM Calculation Engine
//!
//! 庫內移動規劃引擎：分類、目的儲位搜尋、整併、分散、供體級聯與 FEFO 分配

pub mod builder;
pub mod cascade;
pub mod catalog;
pub mod classifier;
pub mod consolidation;
pub mod diagnostics;
pub mod distribution;
pub mod emitter;
pub mod fefo;
pub mod locator;
pub mod normalizer;
pub mod planner;
pub mod state;

// Re-export 主要類型
pub use builder::InventoryStateBuilder;
pub use catalog::BinCatalog;
pub use classifier::{Decision, DecisionClassifier};
pub use diagnostics::{DiagnosticsReport, DiagnosticsReporter, DiagnosticsSummary};
pub use fefo::{FefoAllocator, LotAllocation, LotPick};
pub use locator::{CandidateBin, CandidateLocator};
pub use normalizer::{DemandNormalizer, NormalizedDemand};
pub use planner::{DecisionPlan, MovementPlanner, PlanningSnapshot};
pub use state::InventoryState;

use im_core::{BinStock, DecisionRecord, MovementInstruction, MovementKind};

/// 規劃結果
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// 執行ID
    pub run_id: uuid::Uuid,

    /// 移動指令（依產出順序）
    pub movements: Vec<MovementInstruction>,

    /// 診斷報告
    pub diagnostics: DiagnosticsReport,

    /// FEFO 批號分配（有提供批號資料時）
    pub lot_allocations: Vec<LotAllocation>,

    /// 規劃後的執行期佔用狀態
    pub final_state: InventoryState,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl PlanResult {
    /// 創建空的規劃結果
    pub fn empty() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            movements: Vec::new(),
            diagnostics: DiagnosticsReport::default(),
            lot_allocations: Vec::new(),
            final_state: InventoryState::new(),
            calculation_time_ms: None,
        }
    }

    /// 決策記錄
    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.diagnostics.records
    }

    /// 依類型篩選移動
    pub fn movements_of_kind(&self, kind: MovementKind) -> impl Iterator<Item = &MovementInstruction> {
        self.movements.iter().filter(move |m| m.kind == kind)
    }

    /// 規劃後的儲位庫存，可作為下一次規劃的輸入
    pub fn final_bin_stock(&self) -> Vec<BinStock> {
        self.final_state.to_bin_stock()
    }
}
