//! 移動規劃主流程
//!
//! 兩個純函式組成一次規劃：`plan_decisions`（分析）與 `build_movements`（產生），
//! 由 `run` 串接並負責執行期生命週期。

use im_core::{
    Action, DecisionRecord, FailureReason, LotAvailability, MovementInstruction, MovementKind,
    PlanningConfig, ProductBatchKey, RawBinRow, RawDemandRow,
};
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::builder::InventoryStateBuilder;
use crate::cascade::DonorCascade;
use crate::catalog::BinCatalog;
use crate::classifier::{Decision, DecisionClassifier};
use crate::consolidation::Consolidation;
use crate::diagnostics::DiagnosticsReporter;
use crate::distribution::Distribution;
use crate::emitter::MovementEmitter;
use crate::fefo::FefoAllocator;
use crate::locator::{CandidateBin, CandidateLocator};
use crate::normalizer::{DemandNormalizer, NormalizedDemand};
use crate::state::InventoryState;
use crate::PlanResult;

/// 單次規劃的不可變輸入快照
#[derive(Debug, Clone)]
pub struct PlanningSnapshot {
    pub inventory: InventoryState,
    pub demand: NormalizedDemand,
    pub lots: Vec<LotAvailability>,
}

impl PlanningSnapshot {
    /// 由原始資料建立快照；資料錯誤時中止
    pub fn build(
        bin_rows: &[RawBinRow],
        demand_rows: &[RawDemandRow],
        lots: Vec<LotAvailability>,
        config: &PlanningConfig,
    ) -> im_core::Result<Self> {
        config.validate()?;
        let inventory = InventoryStateBuilder::build(bin_rows, config)?;
        let demand = DemandNormalizer::normalize(demand_rows, config)?;
        Ok(Self {
            inventory,
            demand,
            lots,
        })
    }
}

/// 分析結果
#[derive(Debug, Clone, Default)]
pub struct DecisionPlan {
    /// 依需求壓力排序的決策
    pub decisions: Vec<Decision>,
}

impl DecisionPlan {
    /// 本次規劃中的分散目標
    pub fn distribute_targets(&self) -> HashSet<ProductBatchKey> {
        self.decisions
            .iter()
            .filter(|d| d.action == Action::Distribute)
            .map(|d| d.key.clone())
            .collect()
    }
}

/// 移動規劃器
pub struct MovementPlanner {
    config: PlanningConfig,
    catalog: BinCatalog,
}

impl MovementPlanner {
    /// 創建新的移動規劃器
    pub fn new(config: PlanningConfig, catalog: BinCatalog) -> Self {
        Self { config, catalog }
    }

    /// 主規劃入口
    pub fn run(
        &self,
        bin_rows: &[RawBinRow],
        demand_rows: &[RawDemandRow],
        lots: Vec<LotAvailability>,
    ) -> im_core::Result<PlanResult> {
        tracing::info!(
            "開始移動規劃：庫存 {} 列，需求 {} 列，批號 {} 筆，儲位主檔 {} 筆",
            bin_rows.len(),
            demand_rows.len(),
            lots.len(),
            self.catalog.len()
        );

        let snapshot = PlanningSnapshot::build(bin_rows, demand_rows, lots, &self.config)?;
        self.run_snapshot(&snapshot)
    }

    /// 由已建立的快照規劃
    pub fn run_snapshot(&self, snapshot: &PlanningSnapshot) -> im_core::Result<PlanResult> {
        let plan = self.plan_decisions(snapshot)?;
        Ok(self.build_movements(&plan, snapshot))
    }

    /// Step 1: 分類前 N 筆需求
    pub fn plan_decisions(&self, snapshot: &PlanningSnapshot) -> im_core::Result<DecisionPlan> {
        self.config.validate()?;

        let decisions =
            DecisionClassifier::classify(&snapshot.demand.ranked, &snapshot.inventory, &self.config);

        let (consolidate, distribute, no_action) = DecisionClassifier::classify_counts(&decisions);
        tracing::debug!(
            "決策分類：整併 {}，分散 {}，不動作 {}，無庫存略過 {}",
            consolidate,
            distribute,
            no_action,
            snapshot.demand.ranked.len() - decisions.len()
        );

        Ok(DecisionPlan { decisions })
    }

    /// Step 2: 依決策順序產生移動，套用在執行期私有副本上
    pub fn build_movements(&self, plan: &DecisionPlan, snapshot: &PlanningSnapshot) -> PlanResult {
        let start_time = std::time::Instant::now();

        let mut state = snapshot.inventory.clone();
        let emitter = MovementEmitter::new(&self.config);
        let required_zones = snapshot.demand.required_zones_index();
        let priorities = DonorCascade::priority_index(&snapshot.lots);
        let protected = plan.distribute_targets();
        let cascade = DonorCascade::new(&required_zones, &priorities, &protected);

        let mut reporter = DiagnosticsReporter::new();
        let mut movements: Vec<MovementInstruction> = Vec::new();

        for decision in &plan.decisions {
            let mut record = DecisionRecord::new(
                &decision.key,
                &decision.sku,
                decision.action,
                decision.current_bins,
                decision.required_zones,
            );
            record.pressure_index = decision.pressure_index;

            let emitted = match decision.action {
                Action::NoAction => Vec::new(),
                Action::Consolidate => {
                    Consolidation::run(
                        &mut state,
                        &emitter,
                        &decision.key,
                        decision.required_zones,
                        MovementKind::Consolidation,
                    )
                    .movements
                }
                Action::Distribute => {
                    self.distribute(&mut state, &emitter, &cascade, decision, &mut record)
                }
            };

            record.moves_emitted = emitted.len();
            movements.extend(emitted);
            reporter.record(record);
        }

        let lot_allocations = Self::allocate_lots(&snapshot.demand, &snapshot.lots);
        let diagnostics = reporter.finish();

        tracing::info!(
            "移動規劃完成，耗時 {:?}：移動 {} 筆，評估 {} 筆，需人工介入 {} 筆",
            start_time.elapsed(),
            movements.len(),
            diagnostics.summary.evaluated,
            diagnostics.summary.manual_intervention
        );

        let mut result = PlanResult::empty();
        result.movements = movements;
        result.diagnostics = diagnostics;
        result.lot_allocations = lot_allocations;
        result.final_state = state;
        result.calculation_time_ms = Some(start_time.elapsed().as_millis());
        result
    }

    /// 分散單一產品批次；找不到目的儲位時觸發級聯
    fn distribute(
        &self,
        state: &mut InventoryState,
        emitter: &MovementEmitter,
        cascade: &DonorCascade<'_>,
        decision: &Decision,
        record: &mut DecisionRecord,
    ) -> Vec<MovementInstruction> {
        let key = &decision.key;
        let live_bins = state.bin_count(key);
        if live_bins >= decision.required_zones {
            return Vec::new();
        }
        let needed = decision.required_zones - live_bins;
        let mut movements = Vec::new();

        let mut candidates = CandidateLocator::locate(key, state, &self.catalog, &self.config);

        if candidates.is_empty() {
            if !self.config.enable_donor_cascade {
                record.error_reason = Some(FailureReason::NoDestinationAvailable);
                return movements;
            }

            let outcome = cascade.run(state, emitter, key, needed);
            if !outcome.succeeded() {
                record.error_reason = Some(FailureReason::NoConsolidationCandidate);
                return movements;
            }

            let freed: Vec<CandidateBin> = outcome
                .freed_bins
                .into_iter()
                .filter(|freed| {
                    !(self.config.enforce_bin_exclusivity
                        && state.holds_other_stock(&freed.bin, key))
                })
                .collect();
            candidates = CandidateLocator::merge(
                CandidateLocator::locate(key, state, &self.catalog, &self.config),
                &freed,
            );
            record.donor_batch = outcome.donor.map(|donor| donor.batch);
            movements.extend(outcome.movements);

            if candidates.is_empty() {
                record.error_reason = Some(FailureReason::NoConsolidationCandidate);
                return movements;
            }
        }

        let outcome = Distribution::run(state, emitter, key, needed, &candidates);
        if outcome.is_partial() {
            record.error_reason = Some(FailureReason::PartialFulfillment {
                requested: outcome.requested,
                fulfilled: outcome.fulfilled,
            });
        }
        movements.extend(outcome.movements);
        movements
    }

    /// 依前 N 筆需求的 SKU 數量做 FEFO 分配（未提供批號資料時略過）
    fn allocate_lots(
        demand: &NormalizedDemand,
        lots: &[LotAvailability],
    ) -> Vec<crate::fefo::LotAllocation> {
        if lots.is_empty() {
            return Vec::new();
        }

        let mut per_sku: Vec<(String, Decimal)> = Vec::new();
        for line in &demand.ranked {
            match per_sku.iter_mut().find(|(sku, _)| *sku == line.sku) {
                Some((_, qty)) => *qty += line.quantity,
                None => per_sku.push((line.sku.clone(), line.quantity)),
            }
        }

        FefoAllocator::allocate_all(&per_sku, lots)
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    pub fn catalog(&self) -> &BinCatalog {
        &self.catalog
    }
}
