//! 決策分類

use im_core::{Action, DemandLine, PlanningConfig, ProductBatchKey};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::state::InventoryState;

/// 單一產品批次的分類結果
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub key: ProductBatchKey,
    pub sku: String,
    pub action: Action,
    pub current_bins: u32,
    pub required_zones: u32,
    pub pressure_index: Option<Decimal>,
}

/// 決策分類器
pub struct DecisionClassifier;

impl DecisionClassifier {
    /// 比較現有儲位數與所需儲位數
    pub fn action_for(current_bins: u32, required_zones: u32) -> Action {
        match current_bins.cmp(&required_zones) {
            std::cmp::Ordering::Greater => Action::Consolidate,
            std::cmp::Ordering::Less => Action::Distribute,
            std::cmp::Ordering::Equal => Action::NoAction,
        }
    }

    /// 分類需求清單；無現有庫存的需求略過
    ///
    /// 各筆互不相依，平行計算並保持輸入順序
    pub fn classify(
        demand: &[DemandLine],
        state: &InventoryState,
        config: &PlanningConfig,
    ) -> Vec<Decision> {
        demand
            .par_iter()
            .filter_map(|line| Self::classify_line(line, state, config))
            .collect()
    }

    /// 分類單筆需求
    pub fn classify_line(
        line: &DemandLine,
        state: &InventoryState,
        config: &PlanningConfig,
    ) -> Option<Decision> {
        let key = line.key();
        let current_bins = state.bin_count(&key);
        if current_bins == 0 {
            tracing::debug!("產品批次 {} 無現有庫存，略過", key);
            return None;
        }

        Some(Decision {
            sku: state.sku_of(&key).unwrap_or(&line.sku).to_string(),
            action: Self::action_for(current_bins, line.required_zones),
            current_bins,
            required_zones: line.required_zones,
            pressure_index: line.pressure_index(current_bins, config.lines_per_bin_threshold),
            key,
        })
    }

    /// 依動作統計筆數 (consolidate, distribute, no_action)
    pub fn classify_counts(decisions: &[Decision]) -> (usize, usize, usize) {
        decisions
            .iter()
            .fold((0, 0, 0), |(c, d, n), decision| match decision.action {
                Action::Consolidate => (c + 1, d, n),
                Action::Distribute => (c, d + 1, n),
                Action::NoAction => (c, d, n + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3, 1, Action::Consolidate)]
    #[case(1, 3, Action::Distribute)]
    #[case(2, 2, Action::NoAction)]
    #[case(5, 4, Action::Consolidate)]
    fn test_action_for(#[case] current: u32, #[case] required: u32, #[case] expected: Action) {
        assert_eq!(DecisionClassifier::action_for(current, required), expected);
    }

    fn line(sku: &str, lines: i64, order: usize) -> DemandLine {
        DemandLine::new(
            sku.to_string(),
            sku.to_string(),
            "B1".to_string(),
            Decimal::from(lines),
            Decimal::from(100),
            55,
        )
        .with_input_order(order)
    }

    #[test]
    fn test_classify_preserves_order_and_skips_missing() {
        let mut state = InventoryState::new();
        state.ensure_bin("A-01", 1, None);
        state.ensure_bin("A-02", 1, None);
        for sku in ["SKU-1", "SKU-2"] {
            let key = ProductBatchKey::new(sku, "B1");
            state.register_batch(&key, sku);
            state.add_holding("A-01", &key, Decimal::from(10));
        }
        state.add_holding("A-02", &ProductBatchKey::new("SKU-2", "B1"), Decimal::from(3));

        let demand = vec![line("SKU-2", 50, 0), line("SKU-9", 500, 1), line("SKU-1", 200, 2)];

        let decisions = DecisionClassifier::classify(&demand, &state, &PlanningConfig::new());

        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].key.product_id, "SKU-2");
        assert_eq!(decisions[0].action, Action::Consolidate);
        assert_eq!(decisions[1].key.product_id, "SKU-1");
        assert_eq!(decisions[1].action, Action::Distribute);
        assert_eq!(decisions[1].required_zones, 4);
        assert_eq!(
            DecisionClassifier::classify_counts(&decisions),
            (1, 1, 0)
        );
    }
}
