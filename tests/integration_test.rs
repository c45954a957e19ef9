//! 集成測試

use auto_im::calc::{BinCatalog, MovementPlanner, PlanResult};
use auto_im::core::{
    Action, FailureReason, LotAvailability, MovementKind, PlanningConfig, PriorityClass,
    ProductBatchKey, RawBinRow, RawDemandRow,
};
use auto_im::{export, logging};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn plan(bins: &[RawBinRow], demand: &[RawDemandRow]) -> PlanResult {
    plan_with(PlanningConfig::new(), bins, demand, Vec::new())
}

fn plan_with(
    config: PlanningConfig,
    bins: &[RawBinRow],
    demand: &[RawDemandRow],
    lots: Vec<LotAvailability>,
) -> PlanResult {
    logging::init_test();
    MovementPlanner::new(config, BinCatalog::empty())
        .run(bins, demand, lots)
        .unwrap()
}

/// 以規劃後的庫存重新規劃
fn replan(result: &PlanResult, demand: &[RawDemandRow]) -> PlanResult {
    let bins: Vec<RawBinRow> = result.final_bin_stock().iter().map(RawBinRow::from).collect();
    plan(&bins, demand)
}

fn empty_bin(bin: &str, zone: u32) -> RawBinRow {
    RawBinRow::new("", "", bin, zone, 0)
}

#[test]
fn test_consolidation_into_largest_bin() {
    // 三個儲位 [10, 5, 5]，所需儲位 1
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "A-01", 1, 10),
        RawBinRow::new("SKU-1", "B1", "A-02", 1, 5),
        RawBinRow::new("SKU-1", "B1", "A-03", 1, 5),
    ];
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 40, 100)];

    let result = plan(&bins, &demand);

    assert_eq!(result.movements.len(), 2);
    for movement in &result.movements {
        assert_eq!(movement.destination_bin, "A-01");
        assert_eq!(movement.quantity, Decimal::from(5));
        assert_eq!(movement.kind, MovementKind::Consolidation);
        assert_eq!(movement.quality_grade, "Good");
        assert_eq!(movement.unit_of_measure, "L0");
    }

    let key = ProductBatchKey::new("SKU-1", "B1");
    assert_eq!(result.final_state.qty_in("A-01", &key), Decimal::from(20));
    assert!(result.final_state.is_empty_bin("A-02"));
    assert!(result.final_state.is_empty_bin("A-03"));

    let record = &result.decisions()[0];
    assert_eq!(record.action, Action::Consolidate);
    assert_eq!(record.current_bins, 3);
    assert_eq!(record.required_zones, 1);
    assert_eq!(record.moves_emitted, 2);
    assert!(record.error_reason.is_none());
}

#[test]
fn test_distribution_splits_source_quantity() {
    // 單一儲位 30 單位，所需儲位 3，兩個空儲位
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "A-01", 1, 30),
        empty_bin("A-02", 1),
        empty_bin("A-03", 1),
    ];
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 150, 100)];

    let result = plan(&bins, &demand);

    assert_eq!(result.movements.len(), 2);
    let destinations: Vec<_> = result
        .movements
        .iter()
        .map(|m| m.destination_bin.as_str())
        .collect();
    assert_eq!(destinations, vec!["A-02", "A-03"]);
    assert!(result
        .movements
        .iter()
        .all(|m| m.source_bin == "A-01" && m.quantity == Decimal::from(15)));

    let key = ProductBatchKey::new("SKU-1", "B1");
    assert_eq!(result.final_state.qty_in("A-01", &key), Decimal::ZERO);
    assert_eq!(result.final_state.bin_count(&key), 2);
    assert_eq!(result.decisions()[0].action, Action::Distribute);
    assert_eq!(
        result.decisions()[0].error_reason,
        Some(FailureReason::PartialFulfillment {
            requested: 2,
            fulfilled: 1
        })
    );
    assert_eq!(result.diagnostics.summary.partial, 1);
}

#[test]
fn test_single_new_pick_face_keeps_source() {
    // 100 行 → 所需 2 個儲位，只差 1 個
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "A-01", 1, 30),
        empty_bin("A-02", 1),
        empty_bin("A-03", 1),
    ];
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 100, 60)];

    let first = plan(&bins, &demand);

    assert_eq!(first.movements.len(), 1);
    assert_eq!(first.movements[0].source_bin, "A-01");
    assert_eq!(first.movements[0].destination_bin, "A-02");
    assert_eq!(first.movements[0].quantity, Decimal::from(29));
    assert!(first.decisions()[0].error_reason.is_none());

    let key = ProductBatchKey::new("SKU-1", "B1");
    assert_eq!(first.final_state.bin_count(&key), 2);

    let second = replan(&first, &demand);

    assert!(second.movements.is_empty());
    assert_eq!(second.decisions()[0].action, Action::NoAction);
}

#[test]
fn test_distribution_without_candidates_requires_manual_intervention() {
    // 同區域沒有空儲位，也沒有兄弟批次；其他區域的空儲位不算候選
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "A-01", 1, 30),
        empty_bin("B-01", 2),
    ];
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 150, 100)];

    let result = plan(&bins, &demand);

    assert!(result.movements.is_empty());
    assert_eq!(result.decisions().len(), 1);

    let record = &result.decisions()[0];
    assert_eq!(record.action, Action::Distribute);
    assert_eq!(record.moves_emitted, 0);
    assert_eq!(
        record.error_reason,
        Some(FailureReason::NoConsolidationCandidate)
    );
    assert!(record
        .error_reason
        .as_ref()
        .unwrap()
        .to_string()
        .starts_with("manual intervention required"));
    assert_eq!(result.diagnostics.summary.manual_intervention, 1);
}

#[test]
fn test_cascade_frees_bin_from_sibling_batch() {
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "T-01", 1, 30).with_product_id("P-1"),
        RawBinRow::new("SKU-1", "B2", "S-01", 1, 8).with_product_id("P-1"),
        RawBinRow::new("SKU-1", "B2", "S-02", 1, 4).with_product_id("P-1"),
    ];
    // 110 行 → 所需 2 個儲位
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 110, 30).with_product_id("P-1")];

    let result = plan(&bins, &demand);

    let cascade: Vec<_> = result.movements_of_kind(MovementKind::Cascade).collect();
    let distribution: Vec<_> = result.movements_of_kind(MovementKind::Distribution).collect();
    assert_eq!(cascade.len(), 1);
    assert_eq!(distribution.len(), 1);

    // 兄弟批次整併進數量較大的儲位，釋放的儲位成為分散目的地
    assert_eq!(cascade[0].source_bin, "S-02");
    assert_eq!(cascade[0].destination_bin, "S-01");
    assert_eq!(cascade[0].batch, "B2");
    assert_eq!(distribution[0].destination_bin, "S-02");
    assert_eq!(distribution[0].batch, "B1");

    // 級聯移動先於分散移動
    assert_eq!(result.movements[0].kind, MovementKind::Cascade);

    let record = &result.decisions()[0];
    assert_eq!(record.donor_batch.as_deref(), Some("B2"));
    assert!(record.error_reason.is_none());
    assert_eq!(record.moves_emitted, 2);
    assert_eq!(result.diagnostics.summary.cascaded, 1);
}

#[test]
fn test_cascade_never_frees_bin_shared_with_other_product() {
    // S-02 同時放著 B2 與其他產品，整併 B2 後仍不是空儲位
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "T-01", 1, 30).with_product_id("P-1"),
        RawBinRow::new("SKU-1", "B2", "S-01", 1, 8).with_product_id("P-1"),
        RawBinRow::new("SKU-1", "B2", "S-02", 1, 4).with_product_id("P-1"),
        RawBinRow::new("SKU-X", "X1", "S-02", 1, 3),
    ];
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 110, 30).with_product_id("P-1")];

    let result = plan(&bins, &demand);

    assert!(result.movements.is_empty());
    let record = &result.decisions()[0];
    assert_eq!(
        record.error_reason,
        Some(FailureReason::NoConsolidationCandidate)
    );
    assert!(record.donor_batch.is_none());

    let sibling = ProductBatchKey::new("P-1", "B2");
    assert_eq!(result.final_state.bin_count(&sibling), 2);
    assert_eq!(
        result.final_state.qty_in("S-02", &ProductBatchKey::new("SKU-X", "X1")),
        Decimal::from(3)
    );
}

#[test]
fn test_cascade_prefers_pickable_sibling() {
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "T-01", 1, 30),
        RawBinRow::new("SKU-1", "B2", "R-01", 1, 5),
        RawBinRow::new("SKU-1", "B2", "R-02", 1, 5),
        RawBinRow::new("SKU-1", "B3", "P-01", 1, 5),
        RawBinRow::new("SKU-1", "B3", "P-02", 1, 5),
    ];
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 110, 30)];
    let expiry = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
    let lots = vec![
        LotAvailability::new("SKU-1", "B2", Decimal::from(10), expiry)
            .with_priority_class(PriorityClass::Reserve),
        LotAvailability::new("SKU-1", "B3", Decimal::from(10), expiry),
    ];

    let result = plan_with(PlanningConfig::new(), &bins, &demand, lots);

    assert_eq!(result.decisions()[0].donor_batch.as_deref(), Some("B3"));
    let cascade: Vec<_> = result.movements_of_kind(MovementKind::Cascade).collect();
    assert_eq!(cascade.len(), 1);
    assert_eq!(cascade[0].batch, "B3");
}

#[test]
fn test_cascade_disabled() {
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "T-01", 1, 30),
        RawBinRow::new("SKU-1", "B2", "S-01", 1, 5),
        RawBinRow::new("SKU-1", "B2", "S-02", 1, 5),
    ];
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 110, 30)];

    let result = plan_with(
        PlanningConfig::new().with_donor_cascade(false),
        &bins,
        &demand,
        Vec::new(),
    );

    assert!(result.movements.is_empty());
    assert_eq!(
        result.decisions()[0].error_reason,
        Some(FailureReason::NoDestinationAvailable)
    );
}

#[test]
fn test_replanning_final_stock_is_stable() {
    // 31 單位分散到兩個空儲位後，來源保留 1 單位
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "A-01", 1, 31),
        empty_bin("A-02", 1),
        empty_bin("A-03", 1),
        RawBinRow::new("SKU-2", "C1", "B-01", 2, 10),
        RawBinRow::new("SKU-2", "C1", "B-02", 2, 10),
    ];
    let demand = vec![
        RawDemandRow::new("SKU-1", "B1", 150, 100),
        RawDemandRow::new("SKU-2", "C1", 20, 10),
    ];

    let first = plan(&bins, &demand);
    assert_eq!(first.movements_of_kind(MovementKind::Distribution).count(), 2);
    assert_eq!(first.movements_of_kind(MovementKind::Consolidation).count(), 1);

    let second = replan(&first, &demand);

    assert!(second.movements.is_empty());
    assert!(second
        .decisions()
        .iter()
        .all(|record| record.action == Action::NoAction));
}

#[test]
fn test_quantity_is_conserved() {
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "A-01", 1, 10),
        RawBinRow::new("SKU-1", "B1", "A-02", 1, 7),
        RawBinRow::new("SKU-2", "C1", "A-03", 1, 40),
        empty_bin("A-04", 1),
        empty_bin("A-05", 1),
    ];
    let demand = vec![
        RawDemandRow::new("SKU-1", "B1", 10, 10),
        RawDemandRow::new("SKU-2", "C1", 160, 40),
    ];

    let result = plan(&bins, &demand);
    assert!(!result.movements.is_empty());

    let total_after: Decimal = result.final_bin_stock().iter().map(|s| s.qty).sum();
    assert_eq!(total_after, Decimal::from(57));
}

#[test]
fn test_top_n_limits_evaluation() {
    let bins = vec![
        RawBinRow::new("SKU-1", "B1", "A-01", 1, 10),
        RawBinRow::new("SKU-1", "B1", "A-02", 1, 10),
        RawBinRow::new("SKU-2", "C1", "B-01", 1, 10),
        RawBinRow::new("SKU-2", "C1", "B-02", 1, 10),
    ];
    let demand = vec![
        RawDemandRow::new("SKU-1", "B1", 5, 10),
        RawDemandRow::new("SKU-2", "C1", 50, 10),
    ];

    let result = plan_with(
        PlanningConfig::new().with_top_n_demand_lines(1),
        &bins,
        &demand,
        Vec::new(),
    );

    assert_eq!(result.decisions().len(), 1);
    assert_eq!(result.decisions()[0].batch, "C1");
    assert_eq!(result.movements.len(), 1);
    assert_eq!(result.movements[0].sku, "SKU-2");
}

#[test]
fn test_fefo_allocations_in_result() {
    let bins = vec![RawBinRow::new("SKU-1", "B1", "A-01", 1, 50)];
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 10, 25)];
    let lots = vec![
        LotAvailability::new(
            "SKU-1",
            "L-LATE",
            Decimal::from(100),
            NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
        ),
        LotAvailability::new(
            "SKU-1",
            "L-EARLY",
            Decimal::from(20),
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        ),
    ];

    let result = plan_with(PlanningConfig::new(), &bins, &demand, lots);

    assert!(result.movements.is_empty());
    assert_eq!(result.lot_allocations.len(), 1);

    let allocation = &result.lot_allocations[0];
    assert_eq!(allocation.sku, "SKU-1");
    assert_eq!(allocation.picks[0].batch, "L-EARLY");
    assert_eq!(allocation.picks[0].quantity, Decimal::from(20));
    assert_eq!(allocation.picks[1].batch, "L-LATE");
    assert_eq!(allocation.picks[1].quantity, Decimal::from(5));
    assert!(allocation.is_satisfied());
}

#[test]
fn test_bad_inventory_row_aborts_run() {
    let mut row = RawBinRow::new("SKU-1", "B1", "A-01", 1, 10);
    row.qty = Some("ten".to_string());
    let demand = vec![RawDemandRow::new("SKU-1", "B1", 40, 100)];

    let result = MovementPlanner::new(PlanningConfig::new(), BinCatalog::empty()).run(
        &[row],
        &demand,
        Vec::new(),
    );

    assert!(result.is_err());
}

#[test]
fn test_csv_round_trip_through_planner() {
    logging::init_test();
    let inventory = "\
Area,SKU,Batch,Bin,Zone,Qty
PTL,SKU-1,B1,A-01,1,30
PTL,,,A-02,1,0
PTL,,,A-03,1,0
BULK,SKU-1,B1,Z-01,1,99
";
    let demand = "\
SKU,Batch,Lines,Quantity
sku-1,b1,150,100
";

    let bin_rows = export::read_bin_rows(inventory.as_bytes()).unwrap();
    let demand_rows = export::read_demand_rows(demand.as_bytes()).unwrap();

    let result = MovementPlanner::new(PlanningConfig::new(), BinCatalog::empty())
        .run(&bin_rows, &demand_rows, Vec::new())
        .unwrap();

    let mut im_file = Vec::new();
    let written = export::write_movements(&mut im_file, &result.movements).unwrap();
    assert_eq!(written, 2);

    let text = String::from_utf8(im_file).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "A,B,C,D,E,F,G,H");
    assert_eq!(lines[1], "A-01,,SKU-1,B1,Good,L0,15,A-02");
    assert_eq!(lines[2], "A-01,,SKU-1,B1,Good,L0,15,A-03");

    let mut diagnostics = Vec::new();
    export::write_diagnostics(&mut diagnostics, result.decisions()).unwrap();
    let text = String::from_utf8(diagnostics).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("DISTRIBUTE"));
}
