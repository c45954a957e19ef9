//! 簡單庫內移動規劃示例

use auto_im::calc::BinCatalog;
use auto_im::core::{BinMasterEntry, LotAvailability, RawBinRow, RawDemandRow};
use auto_im::{MovementPlanner, PlanningConfig};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    auto_im::logging::init();
    println!("=== 簡單庫內移動規劃示例 ===\n");

    // 儲位庫存：SKU-A 散落三個儲位，SKU-B 集中在一個儲位
    let bins = vec![
        RawBinRow::new("SKU-A", "A1", "PTL-01", 1, 10),
        RawBinRow::new("SKU-A", "A1", "PTL-02", 1, 5),
        RawBinRow::new("SKU-A", "A1", "PTL-03", 2, 5),
        RawBinRow::new("SKU-B", "B1", "PTL-04", 2, 30),
        RawBinRow::new("", "", "PTL-05", 3, 0),
    ];

    // 需求：SKU-B 揀貨行數高，需要分散
    let demand = vec![
        RawDemandRow::new("SKU-A", "A1", 40, 100),
        RawDemandRow::new("SKU-B", "B1", 150, 60),
    ];

    let lots = vec![
        LotAvailability::new(
            "SKU-B",
            "B1",
            Decimal::from(40),
            NaiveDate::from_ymd_opt(2026, 12, 1).ok_or("invalid date")?,
        ),
        LotAvailability::new(
            "SKU-B",
            "B0",
            Decimal::from(30),
            NaiveDate::from_ymd_opt(2026, 11, 1).ok_or("invalid date")?,
        ),
    ];

    let config = PlanningConfig::new();
    let catalog = BinCatalog::new(
        &[BinMasterEntry::new("PTL-06", 4).with_product_affinity("SKU-B")],
        &config,
    );

    let planner = MovementPlanner::new(config, catalog);
    let result = planner.run(&bins, &demand, lots)?;

    println!("決策:");
    for record in result.decisions() {
        println!(
            "  - {}/{}: {} (儲位 {} → 需求 {})",
            record.product_id,
            record.batch,
            record.action,
            record.current_bins,
            record.required_zones
        );
        if let Some(reason) = &record.error_reason {
            println!("    {}", reason);
        }
    }

    println!("\n移動指令:");
    for movement in &result.movements {
        println!(
            "  - {} → {}: {} {} x {}",
            movement.source_bin,
            movement.destination_bin,
            movement.sku,
            movement.batch,
            movement.quantity
        );
    }

    println!("\nFEFO 分配:");
    for allocation in &result.lot_allocations {
        for pick in &allocation.picks {
            println!(
                "  - {} 批號 {} 數量 {} (到期 {})",
                allocation.sku, pick.batch, pick.quantity, pick.expiry_date
            );
        }
    }

    println!("\n✓ 規劃完成");
    Ok(())
}
