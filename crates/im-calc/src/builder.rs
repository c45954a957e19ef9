//! 庫存狀態建構
//!
//! 將原始儲位列過濾到受管揀貨區、受管區域範圍，排除停用的儲位類別，
//! 再彙總為每儲位與每產品批次的視圖。

use im_core::{normalize_code, ImError, PlanningConfig, ProductBatchKey, RawBinRow};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::state::InventoryState;

/// 庫存狀態建構器
pub struct InventoryStateBuilder;

impl InventoryStateBuilder {
    /// 建立執行期庫存狀態
    ///
    /// 必要欄位缺漏或數字欄位無法解析時回傳資料錯誤，整次規劃中止。
    /// 數量 <= 0 的列只登記儲位（視為空儲位），此時不要求 SKU 與批次。
    pub fn build(rows: &[RawBinRow], config: &PlanningConfig) -> im_core::Result<InventoryState> {
        let mut state = InventoryState::new().with_area(config.managed_area.clone());
        let mut skipped = 0usize;

        for (index, row) in rows.iter().enumerate() {
            let row_no = index + 1;

            if !config.is_managed_area(row.area.as_deref()) {
                skipped += 1;
                continue;
            }

            let bin = normalize_code(required(&row.bin, row_no, "bin")?);
            let zone = parse_zone(required(&row.zone, row_no, "zone")?, row_no)?;
            let qty = parse_decimal(required(&row.qty, row_no, "qty")?, row_no, "qty")?;

            if !config.managed_zone_range.contains(zone)
                || config.is_excluded_bin_type(row.bin_type.as_deref())
            {
                skipped += 1;
                continue;
            }

            state.ensure_bin(&bin, zone, row.bin_type.as_deref().map(normalize_code));

            if qty <= Decimal::ZERO {
                continue;
            }

            let sku = normalize_code(required(&row.sku, row_no, "sku")?);
            let batch = normalize_code(required(&row.batch, row_no, "batch")?);
            let product_id = row
                .product_id
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(normalize_code)
                .unwrap_or_else(|| sku.clone());

            let key = ProductBatchKey::new(&product_id, &batch);
            state.register_batch(&key, &sku);
            state.add_holding(&bin, &key, qty);
        }

        tracing::debug!(
            "庫存狀態建立完成：輸入 {} 列，略過 {} 列，儲位 {} 個，產品批次 {} 個",
            rows.len(),
            skipped,
            state.bin_total(),
            state.summaries().len()
        );

        Ok(state)
    }
}

/// 取出必要欄位；空白視為缺漏
pub(crate) fn required<'a>(
    value: &'a Option<String>,
    row: usize,
    field: &'static str,
) -> im_core::Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ImError::MissingField { row, field })
}

pub(crate) fn parse_decimal(
    value: &str,
    row: usize,
    field: &'static str,
) -> im_core::Result<Decimal> {
    Decimal::from_str(value.trim()).map_err(|_| ImError::InvalidNumber {
        row,
        field,
        value: value.to_string(),
    })
}

fn parse_zone(value: &str, row: usize) -> im_core::Result<u32> {
    value.trim().parse::<u32>().map_err(|_| ImError::InvalidNumber {
        row,
        field: "zone",
        value: value.to_string(),
    })
}
