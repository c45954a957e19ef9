//! 需求標準化
//!
//! 將原始需求列轉為所需儲位數，並依需求壓力排序、只保留前 N 筆。

use im_core::{normalize_code, DemandLine, PlanningConfig, ProductBatchKey, RawDemandRow};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::builder::{parse_decimal, required};

/// 標準化後的需求
#[derive(Debug, Clone, Default)]
pub struct NormalizedDemand {
    /// 全部需求（依輸入順序，重複列已合併）
    pub all: Vec<DemandLine>,

    /// 依揀貨行數遞減排序後的前 N 筆
    pub ranked: Vec<DemandLine>,
}

impl NormalizedDemand {
    /// 查詢任一產品批次的需求（不限前 N 筆）
    pub fn find(&self, key: &ProductBatchKey) -> Option<&DemandLine> {
        self.all.iter().find(|line| &line.key() == key)
    }

    /// 所有需求的所需儲位數索引
    pub fn required_zones_index(&self) -> HashMap<ProductBatchKey, u32> {
        self.all
            .iter()
            .map(|line| (line.key(), line.required_zones))
            .collect()
    }
}

/// 需求標準化器
pub struct DemandNormalizer;

impl DemandNormalizer {
    /// 標準化需求列
    pub fn normalize(
        rows: &[RawDemandRow],
        config: &PlanningConfig,
    ) -> im_core::Result<NormalizedDemand> {
        let threshold = config.lines_per_bin_threshold;
        let mut all: Vec<DemandLine> = Vec::new();
        let mut positions: HashMap<ProductBatchKey, usize> = HashMap::new();

        for (index, row) in rows.iter().enumerate() {
            let row_no = index + 1;

            let sku = normalize_code(required(&row.sku, row_no, "sku")?);
            let batch = normalize_code(required(&row.batch, row_no, "batch")?);
            let lines = parse_decimal(required(&row.lines, row_no, "lines")?, row_no, "lines")?;
            let quantity = match row.quantity.as_deref().map(str::trim) {
                Some(q) if !q.is_empty() => parse_decimal(q, row_no, "quantity")?,
                _ => Decimal::ZERO,
            };
            let product_id = row
                .product_id
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(normalize_code)
                .unwrap_or_else(|| sku.clone());

            let key = ProductBatchKey::new(&product_id, &batch);

            // 重複的產品批次合併到第一次出現的位置
            if let Some(&pos) = positions.get(&key) {
                let merged = &mut all[pos];
                let lines = merged.lines + lines;
                let quantity = merged.quantity + quantity;
                *merged = DemandLine::new(
                    merged.product_id.clone(),
                    merged.sku.clone(),
                    merged.batch.clone(),
                    lines,
                    quantity,
                    threshold,
                )
                .with_input_order(pos);
                continue;
            }

            positions.insert(key, all.len());
            let order = all.len();
            all.push(
                DemandLine::new(product_id, sku, batch, lines, quantity, threshold)
                    .with_input_order(order),
            );
        }

        let ranked = Self::rank(&all, config.top_n_demand_lines);

        tracing::debug!(
            "需求標準化完成：輸入 {} 列，合併後 {} 筆，評估前 {} 筆",
            rows.len(),
            all.len(),
            ranked.len()
        );

        Ok(NormalizedDemand { all, ranked })
    }

    /// 依揀貨行數遞減排序（同分保持輸入順序），取前 N 筆
    pub fn rank(lines: &[DemandLine], top_n: usize) -> Vec<DemandLine> {
        let mut ranked = lines.to_vec();
        ranked.sort_by(|a, b| {
            b.lines
                .cmp(&a.lines)
                .then_with(|| a.input_order.cmp(&b.input_order))
        });
        ranked.truncate(top_n);
        ranked
    }
}
