//! CSV 寫出

use im_core::{DecisionRecord, MovementInstruction};
use serde::Serialize;
use std::io::Write;

use crate::Result;

/// 庫內移動上傳檔的欄位（A..H）
///
/// A 來源儲位、B 空白、C SKU、D 批次、E 品質等級、F 計量單位、G 數量、H 目的儲位
pub const IM_FILE_HEADER: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// 寫出庫內移動上傳檔，回傳寫出的列數
pub fn write_movements<'a, W, I>(writer: W, movements: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a MovementInstruction>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(IM_FILE_HEADER)?;

    let mut count = 0;
    for movement in movements {
        let quantity = movement.quantity.normalize().to_string();
        csv_writer.write_record([
            movement.source_bin.as_str(),
            "",
            movement.sku.as_str(),
            movement.batch.as_str(),
            movement.quality_grade.as_str(),
            movement.unit_of_measure.as_str(),
            quantity.as_str(),
            movement.destination_bin.as_str(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    tracing::debug!("寫出移動指令 {} 列", count);
    Ok(count)
}

/// 診斷檔的一列
#[derive(Debug, Serialize)]
struct DiagnosticsRow<'a> {
    product_id: &'a str,
    sku: &'a str,
    batch: &'a str,
    action: String,
    current_bins: u32,
    required_zones: u32,
    pressure_index: Option<String>,
    moves_emitted: usize,
    error_reason: Option<String>,
    donor_batch: Option<&'a str>,
}

/// 寫出診斷檔，回傳寫出的列數
pub fn write_diagnostics<'a, W, I>(writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a DecisionRecord>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut count = 0;
    for record in records {
        csv_writer.serialize(DiagnosticsRow {
            product_id: &record.product_id,
            sku: &record.sku,
            batch: &record.batch,
            action: record.action.to_string(),
            current_bins: record.current_bins,
            required_zones: record.required_zones,
            pressure_index: record.pressure_index.map(|p| p.normalize().to_string()),
            moves_emitted: record.moves_emitted,
            error_reason: record.error_reason.as_ref().map(ToString::to_string),
            donor_batch: record.donor_batch.as_deref(),
        })?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use im_core::{Action, FailureReason, MovementKind, ProductBatchKey};
    use rust_decimal::Decimal;

    fn movement() -> MovementInstruction {
        MovementInstruction {
            source_bin: "A-01".to_string(),
            destination_bin: "A-03".to_string(),
            product_id: "SKU-1".to_string(),
            sku: "SKU-1".to_string(),
            batch: "B1".to_string(),
            quality_grade: "Good".to_string(),
            unit_of_measure: "L0".to_string(),
            quantity: Decimal::new(1500, 2),
            kind: MovementKind::Distribution,
        }
    }

    #[test]
    fn test_write_im_file_layout() {
        let mut buffer = Vec::new();
        let count = write_movements(&mut buffer, &[movement()]).unwrap();

        assert_eq!(count, 1);
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "A,B,C,D,E,F,G,H");
        assert_eq!(lines[1], "A-01,,SKU-1,B1,Good,L0,15,A-03");
    }

    #[test]
    fn test_write_diagnostics() {
        let key = ProductBatchKey::new("SKU-1", "B1");
        let mut record = DecisionRecord::new(&key, "SKU-1", Action::Distribute, 1, 3);
        record.error_reason = Some(FailureReason::NoConsolidationCandidate);

        let mut buffer = Vec::new();
        write_diagnostics(&mut buffer, &[record]).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("product_id,sku,batch,action"));
        assert!(lines[1].contains("DISTRIBUTE"));
        assert!(lines[1].contains("manual intervention required: no consolidation candidate"));
    }
}
