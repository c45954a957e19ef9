//! CSV 讀取

use im_core::{BinMasterEntry, LotAvailability, RawBinRow, RawDemandRow};
use serde::de::DeserializeOwned;
use std::io::Read;

use crate::Result;

/// 讀取任一可反序列化的表格
fn read_table<T, R>(reader: R, table: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }

    tracing::debug!("讀取 {} 表 {} 列", table, rows.len());
    Ok(rows)
}

/// 讀取儲位庫存快照
pub fn read_bin_rows<R: Read>(reader: R) -> Result<Vec<RawBinRow>> {
    read_table(reader, "inventory")
}

/// 讀取揀貨需求
pub fn read_demand_rows<R: Read>(reader: R) -> Result<Vec<RawDemandRow>> {
    read_table(reader, "demand")
}

/// 讀取儲位主檔
pub fn read_bin_master<R: Read>(reader: R) -> Result<Vec<BinMasterEntry>> {
    read_table(reader, "bin master")
}

/// 讀取批號可用量
pub fn read_lots<R: Read>(reader: R) -> Result<Vec<LotAvailability>> {
    read_table(reader, "lots")
}
