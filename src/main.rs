//! auto-im 命令列

use anyhow::{Context, Result};
use auto_im::calc::BinCatalog;
use auto_im::{export, logging, MovementPlanner, PlanningConfig};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 庫內移動規劃
#[derive(Debug, Parser)]
#[command(name = "auto-im", about = "Plan warehouse internal movements from bin stock and demand")]
struct Args {
    /// 儲位庫存 CSV
    #[arg(long)]
    inventory: PathBuf,

    /// 需求 CSV
    #[arg(long)]
    demand: PathBuf,

    /// 儲位主檔 CSV
    #[arg(long)]
    bin_master: Option<PathBuf>,

    /// 批號可用量 CSV（啟用 FEFO 分配）
    #[arg(long)]
    lots: Option<PathBuf>,

    /// 規劃參數 JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// 移動上傳檔輸出路徑
    #[arg(long)]
    out: PathBuf,

    /// 診斷檔輸出路徑
    #[arg(long)]
    diagnostics: Option<PathBuf>,
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("無法開啟 {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("無法建立 {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn load_config(path: Option<&Path>) -> Result<PlanningConfig> {
    let Some(path) = path else {
        return Ok(PlanningConfig::new());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("無法讀取 {}", path.display()))?;
    PlanningConfig::from_json_str(&json).with_context(|| format!("參數檔錯誤 {}", path.display()))
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let bin_rows = export::read_bin_rows(open(&args.inventory)?)
        .with_context(|| format!("讀取庫存失敗 {}", args.inventory.display()))?;
    let demand_rows = export::read_demand_rows(open(&args.demand)?)
        .with_context(|| format!("讀取需求失敗 {}", args.demand.display()))?;

    let catalog = match &args.bin_master {
        Some(path) => {
            let entries = export::read_bin_master(open(path)?)
                .with_context(|| format!("讀取儲位主檔失敗 {}", path.display()))?;
            BinCatalog::new(&entries, &config)
        }
        None => BinCatalog::empty(),
    };

    let lots = match &args.lots {
        Some(path) => export::read_lots(open(path)?)
            .with_context(|| format!("讀取批號失敗 {}", path.display()))?,
        None => Vec::new(),
    };

    let planner = MovementPlanner::new(config, catalog);
    let result = planner.run(&bin_rows, &demand_rows, lots)?;

    let written = export::write_movements(create(&args.out)?, &result.movements)?;
    tracing::info!("移動指令 {} 列寫入 {}", written, args.out.display());

    if let Some(path) = &args.diagnostics {
        export::write_diagnostics(create(path)?, result.decisions())?;
        tracing::info!("診斷檔寫入 {}", path.display());
    }

    let summary = &result.diagnostics.summary;
    println!(
        "run {}: {} movements, {} evaluated ({} consolidate, {} distribute, {} no action), {} manual intervention",
        result.run_id,
        result.movements.len(),
        summary.evaluated,
        summary.consolidate,
        summary.distribute,
        summary.no_action,
        summary.manual_intervention
    );
    for allocation in result.lot_allocations.iter().filter(|a| !a.is_satisfied()) {
        println!(
            "FEFO shortage: {} requested {}, unsatisfied {}",
            allocation.sku, allocation.requested, allocation.unsatisfied
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    run(&args)
}
