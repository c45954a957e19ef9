//! # Auto IM
//!
//! 倉庫庫內移動（IM）規劃：依需求壓力整併或分散產品批次的儲位，
//! 產出可上傳的移動指令檔與診斷報告。

pub mod logging;

pub use im_calc::{MovementPlanner, PlanResult};
pub use im_core::PlanningConfig;

pub mod core {
    pub use im_core::*;
}

pub mod calc {
    pub use im_calc::*;
}

pub mod export {
    pub use im_export::*;
}
