// ==========================================
// 货运装载规划引擎 - 引擎层
// ==========================================
// 职责: 实现装载几何/物理法规约束/批量拼装/运价计价规则
// 红线: 引擎无内部状态、无 I/O,参考数据全部由调用方传入,
//       同输入必得同输出 (确定性,可并发调用)
// ==========================================

pub mod constraints;
pub mod consolidation;
pub mod error;
pub mod fit;
pub mod quick_plan;
pub mod rate;

// 重导出核心引擎
pub use constraints::{
    ConstraintEngine, ConstraintEntry, ConveyanceFit, LegalPayloadAssumptions, PayloadCap,
    TruckLegalPayload, LB_PER_KG,
};
pub use consolidation::BatchPlanner;
pub use error::{PlanError, PlanResult};
pub use fit::{EquipmentFit, Utilization};
pub use quick_plan::{
    EquipmentFitRow, ExcludedEquipment, LaneQuery, ModeSummary, QuickPlanRequest, QuickPlanResult,
    QuickPlanner, RateBreakdownRow,
};
pub use rate::RateEngine;
