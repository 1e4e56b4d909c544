// ==========================================
// 货运装载规划引擎 - 核心库
// ==========================================
// 系统定位: 容量与运价规划决策支持 (纯计算内核)
// 职责: 包装几何换算 + 物理/法规约束评估 + 批量拼装 + 运价计价
// 边界: 主数据读取与界面渲染由外围应用承担,本库只做进程内函数调用
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AppliesWhen, ChargeCalcMethod, ConstraintKind, FitLimit, LoadPolicy, LocationType,
    PayloadCapKind, ServiceScope, TransportMode, UomPricing,
};

// 领域实体
pub use domain::{
    ConsolidationRequirement, ConstraintContext, ContainerPlan, Equipment, EquipmentCapacity,
    JurisdictionWeightRule, PackagingRule, RateCard, RateCharge, RateQuote, ShipmentDescriptor,
    TruckConfig, TruckPlan, WeightDistribution,
};

// 引擎
pub use engine::{
    BatchPlanner, ConstraintEngine, ConveyanceFit, PlanError, PlanResult, QuickPlanner, RateEngine,
    TruckLegalPayload,
};
