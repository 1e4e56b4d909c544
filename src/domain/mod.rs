// ==========================================
// 货运装载规划引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型与派生规则
// 红线: 不含数据访问逻辑,不含引擎逻辑
// 所有实体为调用方传入的只读快照
// ==========================================

pub mod consolidation;
pub mod equipment;
pub mod packaging;
pub mod rate;
pub mod types;

// 重导出核心类型
pub use consolidation::{
    ConsolidationRequirement, ContainerPlan, ContainerPlanRow, PackConversion, SkuConversion,
    TruckLoad, TruckPlan, UnitsConversion,
};
pub use equipment::{
    ConstraintContext, Equipment, EquipmentCapacity, JurisdictionWeightRule, TruckConfig,
    WeightDistribution, DEFAULT_VOLUMETRIC_FACTOR,
};
pub use packaging::PackagingRule;
pub use rate::{RateCard, RateCharge, RateItem, RateItemType, RateQuote, ShipmentDescriptor};
pub use types::{
    AppliesWhen, ChargeCalcMethod, ConstraintKind, FitLimit, LoadPolicy, LocationType,
    PayloadCapKind, ServiceScope, TransportMode, UomPricing,
};
