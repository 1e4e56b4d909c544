// ==========================================
// 货运装载规划引擎 - 拼装计划领域模型
// ==========================================
// 批量需求输入与拼装结果记录,
// 结果由 UI 层渲染成装载清单/利用率报表
// ==========================================

use crate::domain::packaging::PackagingRule;
use crate::domain::types::{FitLimit, LoadPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ConsolidationRequirement - 单 SKU 需求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationRequirement {
    pub sku_id: i64,
    pub part_number: String,
    pub required_kg: f64,
    /// 包装规则快照 (规划期间不变)
    pub pack_rule: PackagingRule,
}

// ==========================================
// 数量换算结果
// ==========================================

/// 按单位数需求 → pack 数换算
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitsConversion {
    pub packs: i64,
    pub shipped_units: f64,
    pub excess_units: f64,
}

/// 按公斤需求 → pack 数换算
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackConversion {
    pub required_kg: f64,
    pub required_units: f64,
    pub packs_required: i64,
    pub shipped_units: f64,
    pub shipped_kg: f64,
    pub excess_kg: f64,
    /// kg_per_unit 缺失时,需求公斤数直接按单位数处理 (需在界面明示)
    pub kg_as_units_mode: bool,
}

// ==========================================
// 容器 NO_MIX 计划
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerPlanRow {
    pub sku_id: i64,
    pub part_number: String,
    #[serde(flatten)]
    pub conversion: PackConversion,
    pub equipment_code: String,
    pub packs_fit: i64,
    pub containers_needed: i64,
    pub limiting_constraint: FitLimit,
    pub cube_util: f64,
    pub weight_util: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerPlan {
    pub policy: LoadPolicy,
    pub per_sku: Vec<ContainerPlanRow>,
    pub total_conveyance_count: i64,
}

// ==========================================
// 卡车计划 (NO_MIX / MIX_OK 共用输出形态)
// ==========================================

/// 单 SKU 换算行 (卡车计划共用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuConversion {
    pub sku_id: i64,
    pub part_number: String,
    #[serde(flatten)]
    pub conversion: PackConversion,
}

/// 单车装载清单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckLoad {
    pub truck_id: i64,
    /// sku_id → pack 数 (BTreeMap 保证输出顺序稳定)
    pub sku_breakdown: BTreeMap<i64, i64>,
    pub total_weight_kg: f64,
    pub total_volume_m3: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckPlan {
    pub policy: LoadPolicy,
    pub per_sku_conversion: Vec<SkuConversion>,
    pub truck_count: i64,
    pub weight_util: f64,
    pub volume_util: f64,
    pub trucks: Vec<TruckLoad>,
    /// 每 SKU 独占车辆时的基线车数 (混装结果不应劣于它)
    pub no_mix_baseline_truck_count: i64,
}
