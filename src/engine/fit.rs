// ==========================================
// 货运装载规划引擎 - 装载几何计算 (Fit Core)
// ==========================================
// 职责: 需求量 → pack 数换算 + 单运载单元可装 pack 数
// 输入: PackagingRule + Equipment (只读快照)
// 输出: 换算/装载结果记录,纯函数,无状态
// ==========================================

use crate::domain::consolidation::{PackConversion, UnitsConversion};
use crate::domain::equipment::{Equipment, EquipmentCapacity};
use crate::domain::packaging::PackagingRule;
use crate::domain::types::FitLimit;
use crate::engine::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};

// ==========================================
// 输出记录
// ==========================================

/// 单运载单元装载结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentFit {
    pub packs_per_layer: i64,
    pub layers_allowed: i64,
    pub by_grid: i64,   // 几何上限 (层容量 × 层数)
    pub by_weight: i64, // 载重上限
    pub packs_fit: i64, // min(by_grid, by_weight),下限 0
    pub limiting_constraint: FitLimit,
}

/// 利用率
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utilization {
    pub pack_utilization: f64,
    pub cube_util: f64,
    pub weight_util: f64,
}

// ==========================================
// 数量换算
// ==========================================

/// 需求单位数 → 订购 pack 数
///
/// 规则 (顺序执行):
/// 1) packs = ceil(required_units / units_per_pack)
/// 2) packs = max(packs, min_order_packs)
/// 3) packs 向上取整到 increment_packs 的倍数
///
/// 保证: 结果是满足 MOQ 与步长约束的最小 pack 数
pub fn rounded_order_packs(required_units: f64, rule: &PackagingRule) -> PlanResult<i64> {
    if rule.units_per_pack <= 0.0 {
        return Err(PlanError::pack_field_not_positive("units_per_pack"));
    }
    let mut packs = (required_units / rule.units_per_pack).ceil() as i64;
    packs = packs.max(rule.min_order_packs.max(1));
    let increment = rule.increment_packs.max(1);
    Ok((packs + increment - 1) / increment * increment)
}

/// 需求单位数 → pack 数 + 实发/超发单位数
pub fn required_shipped_units(
    required_units: f64,
    rule: &PackagingRule,
) -> PlanResult<UnitsConversion> {
    let packs = rounded_order_packs(required_units, rule)?;
    let shipped_units = packs as f64 * rule.units_per_pack;
    Ok(UnitsConversion {
        packs,
        shipped_units,
        excess_units: (shipped_units - required_units).max(0.0),
    })
}

/// 需求公斤数 → pack 数换算
///
/// kg_per_unit 缺失/非正时回退为 kg_as_units 模式:
/// 需求公斤数直接按单位数处理,让用户仍可出计划,但结果中明确打标
pub fn required_packs_for_kg(required_kg: f64, rule: &PackagingRule) -> PlanResult<PackConversion> {
    if rule.units_per_pack <= 0.0 {
        return Err(PlanError::pack_field_not_positive("units_per_pack"));
    }
    let kg_as_units_mode = rule.kg_per_unit <= 0.0;
    let required_units = if kg_as_units_mode {
        required_kg
    } else {
        required_kg / rule.kg_per_unit
    };
    let packs = rounded_order_packs(required_units, rule)?;
    let shipped_units = packs as f64 * rule.units_per_pack;
    let shipped_kg = if kg_as_units_mode {
        shipped_units
    } else {
        shipped_units * rule.kg_per_unit
    };
    Ok(PackConversion {
        required_kg,
        required_units,
        packs_required: packs,
        shipped_units,
        shipped_kg,
        excess_kg: (shipped_kg - required_kg).max(0.0),
        kg_as_units_mode,
    })
}

// ==========================================
// 地板网格与层数
// ==========================================

/// 单层可放 pack 数: 取两种 90° 摆放方向中的较大值
pub fn packs_per_layer(pack_l: f64, pack_w: f64, eq_l: f64, eq_w: f64) -> PlanResult<i64> {
    if pack_l <= 0.0 || pack_w <= 0.0 {
        return Err(PlanError::InvalidPackRule {
            field: "dim_l_m/dim_w_m".to_string(),
            message: "pack 底面尺寸必须 > 0".to_string(),
        });
    }
    if eq_l <= 0.0 || eq_w <= 0.0 {
        return Err(PlanError::InvalidPackRule {
            field: "internal_length_m/internal_width_m".to_string(),
            message: "运载单元底面尺寸必须 > 0".to_string(),
        });
    }
    let aligned = (eq_l / pack_l).floor() * (eq_w / pack_w).floor();
    let rotated = (eq_l / pack_w).floor() * (eq_w / pack_l).floor();
    Ok((aligned.max(rotated) as i64).max(0))
}

/// 允许堆叠层数: 不可堆叠 = 1,否则 floor(净高/pack 高) 且受 max_stack 限制,下限 1
pub fn layers_allowed(
    pack_h: f64,
    eq_h: f64,
    stackable: bool,
    max_stack: Option<i64>,
) -> PlanResult<i64> {
    if pack_h <= 0.0 || eq_h <= 0.0 {
        return Err(PlanError::InvalidPackRule {
            field: "dim_h_m/internal_height_m".to_string(),
            message: "pack 高与净高必须 > 0".to_string(),
        });
    }
    if !stackable {
        return Ok(1);
    }
    let mut layers = (eq_h / pack_h).floor() as i64;
    if let Some(cap) = max_stack {
        layers = layers.min(cap);
    }
    Ok(layers.max(1))
}

// ==========================================
// 单运载单元装载
// ==========================================

/// 单运载单元可装 pack 数 (几何 × 载重取小)
pub fn packs_per_equipment(rule: &PackagingRule, equipment: &Equipment) -> PlanResult<EquipmentFit> {
    let caps = EquipmentCapacity::try_from_equipment(equipment)?;
    require_pack_geometry(rule)?;
    let pack_gross = rule.pack_gross_kg();
    if pack_gross <= 0.0 {
        return Err(PlanError::pack_field_not_positive("pack_gross_kg"));
    }

    let per_layer = packs_per_layer(
        rule.dim_l_m,
        rule.dim_w_m,
        caps.internal_length_m,
        caps.internal_width_m,
    )?;
    let layers = layers_allowed(
        rule.dim_h_m,
        caps.internal_height_m,
        rule.stackable,
        rule.max_stack,
    )?;

    let by_grid = per_layer * layers;
    let by_weight = (caps.max_payload_kg / pack_gross).floor() as i64;
    Ok(EquipmentFit {
        packs_per_layer: per_layer,
        layers_allowed: layers,
        by_grid,
        by_weight,
        packs_fit: by_grid.min(by_weight).max(0),
        limiting_constraint: fit_limit(by_grid, by_weight),
    })
}

/// 带堆叠策略的装载: 策略禁止堆叠时压缩为单层重新判定
pub fn packs_fit_with_policy(
    rule: &PackagingRule,
    equipment: &Equipment,
    stacking_allowed: bool,
) -> PlanResult<EquipmentFit> {
    let fit = packs_per_equipment(rule, equipment)?;
    if stacking_allowed {
        return Ok(fit);
    }
    let by_grid = fit.packs_per_layer;
    Ok(EquipmentFit {
        packs_per_layer: fit.packs_per_layer,
        layers_allowed: 1,
        by_grid,
        by_weight: fit.by_weight,
        packs_fit: by_grid.min(fit.by_weight).max(0),
        limiting_constraint: fit_limit(by_grid, fit.by_weight),
    })
}

/// 所需运载单元数: ceil(packs_required / packs_fit),不可装时为 0
pub fn equipment_count_for_packs(packs_required: i64, packs_fit: i64) -> i64 {
    if packs_fit <= 0 {
        return 0;
    }
    (packs_required + packs_fit - 1) / packs_fit
}

/// 利用率: 实发量 ÷ (运载单元数 × 容量),容量为零时记 0
pub fn utilization(
    packs_required: i64,
    packs_fit: i64,
    equipment_count: i64,
    pack_volume: f64,
    pack_gross: f64,
    eq_volume: f64,
    max_payload: f64,
) -> Utilization {
    let total_capacity_packs = equipment_count * packs_fit;
    let pack_utilization = if total_capacity_packs > 0 {
        packs_required as f64 / total_capacity_packs as f64
    } else {
        0.0
    };
    let cap_volume = equipment_count as f64 * eq_volume;
    let cap_weight = equipment_count as f64 * max_payload;
    Utilization {
        pack_utilization,
        cube_util: if cap_volume > 0.0 {
            packs_required as f64 * pack_volume / cap_volume
        } else {
            0.0
        },
        weight_util: if cap_weight > 0.0 {
            packs_required as f64 * pack_gross / cap_weight
        } else {
            0.0
        },
    }
}

// ==========================================
// 内部辅助
// ==========================================

/// 几何场景下的包装尺寸校验 (纯重量场景允许零尺寸)
pub(crate) fn require_pack_geometry(rule: &PackagingRule) -> PlanResult<()> {
    for (value, field) in [
        (rule.dim_l_m, "dim_l_m"),
        (rule.dim_w_m, "dim_w_m"),
        (rule.dim_h_m, "dim_h_m"),
    ] {
        if value <= 0.0 {
            return Err(PlanError::pack_field_not_positive(field));
        }
    }
    Ok(())
}

/// 严格小于才判几何限制,持平归载重限制
fn fit_limit(by_grid: i64, by_weight: i64) -> FitLimit {
    if by_grid < by_weight {
        FitLimit::FloorOrHeight
    } else {
        FitLimit::Payload
    }
}
