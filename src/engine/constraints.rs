// ==========================================
// 货运装载规划引擎 - 物理/法规约束引擎
// ==========================================
// 职责: 把简单装载判定推广为按运输方式命名的约束分解
// 输入: PackagingRule + Equipment + ConstraintContext
// 输出: 约束明细 + 受限约束 (max_units = 各约束最小值)
// 红线: 每条约束 max_units 下限 0,平票取先评估者
// ==========================================

use crate::domain::equipment::{
    ConstraintContext, Equipment, EquipmentCapacity, JurisdictionWeightRule, TruckConfig,
    WeightDistribution,
};
use crate::domain::packaging::PackagingRule;
use crate::domain::types::{ConstraintKind, PayloadCapKind, TransportMode};
use crate::engine::error::{PlanError, PlanResult};
use crate::engine::fit::{layers_allowed, packs_per_layer, require_pack_geometry};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;


/// 单位换算: 1 kg = 2.2046226218 lb
pub const LB_PER_KG: f64 = 2.2046226218;

// ==========================================
// 输出记录
// ==========================================

/// 单条命名约束
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintEntry {
    pub constraint: ConstraintKind,
    pub max_units: i64,
    /// 支撑数据 (界面展示用,不参与计算)
    pub details: serde_json::Value,
}

/// 约束分解结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConveyanceFit {
    pub max_units: i64,
    pub limiting_constraint: ConstraintKind,
    pub breakdown: Vec<ConstraintEntry>,
    pub packs_per_layer: i64,
    pub layers_allowed: i64,
    pub notes: Vec<String>,
}

/// 公路载重候选上限
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadCap {
    pub constraint: PayloadCapKind,
    pub max_payload_lb: f64,
}

/// 公路合法载重计算假设 (诊断展示)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalPayloadAssumptions {
    pub axle_count: i32,
    pub axle_span_ft: f64,
    pub weight_distribution: WeightDistribution,
    pub tare_lb: f64,
}

/// 公路合法载重结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckLegalPayload {
    pub legal_payload_lb: f64,
    pub limiting_constraint: PayloadCapKind,
    pub breakdown: Vec<PayloadCap>,
    pub assumptions: LegalPayloadAssumptions,
}

// ==========================================
// ConstraintEngine - 约束评估引擎
// ==========================================
pub struct ConstraintEngine {
    // 无状态引擎,全部参考数据由调用方传入
}

impl Default for ConstraintEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 桥梁公式 (23 CFR 658.17)
    // ==========================================

    /// 联邦桥梁公式总重上限 (磅)
    ///
    /// W = 500 * ((L*N/(N-1)) + 12N + 36)
    /// L = 最外轴距 (英尺), N = 轴数; N<2 或 L<=0 时返回 0 (不适用)
    pub fn bridge_formula_max_gvw(&self, axle_count: i32, axle_span_ft: f64) -> f64 {
        if axle_count < 2 || axle_span_ft <= 0.0 {
            return 0.0;
        }
        let n = axle_count as f64;
        let l = axle_span_ft;
        500.0 * ((l * n / (n - 1.0)) + 12.0 * n + 36.0)
    }

    /// 轴组限重 (磅)
    ///
    /// 单轴 → 单轴限重; 双联轴 → 双联限重;
    /// 三轴及以上按 tandem × (axles/2) 线性外推,待真实限重表替换
    fn axle_group_limit_lb(&self, axles: i32, single_lb: f64, tandem_lb: f64) -> f64 {
        match axles {
            i32::MIN..=1 => single_lb,
            2 => tandem_lb,
            _ => tandem_lb * (axles as f64 / 2.0),
        }
    }

    // ==========================================
    // 公路合法载重
    // ==========================================

    /// 计算公路合法载重 (磅)
    ///
    /// 取 GVW 限制、轴组限重折算、桥梁公式三者最小的总重上限,
    /// 扣除整车皮重得到合法载重;三个候选上限全部输出供诊断
    #[instrument(skip(self, truck_config, jurisdiction_rule, distribution), fields(
        truck_config_code = %truck_config.truck_config_code,
        jurisdiction_code = %jurisdiction_rule.jurisdiction_code
    ))]
    pub fn compute_truck_legal_payload_lb(
        &self,
        truck_config: &TruckConfig,
        jurisdiction_rule: &JurisdictionWeightRule,
        distribution: Option<&WeightDistribution>,
    ) -> TruckLegalPayload {
        let axle_count = truck_config.axle_count();
        let bridge_limit_lb = self.bridge_formula_max_gvw(axle_count, truck_config.axle_span_ft);
        let tare_lb = truck_config.tare_lb();

        let shares = distribution
            .copied()
            .unwrap_or_else(|| WeightDistribution::from(truck_config))
            .normalized();

        let single = jurisdiction_rule.max_single_axle_lb;
        let tandem = jurisdiction_rule.max_tandem_lb;
        let share_floor = 1e-9_f64;
        let gross_cap_by_axle = [
            (truck_config.steer_axles, shares.steer_pct),
            (truck_config.drive_axles, shares.drive_pct),
            (truck_config.trailer_axles, shares.trailer_pct),
        ]
        .into_iter()
        .map(|(axles, share)| self.axle_group_limit_lb(axles, single, tandem) / share.max(share_floor))
        .fold(f64::INFINITY, f64::min);

        let gross_cap_gvw = truck_config.max_gvw_lb.min(jurisdiction_rule.max_gvw_lb);
        let gross_cap_bridge = if bridge_limit_lb > 0.0 {
            gross_cap_gvw.min(bridge_limit_lb)
        } else {
            gross_cap_gvw
        };
        let legal_gross_lb = gross_cap_gvw.min(gross_cap_by_axle).min(gross_cap_bridge);

        let caps = [
            PayloadCap {
                constraint: PayloadCapKind::GvwLimit,
                max_payload_lb: (gross_cap_gvw - tare_lb).max(0.0),
            },
            PayloadCap {
                constraint: PayloadCapKind::AxleGroupLimit,
                max_payload_lb: (gross_cap_by_axle - tare_lb).max(0.0),
            },
            PayloadCap {
                constraint: PayloadCapKind::BridgeFormula,
                max_payload_lb: (gross_cap_bridge - tare_lb).max(0.0),
            },
        ];
        // 平票取先评估者 (GVW → 轴组 → 桥梁)
        let mut limiting = caps[0].constraint;
        let mut lowest = caps[0].max_payload_lb;
        for cap in &caps[1..] {
            if cap.max_payload_lb < lowest {
                lowest = cap.max_payload_lb;
                limiting = cap.constraint;
            }
        }

        TruckLegalPayload {
            legal_payload_lb: (legal_gross_lb - tare_lb).max(0.0),
            limiting_constraint: limiting,
            breakdown: caps.to_vec(),
            assumptions: LegalPayloadAssumptions {
                axle_count,
                axle_span_ft: truck_config.axle_span_ft,
                weight_distribution: shares,
                tare_lb,
            },
        }
    }

    // ==========================================
    // 约束分解
    // ==========================================

    /// 单运载单元最大可装 pack 数,按运输方式展开全部适用约束
    ///
    /// 评估顺序: FLOOR_GRID → CONTAINER_PAYLOAD → CONTAINER_MGW →
    /// DRAY_LEGAL_PAYLOAD (公路) → ULD_MAX_GROSS / AIR_CHARGEABLE_WEIGHT (空运)
    /// → RAIL_GROSS_LIMIT (铁路)
    #[instrument(skip(self, pack_rule, equipment, context), fields(
        equipment_code = %equipment.equipment_code,
        mode = %equipment.mode
    ))]
    pub fn max_units_per_conveyance(
        &self,
        pack_rule: &PackagingRule,
        equipment: &Equipment,
        context: &ConstraintContext,
    ) -> PlanResult<ConveyanceFit> {
        let caps = EquipmentCapacity::try_from_equipment(equipment)?;
        require_pack_geometry(pack_rule)?;
        let pack_gross = pack_rule.pack_gross_kg();
        if pack_gross <= 0.0 {
            return Err(PlanError::pack_field_not_positive("pack_gross_kg"));
        }

        let per_layer = packs_per_layer(
            pack_rule.dim_l_m,
            pack_rule.dim_w_m,
            caps.internal_length_m,
            caps.internal_width_m,
        )?;
        let layers = layers_allowed(
            pack_rule.dim_h_m,
            caps.internal_height_m,
            pack_rule.stackable,
            pack_rule.max_stack,
        )?;

        let mut breakdown = vec![
            ConstraintEntry {
                constraint: ConstraintKind::FloorGrid,
                max_units: per_layer * layers,
                details: json!({
                    "packs_per_layer": per_layer,
                    "layers_allowed": layers,
                }),
            },
            ConstraintEntry {
                constraint: ConstraintKind::ContainerPayload,
                max_units: (caps.max_payload_kg / pack_gross).floor() as i64,
                details: json!({
                    "max_payload_kg": caps.max_payload_kg,
                    "pack_gross_kg": pack_gross,
                }),
            },
        ];

        if let Some(max_gross_kg) = equipment.max_gross_kg.filter(|v| *v > 0.0) {
            let net = (max_gross_kg - equipment.tare_kg).max(0.0);
            breakdown.push(ConstraintEntry {
                constraint: ConstraintKind::ContainerMgw,
                max_units: (net / pack_gross).floor() as i64,
                details: json!({
                    "max_gross_kg": max_gross_kg,
                    "tare_kg": equipment.tare_kg,
                }),
            });
        }

        let mut notes = Vec::new();
        if equipment.mode.is_road() || context.container_on_chassis {
            let truck_config = context.truck_config.clone().unwrap_or_default();
            let jurisdiction = context.jurisdiction_rule.clone().unwrap_or_default();
            let legal = self.compute_truck_legal_payload_lb(
                &truck_config,
                &jurisdiction,
                context.cargo_weight_distribution.as_ref(),
            );
            let legal_payload_kg = legal.legal_payload_lb / LB_PER_KG;
            breakdown.push(ConstraintEntry {
                constraint: ConstraintKind::DrayLegalPayload,
                max_units: (legal_payload_kg / pack_gross).floor() as i64,
                details: json!({
                    "legal_payload_kg": legal_payload_kg,
                    "legal": legal,
                }),
            });
            notes.push("合法载重基于假设的轴组载荷分配估算".to_string());
        }

        if equipment.mode == TransportMode::Air {
            let uld_max_gross_kg = context
                .air_uld_max_gross_kg
                .or(equipment.max_gross_kg)
                .filter(|v| *v > 0.0);
            if let Some(uld_cap) = uld_max_gross_kg {
                breakdown.push(ConstraintEntry {
                    constraint: ConstraintKind::UldMaxGross,
                    max_units: (uld_cap / pack_gross).floor() as i64,
                    details: json!({ "uld_max_gross_kg": uld_cap }),
                });
            }
            if let Some(limit) = context.air_chargeable_limit_kg.filter(|v| *v > 0.0) {
                let volumetric = pack_rule.pack_volume_m3() * equipment.volumetric_factor_or_default();
                let chargeable_pack_weight = pack_gross.max(volumetric);
                breakdown.push(ConstraintEntry {
                    constraint: ConstraintKind::AirChargeableWeight,
                    max_units: (limit / chargeable_pack_weight).floor() as i64,
                    details: json!({
                        "chargeable_limit_kg": limit,
                        "chargeable_pack_weight_kg": chargeable_pack_weight,
                    }),
                });
            }
        }

        if equipment.mode == TransportMode::Rail {
            if let Some(limit) = context.rail_max_gross_kg.filter(|v| *v > 0.0) {
                breakdown.push(ConstraintEntry {
                    constraint: ConstraintKind::RailGrossLimit,
                    max_units: (limit / pack_gross).floor() as i64,
                    details: json!({ "rail_max_gross_kg": limit }),
                });
            }
        }

        if equipment.mode == TransportMode::Ocean {
            notes.push("海运出口仍须满足 SOLAS/VGM 核重要求".to_string());
        }

        // 下限 0 后取最小,平票取先评估者
        for entry in &mut breakdown {
            entry.max_units = entry.max_units.max(0);
        }
        let mut limiting = ConstraintKind::FloorGrid;
        let mut max_units = i64::MAX;
        for entry in &breakdown {
            if entry.max_units < max_units {
                max_units = entry.max_units;
                limiting = entry.constraint;
            }
        }

        Ok(ConveyanceFit {
            max_units,
            limiting_constraint: limiting,
            breakdown,
            packs_per_layer: per_layer,
            layers_allowed: layers,
            notes,
        })
    }
}
