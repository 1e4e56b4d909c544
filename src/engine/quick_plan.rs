// ==========================================
// 货运装载规划引擎 - 快速规划编排
// ==========================================
// 职责: 单 SKU 需求 → 按方式/箱型的装载与运价对比报表
// 输入: 包装规则 + 运载单元清单 + 限制/运价快照 (全部只读)
// 输出: 逐箱型装载行 + 排除清单 (带原因) + 方式汇总
// 红线: 主数据校验失败逐行上报,不中断整张报表
// ==========================================

use crate::domain::equipment::{
    ConstraintContext, Equipment, EquipmentCapacity, JurisdictionWeightRule, TruckConfig,
};
use crate::domain::packaging::PackagingRule;
use crate::domain::rate::{RateCard, RateCharge, RateItem, ShipmentDescriptor};
use crate::domain::types::{LocationType, ServiceScope, TransportMode};
use crate::engine::constraints::{ConstraintEngine, ConstraintEntry};
use crate::engine::error::PlanResult;
use crate::engine::fit::{
    equipment_count_for_packs, required_shipped_units, utilization,
};
use crate::engine::rate::RateEngine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

// ==========================================
// 输入
// ==========================================

/// 询价航线 (城市对,选卡时先城市后港口回退)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneQuery {
    pub origin_code: String,
    pub dest_code: String,
    pub service_scope: ServiceScope,
}

/// 快速规划请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickPlanRequest {
    pub sku_id: i64,
    pub part_number: String,
    pub required_units: f64,
    pub ship_date: NaiveDate,
    pub pack_rule: PackagingRule,
    /// 仅评估这些方式;空集 = 全部
    pub requested_modes: Vec<TransportMode>,
    /// SKU 级箱型白名单/黑名单 (equipment_code → 允许);缺省允许
    pub equipment_allowed: HashMap<String, bool>,
    pub lane: Option<LaneQuery>,
    pub truck_config: Option<TruckConfig>,
    pub jurisdiction_rule: Option<JurisdictionWeightRule>,
}

// ==========================================
// 输出
// ==========================================

/// 单箱型装载与成本行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentFitRow {
    pub mode: TransportMode,
    pub equipment_code: String,
    pub equipment_name: String,
    pub packs_per_layer: i64,
    pub layers_allowed: i64,
    pub packs_fit: i64,
    pub limiting_constraint: String,
    pub constraint_breakdown: Vec<ConstraintEntry>,
    pub equipment_count: i64,
    pub pack_utilization: f64,
    pub cube_util: f64,
    pub weight_util: f64,
    pub est_cost: Option<f64>,
}

/// 被排除的箱型 (带人读原因)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedEquipment {
    pub mode: TransportMode,
    pub equipment_code: String,
    pub equipment_name: String,
    pub reason: String,
}

/// 方式级汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSummary {
    pub mode: TransportMode,
    pub cost_best: Option<f64>,
    pub equipment_best: Option<String>,
}

/// 选中运价明细 (审计用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateBreakdownRow {
    pub mode: TransportMode,
    pub equipment_code: String,
    pub rate_card_id: i64,
    pub cost: f64,
    pub items: Vec<RateItem>,
}

/// 快速规划结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickPlanResult {
    pub sku_id: i64,
    pub part_number: String,
    pub required_units: f64,
    pub packs_required: i64,
    pub shipped_units: f64,
    pub excess_units: f64,
    pub equipment: Vec<EquipmentFitRow>,
    pub excluded_equipment: Vec<ExcludedEquipment>,
    pub mode_summary: Vec<ModeSummary>,
    pub rate_breakdown: Vec<RateBreakdownRow>,
    /// 去重后的约束提示 (估算口径、核重要求等)
    pub warnings: Vec<String>,
}

// ==========================================
// QuickPlanner - 快速规划编排器
// ==========================================
pub struct QuickPlanner {
    constraints: ConstraintEngine,
    rates: RateEngine,
}

impl Default for QuickPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl QuickPlanner {
    pub fn new() -> Self {
        Self {
            constraints: ConstraintEngine::new(),
            rates: RateEngine::new(),
        }
    }

    /// 生成逐箱型装载/成本对比报表
    ///
    /// 单箱型失败 (限制/主数据缺陷) 记入排除清单后继续;
    /// 需求量换算失败 (包装规则坏) 为前置条件,整个报表失败
    #[instrument(skip(self, request, equipment_list, rate_cards, rate_charges), fields(
        sku_id = request.sku_id,
        equipment_count = equipment_list.len()
    ))]
    pub fn plan(
        &self,
        request: &QuickPlanRequest,
        equipment_list: &[Equipment],
        rate_cards: &[RateCard],
        rate_charges: &[RateCharge],
    ) -> PlanResult<QuickPlanResult> {
        let qty = required_shipped_units(request.required_units, &request.pack_rule)?;
        let pack_volume = request.pack_rule.pack_volume_m3();
        let pack_gross = request.pack_rule.pack_gross_kg();
        let shipped_weight = qty.packs as f64 * pack_gross;
        let shipped_volume = qty.packs as f64 * pack_volume;

        let mut rows = Vec::new();
        let mut excluded = Vec::new();
        let mut rate_breakdown = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut rollup: BTreeMap<String, ModeSummary> = BTreeMap::new();

        for eq in equipment_list.iter().filter(|eq| eq.active) {
            if !request.requested_modes.is_empty() && !request.requested_modes.contains(&eq.mode) {
                continue;
            }
            if !request
                .equipment_allowed
                .get(&eq.equipment_code)
                .copied()
                .unwrap_or(true)
            {
                excluded.push(ExcludedEquipment {
                    mode: eq.mode,
                    equipment_code: eq.equipment_code.clone(),
                    equipment_name: eq.name.clone(),
                    reason: "SKU 运载限制不允许该箱型".to_string(),
                });
                continue;
            }

            if eq.mode.is_road() && request.truck_config.is_none() {
                let note = "缺少卡车配置,按保守默认 5AXLE_TL 假设估算合法载重".to_string();
                if !warnings.contains(&note) {
                    warnings.push(note);
                }
            }

            let context = ConstraintContext {
                container_on_chassis: eq.mode.is_road(),
                truck_config: request.truck_config.clone(),
                jurisdiction_rule: request.jurisdiction_rule.clone(),
                ..Default::default()
            };
            let fit = match self
                .constraints
                .max_units_per_conveyance(&request.pack_rule, eq, &context)
            {
                Ok(fit) => fit,
                Err(err) => {
                    // 逐行上报: 单箱型的主数据缺陷不拖垮整张报表
                    excluded.push(ExcludedEquipment {
                        mode: eq.mode,
                        equipment_code: eq.equipment_code.clone(),
                        equipment_name: eq.name.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            for note in &fit.notes {
                if !warnings.contains(note) {
                    warnings.push(note.clone());
                }
            }

            let caps = match EquipmentCapacity::try_from_equipment(eq) {
                Ok(caps) => caps,
                Err(err) => {
                    excluded.push(ExcludedEquipment {
                        mode: eq.mode,
                        equipment_code: eq.equipment_code.clone(),
                        equipment_name: eq.name.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let equipment_count = equipment_count_for_packs(qty.packs, fit.max_units);
            let util = utilization(
                qty.packs,
                fit.max_units,
                equipment_count,
                pack_volume,
                pack_gross,
                caps.volume_m3,
                caps.max_payload_kg,
            );

            let est_cost = request.lane.as_ref().and_then(|lane| {
                self.best_lane_quote(
                    lane,
                    request.ship_date,
                    eq,
                    equipment_count,
                    shipped_weight,
                    shipped_volume,
                    rate_cards,
                    rate_charges,
                )
            });
            if let Some((card_id, cost, items)) = &est_cost {
                rate_breakdown.push(RateBreakdownRow {
                    mode: eq.mode,
                    equipment_code: eq.equipment_code.clone(),
                    rate_card_id: *card_id,
                    cost: *cost,
                    items: items.clone(),
                });
            }
            let est_cost = est_cost.map(|(_, cost, _)| cost);

            let summary = rollup.entry(eq.mode.to_string()).or_insert(ModeSummary {
                mode: eq.mode,
                cost_best: None,
                equipment_best: None,
            });
            if let Some(cost) = est_cost {
                if summary.cost_best.map_or(true, |best| cost < best) {
                    summary.cost_best = Some(cost);
                    summary.equipment_best = Some(eq.equipment_code.clone());
                }
            }

            rows.push(EquipmentFitRow {
                mode: eq.mode,
                equipment_code: eq.equipment_code.clone(),
                equipment_name: eq.name.clone(),
                packs_per_layer: fit.packs_per_layer,
                layers_allowed: fit.layers_allowed,
                packs_fit: fit.max_units,
                limiting_constraint: fit.limiting_constraint.to_string(),
                constraint_breakdown: fit.breakdown,
                equipment_count,
                pack_utilization: util.pack_utilization,
                cube_util: util.cube_util,
                weight_util: util.weight_util,
                est_cost,
            });
        }

        // 稳定输出顺序: 方式 → 所需数量 → 箱型代码
        rows.sort_by(|a, b| {
            a.mode
                .to_string()
                .cmp(&b.mode.to_string())
                .then(a.equipment_count.cmp(&b.equipment_count))
                .then_with(|| a.equipment_code.cmp(&b.equipment_code))
        });
        excluded.sort_by(|a, b| {
            a.mode
                .to_string()
                .cmp(&b.mode.to_string())
                .then_with(|| a.equipment_code.cmp(&b.equipment_code))
        });

        Ok(QuickPlanResult {
            sku_id: request.sku_id,
            part_number: request.part_number.clone(),
            required_units: request.required_units,
            packs_required: qty.packs,
            shipped_units: qty.shipped_units,
            excess_units: qty.excess_units,
            equipment: rows,
            excluded_equipment: excluded,
            mode_summary: rollup.into_values().collect(),
            rate_breakdown,
            warnings,
        })
    }

    /// 航线报价: 先按城市对选卡,再回退港口对,取总价更低者
    #[allow(clippy::too_many_arguments)]
    fn best_lane_quote(
        &self,
        lane: &LaneQuery,
        ship_date: NaiveDate,
        eq: &Equipment,
        equipment_count: i64,
        shipped_weight: f64,
        shipped_volume: f64,
        rate_cards: &[RateCard],
        rate_charges: &[RateCharge],
    ) -> Option<(i64, f64, Vec<RateItem>)> {
        let mut best: Option<(i64, f64, Vec<RateItem>)> = None;
        for location_type in [LocationType::City, LocationType::Port] {
            let shipment = ShipmentDescriptor {
                ship_date,
                mode: eq.mode,
                equipment: eq.equipment_code.clone(),
                service_scope: lane.service_scope,
                origin_type: location_type,
                origin_code: lane.origin_code.clone(),
                dest_type: location_type,
                dest_code: lane.dest_code.clone(),
                carrier_id: None,
                reefer: false,
                flatrack: false,
                over_height: false,
                over_width: false,
                over_height_width: false,
                dg: false,
                weight_kg: shipped_weight,
                volume_m3: shipped_volume,
                miles: None,
                containers_count: Some(equipment_count as f64),
                chargeable_weight_kg: Some(shipped_weight),
            };
            let Some(card) = self.rates.select_best_rate_card(rate_cards, &shipment) else {
                continue;
            };
            let quote = self.rates.compute_rate_total(card, rate_charges, &shipment);
            if best.as_ref().map_or(true, |(_, cost, _)| quote.grand_total < *cost) {
                best = Some((card.id, quote.grand_total, quote.items));
            }
        }
        best
    }
}
