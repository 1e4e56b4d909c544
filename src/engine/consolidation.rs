// ==========================================
// 货运装载规划引擎 - 批量拼装引擎
// ==========================================
// 职责: 多 SKU 需求 → 最少运载单元数
// NO_MIX: 每 SKU 独占运载单元,首个不可装 SKU 即整批失败
// MIX_OK: First-Fit Decreasing 启发式 (NP 难装箱问题的标准近似)
// 红线: 排序稳定 + 车位按开箱顺序扫描,结果必须可复现
// ==========================================

use crate::domain::consolidation::{
    ConsolidationRequirement, ContainerPlan, ContainerPlanRow, SkuConversion, TruckLoad, TruckPlan,
};
use crate::domain::equipment::{Equipment, EquipmentCapacity};
use crate::domain::packaging::PackagingRule;
use crate::domain::types::LoadPolicy;
use crate::engine::error::{PlanError, PlanResult};
use crate::engine::fit::{packs_per_equipment, required_packs_for_kg};
use std::collections::BTreeMap;
use tracing::instrument;


/// 容量比较容差 (浮点累减误差)
const CAPACITY_EPSILON: f64 = 1e-9;

// ==========================================
// TruckBin - 拼装过程中的临时车位
// ==========================================
// 仅在单次规划调用内创建/修改/丢弃,不持久化
#[derive(Debug)]
struct TruckBin {
    truck_id: i64,
    remaining_payload_kg: f64,
    remaining_volume_m3: f64,
    remaining_floor_m2: f64,
    used_weight_kg: f64,
    used_volume_m3: f64,
    contents: BTreeMap<i64, i64>,
}

/// 待放置的单个 pack
#[derive(Debug, Clone)]
struct PackItem {
    sku_id: i64,
    weight_kg: f64,
    volume_m3: f64,
    floor_m2: f64,
}

impl TruckBin {
    fn new(truck_id: i64, payload_kg: f64, volume_m3: f64, floor_m2: f64) -> Self {
        Self {
            truck_id,
            remaining_payload_kg: payload_kg,
            remaining_volume_m3: volume_m3,
            remaining_floor_m2: floor_m2,
            used_weight_kg: 0.0,
            used_volume_m3: 0.0,
            contents: BTreeMap::new(),
        }
    }

    fn can_fit(&self, item: &PackItem, use_floor_area: bool) -> bool {
        if self.remaining_payload_kg + CAPACITY_EPSILON < item.weight_kg {
            return false;
        }
        if self.remaining_volume_m3 + CAPACITY_EPSILON < item.volume_m3 {
            return false;
        }
        if use_floor_area && self.remaining_floor_m2 + CAPACITY_EPSILON < item.floor_m2 {
            return false;
        }
        true
    }

    fn add(&mut self, item: &PackItem, use_floor_area: bool) {
        self.remaining_payload_kg -= item.weight_kg;
        self.remaining_volume_m3 -= item.volume_m3;
        self.used_weight_kg += item.weight_kg;
        self.used_volume_m3 += item.volume_m3;
        if use_floor_area {
            self.remaining_floor_m2 -= item.floor_m2;
        }
        *self.contents.entry(item.sku_id).or_insert(0) += 1;
    }

    fn into_load(self) -> TruckLoad {
        TruckLoad {
            truck_id: self.truck_id,
            sku_breakdown: self.contents,
            total_weight_kg: self.used_weight_kg,
            total_volume_m3: self.used_volume_m3,
        }
    }
}

// ==========================================
// BatchPlanner - 批量拼装引擎
// ==========================================
pub struct BatchPlanner {
    // 无状态引擎,全部参考数据由调用方传入
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchPlanner {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // NO_MIX 容器计划
    // ==========================================

    /// 每 SKU 独立计算所需容器数
    ///
    /// 任一 SKU 不可装即整批失败 (InfeasiblePacking);
    /// 利用率按 containers_needed × 单箱容量 计算
    #[instrument(skip(self, requirements, container), fields(
        equipment_code = %container.equipment_code,
        sku_count = requirements.len()
    ))]
    pub fn plan_containers_no_mix(
        &self,
        requirements: &[ConsolidationRequirement],
        container: &Equipment,
    ) -> PlanResult<ContainerPlan> {
        let caps = EquipmentCapacity::try_from_equipment(container)?;
        let mut per_sku = Vec::with_capacity(requirements.len());
        let mut total_containers = 0i64;

        for req in requirements {
            let conversion = required_packs_for_kg(req.required_kg, &req.pack_rule)?;
            let fit = packs_per_equipment(&req.pack_rule, container)?;
            if fit.packs_fit <= 0 {
                return Err(PlanError::InfeasiblePacking {
                    sku_id: req.sku_id,
                    equipment_code: container.equipment_code.clone(),
                });
            }
            let containers_needed =
                (conversion.packs_required + fit.packs_fit - 1) / fit.packs_fit;

            let used_weight = conversion.packs_required as f64 * req.pack_rule.pack_gross_kg();
            let used_volume = conversion.packs_required as f64 * req.pack_rule.pack_volume_m3();
            let cap_weight = containers_needed as f64 * caps.max_payload_kg;
            let cap_volume = containers_needed as f64 * caps.volume_m3;

            per_sku.push(ContainerPlanRow {
                sku_id: req.sku_id,
                part_number: req.part_number.clone(),
                conversion,
                equipment_code: container.equipment_code.clone(),
                packs_fit: fit.packs_fit,
                containers_needed,
                limiting_constraint: fit.limiting_constraint,
                cube_util: if cap_volume > 0.0 { used_volume / cap_volume } else { 0.0 },
                weight_util: if cap_weight > 0.0 { used_weight / cap_weight } else { 0.0 },
            });
            total_containers += containers_needed;
        }

        Ok(ContainerPlan {
            policy: LoadPolicy::NoMix,
            per_sku,
            total_conveyance_count: total_containers,
        })
    }

    // ==========================================
    // NO_MIX 卡车计划
    // ==========================================

    /// 每 SKU 独占车辆,逐车输出装载清单 (混装对比基线)
    #[instrument(skip(self, requirements, truck), fields(
        equipment_code = %truck.equipment_code,
        sku_count = requirements.len()
    ))]
    pub fn plan_trucks_no_mix(
        &self,
        requirements: &[ConsolidationRequirement],
        truck: &Equipment,
    ) -> PlanResult<TruckPlan> {
        let caps = EquipmentCapacity::try_from_equipment(truck)?;
        let mut trucks = Vec::new();
        let mut conversions = Vec::with_capacity(requirements.len());
        let mut truck_id = 1i64;
        let mut total_weight = 0.0;
        let mut total_volume = 0.0;

        for req in requirements {
            let conversion = required_packs_for_kg(req.required_kg, &req.pack_rule)?;
            let fit = packs_per_equipment(&req.pack_rule, truck)?;
            if fit.packs_fit <= 0 {
                return Err(PlanError::InfeasiblePacking {
                    sku_id: req.sku_id,
                    equipment_code: truck.equipment_code.clone(),
                });
            }
            let pack_weight = req.pack_rule.pack_gross_kg();
            let pack_volume = req.pack_rule.pack_volume_m3();
            let mut remaining = conversion.packs_required;
            while remaining > 0 {
                let take = remaining.min(fit.packs_fit);
                let weight = take as f64 * pack_weight;
                let volume = take as f64 * pack_volume;
                total_weight += weight;
                total_volume += volume;
                let mut breakdown = BTreeMap::new();
                breakdown.insert(req.sku_id, take);
                trucks.push(TruckLoad {
                    truck_id,
                    sku_breakdown: breakdown,
                    total_weight_kg: weight,
                    total_volume_m3: volume,
                });
                truck_id += 1;
                remaining -= take;
            }
            conversions.push(SkuConversion {
                sku_id: req.sku_id,
                part_number: req.part_number.clone(),
                conversion,
            });
        }

        let truck_count = trucks.len() as i64;
        Ok(TruckPlan {
            policy: LoadPolicy::NoMix,
            per_sku_conversion: conversions,
            truck_count,
            weight_util: capacity_util(total_weight, truck_count, caps.max_payload_kg),
            volume_util: capacity_util(total_volume, truck_count, caps.volume_m3),
            trucks,
            no_mix_baseline_truck_count: truck_count,
        })
    }

    // ==========================================
    // MIX_OK 卡车计划 (FFD)
    // ==========================================

    /// 多 SKU 混装,First-Fit Decreasing:
    /// 1) 每 SKU 需求展开为单 pack 条目 (体积/重量/等效占地)
    /// 2) 按体积稳定降序排序 (平票保持输入顺序)
    /// 3) 按开箱顺序扫描已有车位,放入首个可容纳者,否则开新车
    ///
    /// 性质: 混装车数 ≤ NO_MIX 基线车数
    #[instrument(skip(self, requirements, truck), fields(
        equipment_code = %truck.equipment_code,
        sku_count = requirements.len(),
        allow_stacking_in_trucks,
        use_floor_area
    ))]
    pub fn plan_trucks_mix_ok(
        &self,
        requirements: &[ConsolidationRequirement],
        truck: &Equipment,
        allow_stacking_in_trucks: bool,
        use_floor_area: bool,
    ) -> PlanResult<TruckPlan> {
        let caps = EquipmentCapacity::try_from_equipment(truck)?;
        let truck_floor = caps.floor_m2();

        let mut items: Vec<PackItem> = Vec::new();
        let mut conversions = Vec::with_capacity(requirements.len());
        let mut no_mix_baseline = 0i64;

        for req in requirements {
            let conversion = required_packs_for_kg(req.required_kg, &req.pack_rule)?;
            let packs_required = conversion.packs_required;
            conversions.push(SkuConversion {
                sku_id: req.sku_id,
                part_number: req.part_number.clone(),
                conversion,
            });

            let fit_alone = packs_per_equipment(&req.pack_rule, truck)?;
            if fit_alone.packs_fit <= 0 {
                return Err(PlanError::InfeasiblePacking {
                    sku_id: req.sku_id,
                    equipment_code: truck.equipment_code.clone(),
                });
            }
            no_mix_baseline += (packs_required + fit_alone.packs_fit - 1) / fit_alone.packs_fit;

            let layers = truck_layers(&req.pack_rule, caps.internal_height_m, allow_stacking_in_trucks);
            let item = PackItem {
                sku_id: req.sku_id,
                weight_kg: req.pack_rule.pack_gross_kg(),
                volume_m3: req.pack_rule.pack_volume_m3(),
                floor_m2: req.pack_rule.footprint_m2() / layers as f64,
            };
            items.extend(std::iter::repeat(item).take(packs_required as usize));
        }

        // 稳定降序: sort_by 保持相等体积条目的输入顺序
        items.sort_by(|a, b| b.volume_m3.total_cmp(&a.volume_m3));

        let mut bins: Vec<TruckBin> = Vec::new();
        for item in &items {
            let target = bins.iter_mut().find(|bin| bin.can_fit(item, use_floor_area));
            match target {
                Some(bin) => bin.add(item, use_floor_area),
                None => {
                    let mut bin = TruckBin::new(
                        bins.len() as i64 + 1,
                        caps.max_payload_kg,
                        caps.volume_m3,
                        truck_floor,
                    );
                    if !bin.can_fit(item, use_floor_area) {
                        return Err(PlanError::ItemExceedsEmptyBin { sku_id: item.sku_id });
                    }
                    bin.add(item, use_floor_area);
                    bins.push(bin);
                }
            }
        }

        let truck_count = bins.len() as i64;
        let total_weight: f64 = bins.iter().map(|b| b.used_weight_kg).sum();
        let total_volume: f64 = bins.iter().map(|b| b.used_volume_m3).sum();
        Ok(TruckPlan {
            policy: LoadPolicy::MixOk,
            per_sku_conversion: conversions,
            truck_count,
            weight_util: capacity_util(total_weight, truck_count, caps.max_payload_kg),
            volume_util: capacity_util(total_volume, truck_count, caps.volume_m3),
            trucks: bins.into_iter().map(TruckBin::into_load).collect(),
            no_mix_baseline_truck_count: no_mix_baseline,
        })
    }
}

// ==========================================
// 内部辅助
// ==========================================

/// 等效占地层数: 全局禁堆/不可堆叠/高度缺失均按单层
fn truck_layers(rule: &PackagingRule, eq_h: f64, allow_stacking_in_trucks: bool) -> i64 {
    if !allow_stacking_in_trucks || !rule.stackable || rule.dim_h_m <= 0.0 {
        return 1;
    }
    let mut layers = (eq_h / rule.dim_h_m).floor() as i64;
    if let Some(cap) = rule.max_stack {
        layers = layers.min(cap);
    }
    layers.max(1)
}

/// 总量 ÷ (车数 × 单车容量),车数或容量为零时记 0
fn capacity_util(total: f64, count: i64, per_unit: f64) -> f64 {
    if count > 0 && per_unit > 0.0 {
        total / (count as f64 * per_unit)
    } else {
        0.0
    }
}
