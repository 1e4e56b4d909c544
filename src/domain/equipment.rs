// ==========================================
// 货运装载规划引擎 - 运载单元领域模型
// ==========================================
// 集装箱/挂车/航空集装器/铁路车皮的静态参数,
// 以及公路合法载重计算所需的车辆配置与法规限重
// ==========================================

use crate::domain::types::TransportMode;
use crate::engine::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};

/// 空运体积重换算系数缺省值 (kg/m³)
pub const DEFAULT_VOLUMETRIC_FACTOR: f64 = 167.0;

// ==========================================
// Equipment - 运载单元预设
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub equipment_code: String, // 如 40DV / 53DRY / LD3
    pub name: String,
    pub mode: TransportMode,

    // ===== 内部净尺寸 (米) =====
    pub internal_length_m: f64,
    pub internal_width_m: f64,
    pub internal_height_m: f64,

    // ===== 重量参数 (kg) =====
    pub max_payload_kg: f64,
    pub max_gross_kg: Option<f64>, // 最大总重 (含皮重)
    pub tare_kg: f64,

    // ===== 空运参数 =====
    pub volumetric_factor: Option<f64>, // 缺省 167 kg/m³

    pub active: bool,
}

impl Equipment {
    /// 体积重换算系数 (空运计费重)
    pub fn volumetric_factor_or_default(&self) -> f64 {
        match self.volumetric_factor {
            Some(f) if f > 0.0 => f,
            _ => DEFAULT_VOLUMETRIC_FACTOR,
        }
    }
}

// ==========================================
// EquipmentCapacity - 校验后的容量视图
// ==========================================
// 红线: 主数据缺陷在此处立即暴露,不允许静默产生零容量结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentCapacity {
    pub internal_length_m: f64,
    pub internal_width_m: f64,
    pub internal_height_m: f64,
    pub volume_m3: f64,
    pub max_payload_kg: f64,
}

impl EquipmentCapacity {
    /// 从运载单元预设构建,任一维度或载重非正即报错
    pub fn try_from_equipment(equipment: &Equipment) -> PlanResult<Self> {
        let check = |value: f64, field: &str| -> PlanResult<f64> {
            if value <= 0.0 {
                return Err(PlanError::InvalidEquipmentCapacity {
                    equipment: equipment.equipment_code.clone(),
                    field: field.to_string(),
                });
            }
            Ok(value)
        };
        let length_m = check(equipment.internal_length_m, "internal_length_m")?;
        let width_m = check(equipment.internal_width_m, "internal_width_m")?;
        let height_m = check(equipment.internal_height_m, "internal_height_m")?;
        let max_payload_kg = check(equipment.max_payload_kg, "max_payload_kg")?;
        Ok(Self {
            internal_length_m: length_m,
            internal_width_m: width_m,
            internal_height_m: height_m,
            volume_m3: length_m * width_m * height_m,
            max_payload_kg,
        })
    }

    /// 地板面积 (平方米)
    pub fn floor_m2(&self) -> f64 {
        self.internal_length_m * self.internal_width_m
    }
}

// ==========================================
// TruckConfig - 车辆配置
// ==========================================
// Default = 5AXLE_TL (北美五轴牵引挂车的保守假设)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckConfig {
    pub truck_config_code: String,

    // ===== 轴数 =====
    pub steer_axles: i32,
    pub drive_axles: i32,
    pub trailer_axles: i32,
    pub axle_span_ft: f64, // 前后最外轴距 (英尺)

    // ===== 皮重 (磅) =====
    pub tractor_tare_lb: f64,
    pub trailer_tare_lb: f64,
    pub container_tare_lb: f64,

    pub max_gvw_lb: f64,

    // ===== 载荷分配比例 (自动归一化) =====
    pub steer_weight_share_pct: f64,
    pub drive_weight_share_pct: f64,
    pub trailer_weight_share_pct: f64,
}

impl TruckConfig {
    /// 总轴数
    pub fn axle_count(&self) -> i32 {
        self.steer_axles + self.drive_axles + self.trailer_axles
    }

    /// 整车皮重 (磅)
    pub fn tare_lb(&self) -> f64 {
        self.tractor_tare_lb + self.trailer_tare_lb + self.container_tare_lb
    }
}

impl Default for TruckConfig {
    fn default() -> Self {
        Self {
            truck_config_code: "5AXLE_TL".to_string(),
            steer_axles: 1,
            drive_axles: 2,
            trailer_axles: 2,
            axle_span_ft: 51.0,
            tractor_tare_lb: 18000.0,
            trailer_tare_lb: 8000.0,
            container_tare_lb: 0.0,
            max_gvw_lb: 80000.0,
            steer_weight_share_pct: 0.12,
            drive_weight_share_pct: 0.44,
            trailer_weight_share_pct: 0.44,
        }
    }
}

// ==========================================
// JurisdictionWeightRule - 法规限重
// ==========================================
// Default = US_FED_INTERSTATE (美国联邦州际公路)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JurisdictionWeightRule {
    pub jurisdiction_code: String,
    pub max_gvw_lb: f64,
    pub max_single_axle_lb: f64,
    pub max_tandem_lb: f64,
}

impl Default for JurisdictionWeightRule {
    fn default() -> Self {
        Self {
            jurisdiction_code: "US_FED_INTERSTATE".to_string(),
            max_gvw_lb: 80000.0,
            max_single_axle_lb: 20000.0,
            max_tandem_lb: 34000.0,
        }
    }
}

// ==========================================
// WeightDistribution - 货载轴组分配模型
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightDistribution {
    pub steer_pct: f64,
    pub drive_pct: f64,
    pub trailer_pct: f64,
}

impl WeightDistribution {
    /// 归一化到和为 1.0 (零和输入退回缺省分配)
    pub fn normalized(&self) -> Self {
        let total = self.steer_pct + self.drive_pct + self.trailer_pct;
        if total.abs() < 1e-9 {
            return Self::default();
        }
        Self {
            steer_pct: self.steer_pct / total,
            drive_pct: self.drive_pct / total,
            trailer_pct: self.trailer_pct / total,
        }
    }
}

impl Default for WeightDistribution {
    fn default() -> Self {
        Self {
            steer_pct: 0.12,
            drive_pct: 0.44,
            trailer_pct: 0.44,
        }
    }
}

impl From<&TruckConfig> for WeightDistribution {
    fn from(config: &TruckConfig) -> Self {
        Self {
            steer_pct: config.steer_weight_share_pct,
            drive_pct: config.drive_weight_share_pct,
            trailer_pct: config.trailer_weight_share_pct,
        }
    }
}

// ==========================================
// ConstraintContext - 约束评估上下文
// ==========================================
// 每次规划调用由调用方组装,引擎只读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintContext {
    /// 集装箱上底盘 (即使 mode 非 TRUCK/DRAY 也按公路载重评估)
    pub container_on_chassis: bool,
    pub truck_config: Option<TruckConfig>,
    pub jurisdiction_rule: Option<JurisdictionWeightRule>,
    pub cargo_weight_distribution: Option<WeightDistribution>,

    // ===== 空运上限 (kg) =====
    pub air_uld_max_gross_kg: Option<f64>,
    pub air_chargeable_limit_kg: Option<f64>,

    // ===== 铁路上限 (kg) =====
    pub rail_max_gross_kg: Option<f64>,
}
