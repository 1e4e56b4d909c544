// ==========================================
// 货运装载规划引擎 - 运价领域模型
// ==========================================
// 运价卡带生效日期区间,同一航线允许多行并存,
// 由 RateEngine 按精确度/优先级/生效日裁决
// ==========================================

use crate::domain::types::{
    AppliesWhen, ChargeCalcMethod, LocationType, ServiceScope, TransportMode, UomPricing,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// RateCard - 运价卡
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCard {
    pub id: i64,
    pub carrier_id: Option<i64>,

    // ===== 航线匹配键 =====
    pub mode: TransportMode,
    pub equipment: String, // 运载单元代码
    pub service_scope: ServiceScope,
    pub origin_type: LocationType,
    pub origin_code: String,
    pub dest_type: LocationType,
    pub dest_code: String,

    // ===== 计价 =====
    pub currency: String,
    pub uom_pricing: UomPricing,
    pub base_rate: f64,
    pub min_charge: Option<f64>,

    // ===== 生效区间 =====
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>, // None = 开放式
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,

    pub is_active: bool,
    pub priority: i32,
}

impl RateCard {
    /// 精确度得分 = 起运地权重 + 目的地权重 (港口4 > 城市3 > 区域2 > 国家1)
    pub fn specificity_score(&self) -> i32 {
        self.origin_type.specificity_weight() + self.dest_type.specificity_weight()
    }

    /// 发运日是否落在生效区间与合同区间内
    pub fn is_date_valid(&self, ship_date: NaiveDate) -> bool {
        if ship_date < self.effective_from {
            return false;
        }
        if let Some(end) = self.effective_to {
            if ship_date > end {
                return false;
            }
        }
        if let Some(start) = self.contract_start {
            if ship_date < start {
                return false;
            }
        }
        if let Some(end) = self.contract_end {
            if ship_date > end {
                return false;
            }
        }
        true
    }
}

// ==========================================
// RateCharge - 附加费
// ==========================================
// 隶属于某一张运价卡,可单独带生效区间
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCharge {
    pub rate_card_id: i64,
    pub charge_code: String,
    pub charge_name: String,
    pub calc_method: ChargeCalcMethod,
    pub amount: f64,
    pub applies_when: AppliesWhen,

    // ===== 金额边界 =====
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,

    pub effective_from: Option<NaiveDate>,
    pub effective_to: Option<NaiveDate>,
}

impl RateCharge {
    /// 发运日是否落在附加费生效区间内 (缺省开放)
    pub fn is_date_valid(&self, ship_date: NaiveDate) -> bool {
        if let Some(start) = self.effective_from {
            if ship_date < start {
                return false;
            }
        }
        if let Some(end) = self.effective_to {
            if ship_date > end {
                return false;
            }
        }
        true
    }
}

// ==========================================
// ShipmentDescriptor - 询价货件描述
// ==========================================
// 每次询价新建,构造后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentDescriptor {
    pub ship_date: NaiveDate,
    pub mode: TransportMode,
    pub equipment: String,
    pub service_scope: ServiceScope,
    pub origin_type: LocationType,
    pub origin_code: String,
    pub dest_type: LocationType,
    pub dest_code: String,
    pub carrier_id: Option<i64>,

    // ===== 货件属性标志 =====
    pub reefer: bool,
    pub flatrack: bool,
    pub over_height: bool,
    pub over_width: bool,
    pub over_height_width: bool,
    pub dg: bool,

    // ===== 计价量 =====
    pub weight_kg: f64,
    pub volume_m3: f64,
    pub miles: Option<f64>,
    pub containers_count: Option<f64>,
    pub chargeable_weight_kg: Option<f64>,
}

impl ShipmentDescriptor {
    /// 计费重: 指定则取指定值,否则回退实际重量
    pub fn billable_weight_kg(&self) -> f64 {
        self.chargeable_weight_kg.unwrap_or(self.weight_kg)
    }
}

impl AppliesWhen {
    /// 附加费条件是否命中货件属性
    pub fn applies(&self, shipment: &ShipmentDescriptor) -> bool {
        match self {
            AppliesWhen::Always => true,
            AppliesWhen::FrOnly => shipment.flatrack,
            AppliesWhen::ReeferOnly => shipment.reefer,
            AppliesWhen::OhOnly => shipment.over_height,
            AppliesWhen::OwOnly => shipment.over_width,
            AppliesWhen::OhwOnly => shipment.over_height_width,
            AppliesWhen::DgOnly => shipment.dg,
        }
    }
}

// ==========================================
// 报价输出
// ==========================================

/// 报价明细行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateItemType {
    Base,
    Accessorial,
}

/// 报价明细行 (用于展示与审计)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateItem {
    pub item_type: RateItemType,
    pub code: String,
    pub name: String,
    pub amount: f64,
}

/// 完整报价
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateQuote {
    pub currency: String,
    pub base_total: f64,
    pub charges_total: f64,
    pub grand_total: f64,
    pub items: Vec<RateItem>,
}
