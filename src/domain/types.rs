// ==========================================
// 货运装载规划引擎 - 领域类型定义
// ==========================================
// 运输方式/服务范围/地点类型/计价方式等枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与主数据编码一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 运输方式 (Transport Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Truck, // 整车/卡车
    Ocean, // 海运
    Air,   // 空运
    Rail,  // 铁路
    Dray,  // 集卡短驳 (集装箱上底盘)
}

impl TransportMode {
    /// 该方式是否受公路合法载重约束 (整车与短驳)
    pub fn is_road(&self) -> bool {
        matches!(self, TransportMode::Truck | TransportMode::Dray)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Truck => write!(f, "TRUCK"),
            TransportMode::Ocean => write!(f, "OCEAN"),
            TransportMode::Air => write!(f, "AIR"),
            TransportMode::Rail => write!(f, "RAIL"),
            TransportMode::Dray => write!(f, "DRAY"),
        }
    }
}

// ==========================================
// 服务范围 (Service Scope)
// ==========================================
// P=港口(Port), D=门点(Door)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceScope {
    P2p, // 港到港
    P2d, // 港到门
    D2p, // 门到港
    D2d, // 门到门
}

impl fmt::Display for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceScope::P2p => write!(f, "P2P"),
            ServiceScope::P2d => write!(f, "P2D"),
            ServiceScope::D2p => write!(f, "D2P"),
            ServiceScope::D2d => write!(f, "D2D"),
        }
    }
}

// ==========================================
// 地点类型 (Location Type)
// ==========================================
// 运价卡匹配时的精确度权重: 港口 > 城市 > 区域 > 国家
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Port,
    City,
    Region,
    Country,
}

impl LocationType {
    /// 精确度权重，用于运价卡平票裁决
    pub fn specificity_weight(&self) -> i32 {
        match self {
            LocationType::Port => 4,
            LocationType::City => 3,
            LocationType::Region => 2,
            LocationType::Country => 1,
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationType::Port => write!(f, "PORT"),
            LocationType::City => write!(f, "CITY"),
            LocationType::Region => write!(f, "REGION"),
            LocationType::Country => write!(f, "COUNTRY"),
        }
    }
}

// ==========================================
// 基础运价计价单位 (UOM Pricing)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UomPricing {
    Flat,            // 一口价
    PerContainer,    // 按箱
    PerKg,           // 按公斤
    PerChargeableKg, // 按计费重
    PerCbm,          // 按立方
    PerMile,         // 按英里
}

impl fmt::Display for UomPricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UomPricing::Flat => write!(f, "FLAT"),
            UomPricing::PerContainer => write!(f, "PER_CONTAINER"),
            UomPricing::PerKg => write!(f, "PER_KG"),
            UomPricing::PerChargeableKg => write!(f, "PER_CHARGEABLE_KG"),
            UomPricing::PerCbm => write!(f, "PER_CBM"),
            UomPricing::PerMile => write!(f, "PER_MILE"),
        }
    }
}

// ==========================================
// 附加费计算方法 (Charge Calc Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeCalcMethod {
    Flat,
    PerContainer,
    PerKg,
    PerCbm,
    PerMile,
    PercentOfBase, // 按基础运费百分比
}

impl fmt::Display for ChargeCalcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeCalcMethod::Flat => write!(f, "FLAT"),
            ChargeCalcMethod::PerContainer => write!(f, "PER_CONTAINER"),
            ChargeCalcMethod::PerKg => write!(f, "PER_KG"),
            ChargeCalcMethod::PerCbm => write!(f, "PER_CBM"),
            ChargeCalcMethod::PerMile => write!(f, "PER_MILE"),
            ChargeCalcMethod::PercentOfBase => write!(f, "PERCENT_OF_BASE"),
        }
    }
}

// ==========================================
// 附加费适用条件 (Applies When)
// ==========================================
// 红线: 条件不满足的附加费直接排除,不计 0 元行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppliesWhen {
    Always,
    FrOnly,     // 仅框架箱
    ReeferOnly, // 仅冷藏
    OhOnly,     // 仅超高
    OwOnly,     // 仅超宽
    OhwOnly,    // 仅超高且超宽
    DgOnly,     // 仅危险品
}

impl fmt::Display for AppliesWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliesWhen::Always => write!(f, "ALWAYS"),
            AppliesWhen::FrOnly => write!(f, "FR_ONLY"),
            AppliesWhen::ReeferOnly => write!(f, "REEFER_ONLY"),
            AppliesWhen::OhOnly => write!(f, "OH_ONLY"),
            AppliesWhen::OwOnly => write!(f, "OW_ONLY"),
            AppliesWhen::OhwOnly => write!(f, "OHW_ONLY"),
            AppliesWhen::DgOnly => write!(f, "DG_ONLY"),
        }
    }
}

// ==========================================
// 装载策略 (Load Policy)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadPolicy {
    NoMix, // 单一 SKU 独占运载单元
    MixOk, // 允许多 SKU 拼装
}

impl fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPolicy::NoMix => write!(f, "NO_MIX"),
            LoadPolicy::MixOk => write!(f, "MIX_OK"),
        }
    }
}

// ==========================================
// 约束名称 (Constraint Kind)
// ==========================================
// max_units_per_conveyance 输出的命名约束,按评估顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    FloorGrid,          // 地板网格 × 层数
    ContainerPayload,   // 箱体额定载重
    ContainerMgw,       // 箱体最大总重 - 皮重
    DrayLegalPayload,   // 公路合法载重
    UldMaxGross,        // 航空集装器最大总重
    AirChargeableWeight, // 空运计费重上限
    RailGrossLimit,     // 铁路总重限制
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::FloorGrid => write!(f, "FLOOR_GRID"),
            ConstraintKind::ContainerPayload => write!(f, "CONTAINER_PAYLOAD"),
            ConstraintKind::ContainerMgw => write!(f, "CONTAINER_MGW"),
            ConstraintKind::DrayLegalPayload => write!(f, "DRAY_LEGAL_PAYLOAD"),
            ConstraintKind::UldMaxGross => write!(f, "ULD_MAX_GROSS"),
            ConstraintKind::AirChargeableWeight => write!(f, "AIR_CHARGEABLE_WEIGHT"),
            ConstraintKind::RailGrossLimit => write!(f, "RAIL_GROSS_LIMIT"),
        }
    }
}

// ==========================================
// 公路载重上限来源 (Payload Cap Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadCapKind {
    GvwLimit,       // 整车总重限制
    AxleGroupLimit, // 轴组限重
    BridgeFormula,  // 桥梁公式 (23 CFR 658.17)
}

impl fmt::Display for PayloadCapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadCapKind::GvwLimit => write!(f, "GVW_LIMIT"),
            PayloadCapKind::AxleGroupLimit => write!(f, "AXLE_GROUP_LIMIT"),
            PayloadCapKind::BridgeFormula => write!(f, "BRIDGE_FORMULA"),
        }
    }
}

// ==========================================
// 简单装载判定 (Fit Limit)
// ==========================================
// packs_per_equipment 的二元限制结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitLimit {
    FloorOrHeight, // 几何限制 (地板或高度)
    Payload,       // 载重限制
}

impl fmt::Display for FitLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitLimit::FloorOrHeight => write!(f, "FLOOR_OR_HEIGHT"),
            FitLimit::Payload => write!(f, "PAYLOAD"),
        }
    }
}
