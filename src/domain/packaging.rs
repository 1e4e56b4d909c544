// ==========================================
// 货运装载规划引擎 - 包装规则领域模型
// ==========================================
// 一个 pack = 一个物理搬运单元 (托盘/纸箱/桶)
// 引擎只读,由主数据层以快照形式传入
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// PackagingRule - 包装规则
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingRule {
    // ===== 换算参数 =====
    pub units_per_pack: f64, // 每 pack 产品单位数 (>0)
    pub kg_per_unit: f64,    // 单位重量 (kg, <=0 时触发 kg_as_units 回退)
    pub pack_tare_kg: f64,   // pack 皮重 (kg)

    // ===== 外形尺寸 (米) =====
    pub dim_l_m: f64,
    pub dim_w_m: f64,
    pub dim_h_m: f64,

    // ===== 订购约束 =====
    pub min_order_packs: i64, // 最小起订 pack 数 (>=1)
    pub increment_packs: i64, // 订购递增步长 (>=1)

    // ===== 堆叠属性 =====
    pub stackable: bool,
    pub max_stack: Option<i64>, // 最大堆叠层数 (None = 仅受净高限制)
}

impl PackagingRule {
    /// pack 毛重 (kg),派生值不落库
    pub fn pack_gross_kg(&self) -> f64 {
        self.units_per_pack * self.kg_per_unit + self.pack_tare_kg
    }

    /// pack 体积 (立方米),派生值不落库
    pub fn pack_volume_m3(&self) -> f64 {
        self.dim_l_m * self.dim_w_m * self.dim_h_m
    }

    /// 占地面积 (平方米)
    pub fn footprint_m2(&self) -> f64 {
        self.dim_l_m * self.dim_w_m
    }
}
