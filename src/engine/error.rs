// ==========================================
// 货运装载规划引擎 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 所有错误均为确定性错误,重试同样输入必然复现,
// 由调用方就地处理 (逐行展示或整批中止)
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum PlanError {
    // ===== 主数据校验错误 =====
    #[error("包装规则无效 (field={field}): {message}")]
    InvalidPackRule { field: String, message: String },

    #[error("运载单元容量无效: equipment='{equipment}', field={field}, 必须 > 0")]
    InvalidEquipmentCapacity { equipment: String, field: String },

    // ===== 可行性错误 =====
    #[error("SKU {sku_id} 无法装入所选运载单元 '{equipment_code}'")]
    InfeasiblePacking { sku_id: i64, equipment_code: String },

    #[error("SKU {sku_id} 的单个 pack 超过空车容量,拼装中止")]
    ItemExceedsEmptyBin { sku_id: i64 },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 引擎层结果别名
pub type PlanResult<T> = Result<T, PlanError>;

impl PlanError {
    /// 非正数的包装规则字段
    pub fn pack_field_not_positive(field: &str) -> Self {
        PlanError::InvalidPackRule {
            field: field.to_string(),
            message: "必须 > 0".to_string(),
        }
    }
}
