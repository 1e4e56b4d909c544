// ==========================================
// 货运装载规划引擎 - 运价选择与计价引擎
// ==========================================
// 职责: 生效日期过滤 + 精确度裁决选卡,基础运费 + 附加费计价
// 输入: 运价卡/附加费快照 + 货件描述
// 输出: 选中卡引用 / 明细化报价 (BASE 行 + N 条 ACCESSORIAL 行)
// 红线: 无匹配卡不是错误,返回 None 由调用方决定提示
// ==========================================

use crate::domain::rate::{RateCard, RateCharge, RateItem, RateItemType, RateQuote, ShipmentDescriptor};
use crate::domain::types::{ChargeCalcMethod, UomPricing};
use tracing::instrument;


// ==========================================
// RateEngine - 运价引擎
// ==========================================
pub struct RateEngine {
    // 无状态引擎,全部参考数据由调用方传入
}

impl Default for RateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RateEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 选卡
    // ==========================================

    /// 选择最佳匹配运价卡
    ///
    /// 过滤: is_active + 承运人匹配 (卡绑定承运人时须与货件一致) +
    /// 方式/箱型/服务范围/起止地完全相等 (忽略大小写) + 生效/合同日期有效
    /// 裁决: (精确度得分, priority, effective_from) 降序取最大
    #[instrument(skip(self, cards, shipment), fields(
        card_count = cards.len(),
        mode = %shipment.mode,
        equipment = %shipment.equipment
    ))]
    pub fn select_best_rate_card<'a>(
        &self,
        cards: &'a [RateCard],
        shipment: &ShipmentDescriptor,
    ) -> Option<&'a RateCard> {
        let rank = |card: &RateCard| (card.specificity_score(), card.priority, card.effective_from);
        cards
            .iter()
            .filter(|card| self.card_matches(card, shipment))
            // 完全平票保留先出现的卡,结果与输入顺序可复现
            .fold(None, |best: Option<&'a RateCard>, card| match best {
                Some(incumbent) if rank(incumbent) >= rank(card) => Some(incumbent),
                _ => Some(card),
            })
    }

    fn card_matches(&self, card: &RateCard, shipment: &ShipmentDescriptor) -> bool {
        if !card.is_active {
            return false;
        }
        if let (Some(card_carrier), Some(ship_carrier)) = (card.carrier_id, shipment.carrier_id) {
            if card_carrier != ship_carrier {
                return false;
            }
        }
        card.mode == shipment.mode
            && card.equipment.eq_ignore_ascii_case(&shipment.equipment)
            && card.service_scope == shipment.service_scope
            && card.origin_type == shipment.origin_type
            && card.origin_code.eq_ignore_ascii_case(&shipment.origin_code)
            && card.dest_type == shipment.dest_type
            && card.dest_code.eq_ignore_ascii_case(&shipment.dest_code)
            && card.is_date_valid(shipment.ship_date)
    }

    // ==========================================
    // 计价
    // ==========================================

    /// 计算总运费 (基础 + 附加费),货币金额统一保留两位小数
    #[instrument(skip(self, card, charges, shipment), fields(
        rate_card_id = card.id,
        uom = %card.uom_pricing
    ))]
    pub fn compute_rate_total(
        &self,
        card: &RateCard,
        charges: &[RateCharge],
        shipment: &ShipmentDescriptor,
    ) -> RateQuote {
        let base_total = self.base_total(card, shipment);
        let mut items = vec![RateItem {
            item_type: RateItemType::Base,
            code: "BASE".to_string(),
            name: "Base freight".to_string(),
            amount: round_money(base_total),
        }];

        let mut charges_total = 0.0;
        for charge in charges {
            if charge.rate_card_id != card.id {
                continue;
            }
            if !charge.is_date_valid(shipment.ship_date) {
                continue;
            }
            if !charge.applies_when.applies(shipment) {
                continue;
            }
            let raw = self.charge_amount(charge.calc_method, charge.amount, shipment, base_total);
            let bounded = clamp_amount(raw, charge.min_amount, charge.max_amount);
            charges_total += bounded;
            items.push(RateItem {
                item_type: RateItemType::Accessorial,
                code: charge.charge_code.clone(),
                name: charge.charge_name.clone(),
                amount: round_money(bounded),
            });
        }

        RateQuote {
            currency: card.currency.clone(),
            base_total: round_money(base_total),
            charges_total: round_money(charges_total),
            grand_total: round_money(base_total + charges_total),
            items,
        }
    }

    /// 基础运费: 按计价单位展开,受 min_charge 保底
    fn base_total(&self, card: &RateCard, shipment: &ShipmentDescriptor) -> f64 {
        let total = match card.uom_pricing {
            UomPricing::Flat => card.base_rate,
            UomPricing::PerContainer => card.base_rate * shipment.containers_count.unwrap_or(0.0),
            UomPricing::PerKg | UomPricing::PerChargeableKg => {
                card.base_rate * shipment.billable_weight_kg()
            }
            UomPricing::PerCbm => card.base_rate * shipment.volume_m3,
            UomPricing::PerMile => card.base_rate * shipment.miles.unwrap_or(0.0),
        };
        match card.min_charge {
            Some(floor) => total.max(floor),
            None => total,
        }
    }

    /// 单条附加费原始金额
    fn charge_amount(
        &self,
        method: ChargeCalcMethod,
        amount: f64,
        shipment: &ShipmentDescriptor,
        base_total: f64,
    ) -> f64 {
        match method {
            ChargeCalcMethod::Flat => amount,
            ChargeCalcMethod::PerContainer => amount * shipment.containers_count.unwrap_or(0.0),
            ChargeCalcMethod::PerKg => amount * shipment.billable_weight_kg(),
            ChargeCalcMethod::PerCbm => amount * shipment.volume_m3,
            ChargeCalcMethod::PerMile => amount * shipment.miles.unwrap_or(0.0),
            ChargeCalcMethod::PercentOfBase => base_total * amount / 100.0,
        }
    }
}

// ==========================================
// 内部辅助
// ==========================================

/// 金额边界: 先保底后封顶
fn clamp_amount(value: f64, min_amount: Option<f64>, max_amount: Option<f64>) -> f64 {
    let mut value = value;
    if let Some(min) = min_amount {
        value = value.max(min);
    }
    if let Some(max) = max_amount {
        value = value.min(max);
    }
    value
}

/// 货币金额四舍五入到两位小数
fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
