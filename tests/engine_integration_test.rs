// ==========================================
// 引擎链路集成测试
// ==========================================
// 职责: 验证 公斤需求 → pack 换算 → 约束装载 → 拼装计划 → 运价报价
// 的跨引擎数据流,数字全部手算核对
// ==========================================

use chrono::NaiveDate;
use freight_load_planner::domain::types::{
    AppliesWhen, ChargeCalcMethod, ConstraintKind, FitLimit, LocationType, ServiceScope,
    TransportMode, UomPricing,
};
use freight_load_planner::engine::fit::{packs_per_equipment, required_packs_for_kg};
use freight_load_planner::{
    logging, BatchPlanner, ConsolidationRequirement, ConstraintContext, ConstraintEngine,
    Equipment, PackagingRule, RateCard, RateCharge, RateEngine, ShipmentDescriptor,
};

// ==========================================
// 测试辅助函数
// ==========================================

fn ship_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
}

/// 6 件/pack × 200 kg/件 + 50 kg 皮重,可堆叠两层
fn heavy_rule() -> PackagingRule {
    PackagingRule {
        units_per_pack: 6.0,
        kg_per_unit: 200.0,
        pack_tare_kg: 50.0,
        dim_l_m: 1.1,
        dim_w_m: 1.1,
        dim_h_m: 1.1,
        min_order_packs: 1,
        increment_packs: 1,
        stackable: true,
        max_stack: Some(2),
    }
}

fn container_40dv() -> Equipment {
    Equipment {
        equipment_code: "40DV".to_string(),
        name: "40ft dry van".to_string(),
        mode: TransportMode::Ocean,
        internal_length_m: 12.03,
        internal_width_m: 2.35,
        internal_height_m: 2.39,
        max_payload_kg: 26000.0,
        max_gross_kg: None,
        tare_kg: 3800.0,
        volumetric_factor: None,
        active: true,
    }
}

fn dry_van_53() -> Equipment {
    Equipment {
        equipment_code: "53DRY".to_string(),
        name: "53ft dry van".to_string(),
        mode: TransportMode::Truck,
        internal_length_m: 16.0,
        internal_width_m: 2.35,
        internal_height_m: 2.39,
        max_payload_kg: 20000.0,
        max_gross_kg: None,
        tare_kg: 6800.0,
        volumetric_factor: None,
        active: true,
    }
}

fn requirement(sku_id: i64, part: &str, required_kg: f64, rule: PackagingRule) -> ConsolidationRequirement {
    ConsolidationRequirement {
        sku_id,
        part_number: part.to_string(),
        required_kg,
        pack_rule: rule,
    }
}

fn truckload_card() -> RateCard {
    RateCard {
        id: 501,
        carrier_id: None,
        mode: TransportMode::Truck,
        equipment: "53DRY".to_string(),
        service_scope: ServiceScope::D2d,
        origin_type: LocationType::City,
        origin_code: "DETROIT".to_string(),
        dest_type: LocationType::City,
        dest_code: "LAREDO".to_string(),
        currency: "USD".to_string(),
        uom_pricing: UomPricing::PerContainer,
        base_rate: 950.0,
        min_charge: None,
        effective_from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        effective_to: None,
        contract_start: None,
        contract_end: None,
        is_active: true,
        priority: 0,
    }
}

fn fuel_surcharge() -> RateCharge {
    RateCharge {
        rate_card_id: 501,
        charge_code: "FUEL".to_string(),
        charge_name: "Fuel surcharge".to_string(),
        calc_method: ChargeCalcMethod::PercentOfBase,
        amount: 10.0,
        applies_when: AppliesWhen::Always,
        min_amount: None,
        max_amount: None,
        effective_from: None,
        effective_to: None,
    }
}

fn truckload_shipment(containers: f64) -> ShipmentDescriptor {
    ShipmentDescriptor {
        ship_date: ship_date(),
        mode: TransportMode::Truck,
        equipment: "53DRY".to_string(),
        service_scope: ServiceScope::D2d,
        origin_type: LocationType::City,
        origin_code: "DETROIT".to_string(),
        dest_type: LocationType::City,
        dest_code: "LAREDO".to_string(),
        carrier_id: None,
        reefer: false,
        flatrack: false,
        over_height: false,
        over_width: false,
        over_height_width: false,
        dg: false,
        weight_kg: 0.0,
        volume_m3: 0.0,
        miles: None,
        containers_count: Some(containers),
        chargeable_weight_kg: None,
    }
}

// ==========================================
// 公斤需求 → 换算 → 单 SKU 整箱计划
// ==========================================

#[test]
fn test_kg_demand_rounds_and_fills_single_container() {
    // 初始化日志系统
    logging::init_test();
    // 20000 kg ÷ 200 kg/件 = 100 件 → 17 pack (上取整),多发 2 件 / 400 kg
    let conversion = required_packs_for_kg(20000.0, &heavy_rule()).unwrap();
    assert_eq!(conversion.packs_required, 17);
    assert!((conversion.shipped_units - 102.0).abs() < 1e-9);
    assert!((conversion.excess_kg - 400.0).abs() < 1e-9);
    assert!(!conversion.kg_as_units_mode);

    // 地板网格 20/层 × 2 层 = 40,载重 floor(26000/1250) = 20 → 载重受限
    let fit = packs_per_equipment(&heavy_rule(), &container_40dv()).unwrap();
    assert_eq!(fit.packs_fit, 20);
    assert_eq!(fit.limiting_constraint, FitLimit::Payload);

    // 17 pack 装进单箱
    let planner = BatchPlanner::new();
    let plan = planner
        .plan_containers_no_mix(
            &[requirement(9, "PN-009", 20000.0, heavy_rule())],
            &container_40dv(),
        )
        .unwrap();
    assert_eq!(plan.total_conveyance_count, 1);
    let row = &plan.per_sku[0];
    assert_eq!(row.packs_fit, 20);
    assert_eq!(row.containers_needed, 1);
    // 重量利用率 = 17×1250 / 26000
    assert!((row.weight_util - 21250.0 / 26000.0).abs() < 1e-9);
}

// ==========================================
// 约束引擎与几何装载的一致性
// ==========================================

#[test]
fn test_constraint_breakdown_agrees_with_plain_fit() {
    // 初始化日志系统
    logging::init_test();
    let engine = ConstraintEngine::new();
    let fit = engine
        .max_units_per_conveyance(&heavy_rule(), &container_40dv(), &ConstraintContext::default())
        .unwrap();

    // 默认上下文 (不上底盘) 下,约束最小值与几何/载重装载一致
    let plain = packs_per_equipment(&heavy_rule(), &container_40dv()).unwrap();
    assert_eq!(fit.max_units, plain.packs_fit);
    assert_eq!(fit.limiting_constraint, ConstraintKind::ContainerPayload);

    // max_units 恒等于分解项最小值
    let min_in_breakdown = fit.breakdown.iter().map(|e| e.max_units).min().unwrap();
    assert_eq!(fit.max_units, min_in_breakdown);
}

#[test]
fn test_chassis_dray_rule_tightens_container_fit() {
    // 初始化日志系统
    logging::init_test();
    let engine = ConstraintEngine::new();
    let context = ConstraintContext {
        container_on_chassis: true,
        ..ConstraintContext::default()
    };
    let fit = engine
        .max_units_per_conveyance(&heavy_rule(), &container_40dv(), &context)
        .unwrap();

    // 默认五轴车: 轴组限重 34000/0.44 = 77272.7 lb 总重,
    // 扣 26000 lb 皮重 → 51272.7 lb ≈ 23257 kg → floor(23257/1250) = 18
    assert_eq!(fit.max_units, 18);
    assert_eq!(fit.limiting_constraint, ConstraintKind::DrayLegalPayload);
    assert!(fit
        .breakdown
        .iter()
        .any(|e| e.constraint == ConstraintKind::DrayLegalPayload && e.max_units == 18));
    // 公路合法载重为估算值,必须带提示
    assert!(!fit.notes.is_empty());
}

// ==========================================
// 混装拼车 → 运价报价 全链路
// ==========================================

#[test]
fn test_mixed_truckload_consolidation_then_quote() {
    // 初始化日志系统
    logging::init_test();
    // 三个 SKU: 45 / 20 / 20 pack,独占车需 2 + 1 + 1 = 4 辆
    let big = PackagingRule {
        units_per_pack: 10.0,
        kg_per_unit: 20.0,
        pack_tare_kg: 25.0,
        dim_l_m: 1.2,
        dim_w_m: 1.0,
        dim_h_m: 1.2,
        min_order_packs: 1,
        increment_packs: 1,
        stackable: false,
        max_stack: None,
    };
    let mid = PackagingRule {
        units_per_pack: 5.0,
        kg_per_unit: 40.0,
        pack_tare_kg: 30.0,
        dim_l_m: 1.1,
        dim_w_m: 1.1,
        dim_h_m: 1.0,
        min_order_packs: 1,
        increment_packs: 1,
        stackable: false,
        max_stack: None,
    };
    let small = PackagingRule {
        units_per_pack: 4.0,
        kg_per_unit: 25.0,
        pack_tare_kg: 10.0,
        dim_l_m: 0.8,
        dim_w_m: 0.6,
        dim_h_m: 0.9,
        min_order_packs: 1,
        increment_packs: 1,
        stackable: false,
        max_stack: None,
    };
    let requirements = vec![
        requirement(1, "PN-001", 9000.0, big),
        requirement(2, "PN-002", 4000.0, mid),
        requirement(3, "PN-003", 2000.0, small),
    ];

    let planner = BatchPlanner::new();
    let plan = planner
        .plan_trucks_mix_ok(&requirements, &dry_van_53(), false, true)
        .unwrap();

    // FFD 按地板面积拼装: 31 + (14+17) + (3+20) = 3 辆,优于 4 辆基线
    assert_eq!(plan.no_mix_baseline_truck_count, 4);
    assert_eq!(plan.truck_count, 3);
    assert!(plan.truck_count <= plan.no_mix_baseline_truck_count);
    assert_eq!(plan.trucks[0].sku_breakdown.get(&1), Some(&31));
    assert_eq!(plan.trucks[1].sku_breakdown.get(&1), Some(&14));
    assert_eq!(plan.trucks[1].sku_breakdown.get(&2), Some(&17));
    assert_eq!(plan.trucks[2].sku_breakdown.get(&3), Some(&20));

    // 车数直接进入按车计价: 950 × 3 + 10% 燃油 = 3135
    let rates = RateEngine::new();
    let cards = vec![truckload_card()];
    let shipment = truckload_shipment(plan.truck_count as f64);
    let card = rates.select_best_rate_card(&cards, &shipment).unwrap();
    let quote = rates.compute_rate_total(card, &[fuel_surcharge()], &shipment);
    assert!((quote.base_total - 2850.0).abs() < 1e-9);
    assert!((quote.charges_total - 285.0).abs() < 1e-9);
    assert!((quote.grand_total - 3135.0).abs() < 1e-9);
    assert_eq!(quote.items.len(), 2);
}
