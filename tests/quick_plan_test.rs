// ==========================================
// 快速规划编排器测试
// ==========================================
// 职责: 验证逐箱型报表生成、排除清单与航线报价回退
// ==========================================

use chrono::NaiveDate;
use freight_load_planner::domain::types::{
    LocationType, ServiceScope, TransportMode, UomPricing,
};
use freight_load_planner::engine::quick_plan::{LaneQuery, QuickPlanRequest, QuickPlanner};
use freight_load_planner::{logging, Equipment, PackagingRule, RateCard, TruckConfig};
use std::collections::HashMap;

// ==========================================
// 测试辅助函数
// ==========================================

fn ship_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn pallet_rule() -> PackagingRule {
    PackagingRule {
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
    }
}

fn equipment(code: &str, mode: TransportMode, length_m: f64) -> Equipment {
    Equipment {
        equipment_code: code.to_string(),
        name: format!("{} preset", code),
        mode,
        internal_length_m: length_m,
        internal_width_m: 2.35,
        internal_height_m: 2.39,
        max_payload_kg: 26000.0,
        max_gross_kg: None,
        tare_kg: 3800.0,
        volumetric_factor: None,
        active: true,
    }
}

fn request(required_units: f64) -> QuickPlanRequest {
    QuickPlanRequest {
        sku_id: 42,
        part_number: "PN-042".to_string(),
        required_units,
        ship_date: ship_date(),
        pack_rule: pallet_rule(),
        requested_modes: Vec::new(),
        equipment_allowed: HashMap::new(),
        lane: None,
        truck_config: None,
        jurisdiction_rule: None,
    }
}

fn lane_card(
    id: i64,
    equipment: &str,
    origin_type: LocationType,
    origin_code: &str,
    dest_code: &str,
    base_rate: f64,
) -> RateCard {
    RateCard {
        id,
        carrier_id: None,
        mode: TransportMode::Ocean,
        equipment: equipment.to_string(),
        service_scope: ServiceScope::P2p,
        origin_type,
        origin_code: origin_code.to_string(),
        dest_type: origin_type,
        dest_code: dest_code.to_string(),
        currency: "USD".to_string(),
        uom_pricing: UomPricing::PerContainer,
        base_rate,
        min_charge: None,
        effective_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        effective_to: None,
        contract_start: None,
        contract_end: None,
        is_active: true,
        priority: 5,
    }
}

// ==========================================
// 报表生成
// ==========================================

#[test]
fn test_plan_reports_fit_per_equipment_sorted_by_mode_and_count() {
    // 初始化日志系统
    logging::init_test();
    let planner = QuickPlanner::new();
    let equipment_list = vec![
        equipment("CNT_40", TransportMode::Ocean, 12.03),
        equipment("CNT_20", TransportMode::Ocean, 5.9),
        equipment("TRL_53", TransportMode::Truck, 16.0),
    ];
    let result = planner
        .plan(&request(500.0), &equipment_list, &[], &[])
        .unwrap();

    assert_eq!(result.packs_required, 50);
    assert!((result.shipped_units - 500.0).abs() < 1e-9);
    assert_eq!(result.equipment.len(), 3);
    // 排序: OCEAN 在 TRUCK 前,同方式内箱数少者在前
    assert_eq!(result.equipment[0].mode, TransportMode::Ocean);
    assert!(result.equipment[0].equipment_count <= result.equipment[1].equipment_count);
    assert_eq!(result.equipment[2].mode, TransportMode::Truck);
    for row in &result.equipment {
        assert!(row.packs_fit > 0);
        assert!(row.equipment_count > 0);
        assert!(!row.constraint_breakdown.is_empty());
    }
    // 卡车行触发合法载重估算提示,去重后只出现一次
    assert!(!result.warnings.is_empty());
    let unique: std::collections::HashSet<&String> = result.warnings.iter().collect();
    assert_eq!(unique.len(), result.warnings.len());
}

#[test]
fn test_requested_mode_filter_limits_rows() {
    // 初始化日志系统
    logging::init_test();
    let planner = QuickPlanner::new();
    let equipment_list = vec![
        equipment("CNT_40", TransportMode::Ocean, 12.03),
        equipment("TRL_53", TransportMode::Truck, 16.0),
    ];
    let mut req = request(100.0);
    req.requested_modes = vec![TransportMode::Ocean];
    let result = planner.plan(&req, &equipment_list, &[], &[]).unwrap();
    assert_eq!(result.equipment.len(), 1);
    assert_eq!(result.equipment[0].mode, TransportMode::Ocean);
}

#[test]
fn test_missing_truck_config_warns_of_default_assumptions() {
    // 初始化日志系统
    logging::init_test();
    let planner = QuickPlanner::new();
    let equipment_list = vec![equipment("TRL_53", TransportMode::Truck, 16.0)];

    // 未给卡车配置: 按默认 5AXLE_TL 估算并提示
    let result = planner
        .plan(&request(100.0), &equipment_list, &[], &[])
        .unwrap();
    assert!(result.warnings.iter().any(|w| w.contains("5AXLE_TL")));

    // 给了配置则不再提示默认假设
    let mut req = request(100.0);
    req.truck_config = Some(TruckConfig::default());
    let result = planner.plan(&req, &equipment_list, &[], &[]).unwrap();
    assert!(!result.warnings.iter().any(|w| w.contains("5AXLE_TL")));
}

// ==========================================
// 排除清单
// ==========================================

#[test]
fn test_denied_and_invalid_equipment_reported_not_fatal() {
    // 初始化日志系统
    logging::init_test();
    let planner = QuickPlanner::new();
    let mut broken = equipment("CNT_BAD", TransportMode::Ocean, 12.03);
    broken.max_payload_kg = 0.0; // 主数据缺陷
    let equipment_list = vec![
        equipment("CNT_40", TransportMode::Ocean, 12.03),
        equipment("CNT_DENY", TransportMode::Ocean, 12.03),
        broken,
    ];
    let mut req = request(100.0);
    req.equipment_allowed.insert("CNT_DENY".to_string(), false);

    let result = planner.plan(&req, &equipment_list, &[], &[]).unwrap();
    assert_eq!(result.equipment.len(), 1);
    assert_eq!(result.excluded_equipment.len(), 2);
    // 排除清单按箱型代码排序,各自带人读原因
    assert_eq!(result.excluded_equipment[0].equipment_code, "CNT_BAD");
    assert!(result.excluded_equipment[0].reason.contains("max_payload_kg"));
    assert_eq!(result.excluded_equipment[1].equipment_code, "CNT_DENY");
}

#[test]
fn test_inactive_equipment_is_skipped_silently() {
    // 初始化日志系统
    logging::init_test();
    let planner = QuickPlanner::new();
    let mut retired = equipment("CNT_OLD", TransportMode::Ocean, 12.03);
    retired.active = false;
    let result = planner
        .plan(&request(100.0), &[retired], &[], &[])
        .unwrap();
    assert!(result.equipment.is_empty());
    assert!(result.excluded_equipment.is_empty());
}

// ==========================================
// 航线报价
// ==========================================

#[test]
fn test_lane_quote_falls_back_from_city_to_port_cards() {
    // 初始化日志系统
    logging::init_test();
    let planner = QuickPlanner::new();
    let equipment_list = vec![equipment("CNT_40", TransportMode::Ocean, 12.03)];
    // 只有港口级卡,城市对选卡落空后回退港口对
    let cards = vec![lane_card(
        31,
        "CNT_40",
        LocationType::Port,
        "USLAX",
        "CNSHA",
        1800.0,
    )];
    let mut req = request(100.0);
    req.lane = Some(LaneQuery {
        origin_code: "USLAX".to_string(),
        dest_code: "CNSHA".to_string(),
        service_scope: ServiceScope::P2p,
    });

    let result = planner.plan(&req, &equipment_list, &cards, &[]).unwrap();
    let row = &result.equipment[0];
    assert!(row.est_cost.is_some());
    assert_eq!(result.rate_breakdown.len(), 1);
    assert_eq!(result.rate_breakdown[0].rate_card_id, 31);
    let summary = &result.mode_summary[0];
    assert_eq!(summary.cost_best, row.est_cost);
    assert_eq!(summary.equipment_best.as_deref(), Some("CNT_40"));
}

#[test]
fn test_lane_quote_prefers_cheaper_of_city_and_port_match() {
    // 初始化日志系统
    logging::init_test();
    let planner = QuickPlanner::new();
    let equipment_list = vec![equipment("CNT_40", TransportMode::Ocean, 12.03)];
    let cards = vec![
        lane_card(1, "CNT_40", LocationType::City, "LAX", "SHA", 2400.0),
        lane_card(2, "CNT_40", LocationType::Port, "LAX", "SHA", 1500.0),
    ];
    let mut req = request(100.0);
    req.lane = Some(LaneQuery {
        origin_code: "LAX".to_string(),
        dest_code: "SHA".to_string(),
        service_scope: ServiceScope::P2p,
    });

    let result = planner.plan(&req, &equipment_list, &cards, &[]).unwrap();
    assert_eq!(result.rate_breakdown[0].rate_card_id, 2);
}

#[test]
fn test_no_matching_card_leaves_cost_absent() {
    // 初始化日志系统
    logging::init_test();
    let planner = QuickPlanner::new();
    let equipment_list = vec![equipment("CNT_40", TransportMode::Ocean, 12.03)];
    let mut req = request(100.0);
    req.lane = Some(LaneQuery {
        origin_code: "NOWHERE".to_string(),
        dest_code: "NOPLACE".to_string(),
        service_scope: ServiceScope::P2p,
    });
    let result = planner.plan(&req, &equipment_list, &[], &[]).unwrap();
    // 无匹配卡不是错误: 行保留,成本缺省
    assert_eq!(result.equipment.len(), 1);
    assert!(result.equipment[0].est_cost.is_none());
    assert!(result.rate_breakdown.is_empty());
    assert!(result.mode_summary[0].cost_best.is_none());
}
