use super::*;

#[test]
fn test_update_card_dto_partial_deserialization() {
    let dto: UpdateCardDto = serde_json::from_str(r#"{"front_text":"new front"}"#).unwrap();
    assert_eq!(dto.front_text.as_deref(), Some("new front"));
    assert!(dto.back_text.is_none());
    assert!(dto.category.is_none());
    assert!(dto.position_x.is_none());
    assert!(!dto.is_empty());
}

#[test]
fn test_update_card_dto_empty() {
    let dto: UpdateCardDto = serde_json::from_str("{}").unwrap();
    assert!(dto.is_empty());
}

#[test]
fn test_create_link_dto_tolerates_missing_target() {
    // Absence of to_card_id must deserialize cleanly so the handler can
    // answer with a Validation error instead of a serde 422.
    let dto: CreateLinkDto = serde_json::from_str("{}").unwrap();
    assert!(dto.to_card_id.is_none());
    assert!(dto.link_type.is_none());
}

#[test]
fn test_metric_history_query_defaults_to_seven_days() {
    let query: MetricHistoryQuery = serde_json::from_str("{}").unwrap();
    assert_eq!(query.days, 7);
}

#[test]
fn test_record_metric_dto_wire_names() {
    let dto: RecordMetricDto =
        serde_json::from_str(r#"{"type":"latency","data":{"action":"save","duration":42}}"#)
            .unwrap();
    assert_eq!(dto.metric_type, "latency");
    assert_eq!(dto.data["action"], "save");
}

#[test]
fn test_dashboard_periods_wire_shape() {
    let json = serde_json::to_value(DashboardPeriods::default()).unwrap();
    assert_eq!(json["pageLoad"], "7 days");
    assert_eq!(json["errors"], "1 hour");
    assert_eq!(json["latency"], "24 hours");
}
