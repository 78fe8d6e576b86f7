use lineage_core::LineageConfig;
use serde_json::json;

#[test]
fn defaults_expose_layout_and_viewport_settings() {
    let cfg = LineageConfig::default();
    assert_eq!(cfg.get_str("layout.rankDir"), Some("LR"));
    assert_eq!(cfg.get_f64("layout.rankSpacing"), Some(120.0));
    assert_eq!(cfg.get_u64("viewport.fitDelayMs"), Some(50));
    assert_eq!(cfg.get_u64("controls.maxDepth"), Some(10));
    assert_eq!(cfg.get_f64("missing.path"), None);
}

#[test]
fn overrides_are_deep_merged_onto_defaults() {
    let cfg = LineageConfig::from_json_overrides(r#"{"layout": {"nodeSpacing": 12}}"#).unwrap();
    assert_eq!(cfg.get_f64("layout.nodeSpacing"), Some(12.0));
    // Siblings of the overridden key survive.
    assert_eq!(cfg.get_f64("layout.rankSpacing"), Some(120.0));
}

#[test]
fn non_object_overrides_are_rejected() {
    let err = LineageConfig::from_json_overrides("[1, 2]").unwrap_err();
    assert!(err.to_string().contains("invalid config"));
    assert!(LineageConfig::from_json_overrides("nope").is_err());
}

#[test]
fn set_value_creates_intermediate_objects() {
    let mut cfg = LineageConfig::from_value(json!(42));
    cfg.set_value("controls.maxDepth", json!(4));
    assert_eq!(cfg.get_u64("controls.maxDepth"), Some(4));

    cfg.set_value("controls.maxDepth.nested", json!(true));
    assert_eq!(cfg.get_bool("controls.maxDepth.nested"), Some(true));
}

#[test]
fn border_color_is_case_insensitive_with_fallback() {
    let cfg = LineageConfig::default();
    assert_eq!(cfg.border_color("table"), Some("#2563eb"));
    assert_eq!(cfg.border_color("VIEW"), Some("#16a34a"));
    assert_eq!(cfg.border_color("unknown"), Some("#94a3b8"));
    assert_eq!(LineageConfig::empty_object().border_color("TABLE"), None);
}
