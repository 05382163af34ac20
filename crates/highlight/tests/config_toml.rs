use highlight::HighlightConfig;

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config: HighlightConfig = toml::from_str(r#"class_name = "search-hit""#).unwrap();
    assert_eq!(config.tag_name, "mark");
    assert_eq!(config.class_name, "search-hit");

    let config: HighlightConfig = toml::from_str("").unwrap();
    assert_eq!(config, HighlightConfig::default());
}

#[test]
fn round_trips_through_toml() {
    let config = HighlightConfig {
        tag_name: "span".to_string(),
        class_name: "note".to_string(),
    };
    let text = toml::to_string(&config).unwrap();
    assert_eq!(toml::from_str::<HighlightConfig>(&text).unwrap(), config);
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(toml::from_str::<HighlightConfig>(r#"colour = "red""#).is_err());
}
