use super::*;

#[test]
fn test_defaults() {
    let config = ProjectConfig::default();
    assert_eq!(config.scoring.strength_threshold, 9.0);
    assert_eq!(config.scoring.weakness_threshold, 6.0);
    assert_eq!(config.report.recommendation_cap, 5);
    assert!(config.validate().is_ok());
    assert!((config.category_weights().get(Category::Naming) - 0.1).abs() < 1e-12);
}

#[test]
fn test_parse_toml() {
    let config: ProjectConfig = toml::from_str(
        r#"
[scoring]
weakness_threshold = 5.0

[scoring.category_weights]
naming = 0.15
version_control = 0.05

[report]
recommendation_cap = 3

[rules.function-max-length]
limit = 60

[rules.commit-subject-length]
enabled = false

[defaults]
format = "json"
workers = 4
"#,
    )
    .expect("parse config");

    assert_eq!(config.scoring.weakness_threshold, 5.0);
    assert_eq!(config.scoring.strength_threshold, 9.0);
    assert_eq!(config.report.recommendation_cap, 3);
    assert_eq!(config.defaults.format.as_deref(), Some("json"));
    assert_eq!(config.defaults.workers, Some(4));
    assert_eq!(config.rules["function-max-length"].limit, Some(60.0));
    assert_eq!(config.disabled_rules(), vec!["commit-subject-length"]);

    let weights = config.category_weights();
    assert!((weights.get(Category::Naming) - 0.15).abs() < 1e-12);
    assert!((weights.get(Category::VersionControl) - 0.05).abs() < 1e-12);
    assert!(config.validate().is_ok());
}

#[test]
fn test_weight_sum_validation() {
    let mut config = ProjectConfig::default();
    config.scoring.category_weights.insert(Category::Naming, 0.5);
    match config.validate().unwrap_err() {
        ConfigError::WeightSum { total } => assert!((total - 1.4).abs() < 1e-9),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_negative_weight_rejected() {
    let mut config = ProjectConfig::default();
    config.scoring.category_weights.insert(Category::Logging, -0.1);
    config.scoring.category_weights.insert(Category::Naming, 0.3);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NegativeWeight { category: Category::Logging, .. })
    ));
}

#[test]
fn test_threshold_and_cap_validation() {
    let mut config = ProjectConfig::default();
    config.scoring.strength_threshold = 11.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Threshold { name: "strength", .. })
    ));

    let mut config = ProjectConfig::default();
    config.report.recommendation_cap = 0;
    assert_eq!(config.validate(), Err(ConfigError::RecommendationCap));
}

#[test]
fn test_unknown_rule_rejected() {
    let mut config = ProjectConfig::default();
    config
        .rules
        .insert("no-such-rule".to_string(), RuleOverride::default());
    assert_eq!(
        config.validate(),
        Err(ConfigError::UnknownRule("no-such-rule".to_string()))
    );
}

#[test]
fn test_non_finite_limit_rejected() {
    let config: ProjectConfig =
        toml::from_str("[rules.function-max-length]\nlimit = nan\n").expect("parse config");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLimit { ref rule, .. }) if rule == "function-max-length"
    ));

    let config: ProjectConfig =
        toml::from_str("[rules.function-max-length]\nlimit = inf\n").expect("parse config");
    assert!(config.validate().is_err());
    assert!(config.rule_specs().is_err());
}

#[test]
fn test_default_workers_bounds() {
    let mut config = ProjectConfig::default();
    config.defaults.workers = Some(0);
    assert_eq!(
        config.validate(),
        Err(ConfigError::Workers { workers: 0, max: MAX_WORKERS })
    );

    config.defaults.workers = Some(65);
    assert!(matches!(config.validate(), Err(ConfigError::Workers { workers: 65, .. })));

    config.defaults.workers = Some(8);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_project_config_from_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(load_project_config(dir.path()), ProjectConfig::default());

    std::fs::write(
        dir.path().join("stylegrade.toml"),
        "[report]\nrecommendation_cap = 2\n",
    )
    .expect("write config");
    assert_eq!(load_project_config(dir.path()).report.recommendation_cap, 2);
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("stylegrade.toml"), "[report\n").expect("write config");
    assert_eq!(load_project_config(dir.path()), ProjectConfig::default());

    // Explicit paths do not fall back
    assert!(load_config_file(&dir.path().join("stylegrade.toml")).is_err());
}

#[test]
fn test_load_json_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".stylegraderc.json");
    std::fs::write(&path, r#"{ "scoring": { "strength_threshold": 8.5 } }"#).expect("write");
    let config = load_config_file(&path).expect("load json");
    assert_eq!(config.scoring.strength_threshold, 8.5);
}

#[test]
fn test_example_config_is_valid() {
    let config: ProjectConfig = toml::from_str(example_config()).expect("example parses");
    assert!(config.validate().is_ok());
}
