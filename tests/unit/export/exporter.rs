use super::*;

#[test]
fn opts_follow_engine_config() {
    let cfg = EngineConfig {
        export_multiplier: 3.0,
        skip_empty_views: true,
        load_timeout_ms: 250,
        ..EngineConfig::default()
    };
    let opts = ExportOpts::from_config(&cfg);
    assert_eq!(opts.multiplier, 3.0);
    assert!(opts.skip_empty);
    assert_eq!(opts.timeout, Duration::from_millis(250));
}

#[test]
fn default_opts_match_stock_download() {
    let opts = ExportOpts::default();
    assert_eq!(opts.multiplier, 2.0);
    assert!(!opts.skip_empty);
    assert_eq!(opts.timeout, Duration::from_secs(10));
}
