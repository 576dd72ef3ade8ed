use super::*;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8787);
    assert_eq!(config.browser.debug_port, 9222);
    assert!(config.browser.launch);
    assert!(config.storage.watch);
    assert!(!config.scan.enable_on_start);
    assert!(config.scan.persist_page_claims);
}

#[test]
fn test_sequencer_durations() {
    let seq = SequencerConfig::default();
    assert_eq!(seq.load_timeout(), Duration::from_secs(30));
    assert_eq!(seq.result_timeout(), Duration::from_secs(5));
    assert_eq!(seq.capture_timeout(), Duration::from_secs(600));
    assert!(seq.result_poll() < Duration::from_secs(1));
}

#[test]
fn test_scan_interval() {
    let scan = ScanConfig::default();
    assert_eq!(scan.interval(), Duration::from_secs(30 * 60));
    assert_eq!(scan.target_host, "wplace.live");
}

#[test]
fn test_browser_endpoint() {
    let browser = BrowserConfig {
        debug_port: 9333,
        ..Default::default()
    };
    assert_eq!(browser.endpoint(), "http://localhost:9333");
    assert!(browser.resolved_profile_dir().ends_with("browser-profile"));
}

#[test]
fn test_storage_default_path() {
    let storage = StorageConfig::default();
    assert!(storage.resolved_path().ends_with(".claimrunner/claimed.json"));
}

#[test]
fn test_config_serialization_roundtrip() {
    let config = Config::default();
    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.server.port, config.server.port);
    assert_eq!(parsed.sequencer.tab_settle_ms, config.sequencer.tab_settle_ms);
}
