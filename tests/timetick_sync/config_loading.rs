use serial_test::serial;
use temp_env::with_vars;
use timetick_inspector::DefaultTimeTickSyncInspector;
use timetick_inspector::TimeTickConfig;
use timetick_inspector::TimeTickSyncInspector;

#[test]
#[serial]
fn test_config_file_drives_inspector_interval() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("timetick.toml");
    std::fs::write(&config_path, "[inspector]\nsync_interval_ms = 42\n").unwrap();

    with_vars(
        vec![
            ("CONFIG_PATH", Some(config_path.to_str().unwrap())),
            ("TIMETICK__INSPECTOR__SYNC_INTERVAL_MS", None),
        ],
        || {
            let config = TimeTickConfig::new().unwrap().validate().unwrap();
            assert_eq!(config.inspector.sync_interval_ms, 42);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let inspector = DefaultTimeTickSyncInspector::new(&config.inspector);
                inspector.close().await;
                assert!(inspector.is_closed());
            });
        },
    );
}

#[test]
#[serial]
fn test_invalid_interval_is_rejected() {
    with_vars(
        vec![
            ("CONFIG_PATH", None),
            ("TIMETICK__INSPECTOR__SYNC_INTERVAL_MS", Some("0")),
        ],
        || {
            assert!(TimeTickConfig::new().unwrap().validate().is_err());
        },
    );
}
