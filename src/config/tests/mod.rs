mod parse_config_tests {
    use std::fs;
    use std::path::PathBuf;

    use log::LevelFilter;

    use crate::config::{parse_config, BackendChoice, WALLET_CONFIG_DEFAULT};
    use crate::test::{cleanup, init_test_dir};

    #[test]
    fn missing_file_uses_defaults() {
        let dir = init_test_dir();
        let path = dir.join("missing.toml");
        let config = parse_config(path.to_str().unwrap()).unwrap();
        assert_eq!(*WALLET_CONFIG_DEFAULT, config);
        assert_eq!("code-wallet-data", config.store.name);
        assert_eq!(BackendChoice::Auto, config.storage.backend);
        cleanup();
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = init_test_dir();
        let path = dir.join("CodeWallet.toml");
        fs::write(
            &path,
            r#"
[store]
location = "/tmp/wallet"

[storage]
backend = "browser"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        let config = parse_config(path.to_str().unwrap()).unwrap();
        assert_eq!(PathBuf::from("/tmp/wallet"), config.store.location);
        assert_eq!("code-wallet-data", config.store.name);
        assert_eq!(BackendChoice::Browser, config.storage.backend);
        assert_eq!(LevelFilter::Debug, config.logging.level_filter());
        assert_eq!(PathBuf::from("/tmp/wallet/browser"), config.store.browser_dir());
        cleanup();
    }

    #[test]
    fn unknown_backend_fails() {
        let dir = init_test_dir();
        let path = dir.join("CodeWallet.toml");
        fs::write(&path, "[storage]\nbackend = \"cloud\"\n").unwrap();
        assert!(parse_config(path.to_str().unwrap()).is_err());
        cleanup();
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let mut config = WALLET_CONFIG_DEFAULT.clone();
        config.logging.level = "loud".to_string();
        assert_eq!(LevelFilter::Info, config.logging.level_filter());
    }
}
