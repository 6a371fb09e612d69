//! Tests for merging CLI and TOML configuration.

use std::time::Duration;

use super::ConfigError;
use super::cli::Cli;
use super::defaults;
use super::toml::TomlConfig;
use super::validated::{ValidatedConfig, init_path, write_default_config};

const KEY: &str = "sk_0123456789abcdefghijKLMN";

fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["stockalert"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod credentials {
    use super::*;

    #[test]
    fn missing_credentials_returns_error() {
        let result = ValidatedConfig::from_raw(&cli(&["user"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired { field: "api_key", .. })
        ));
    }

    #[test]
    fn api_key_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["--api-key", KEY]), None).unwrap();
        assert!(config.client.validate().is_ok());
    }

    #[test]
    fn api_key_from_toml() {
        let toml = toml(&format!("[client]\napi_key = \"{KEY}\""));
        assert!(ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).is_ok());
    }

    #[test]
    fn bearer_token_alone_is_enough() {
        let config = ValidatedConfig::from_raw(&cli(&["--bearer-token", "jwt"]), None).unwrap();
        assert!(config.client.validate().is_ok());
    }

    #[test]
    fn malformed_api_key_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--api-key", "not-a-key"]), None);
        assert!(matches!(result, Err(ConfigError::InvalidClient(_))));
    }

    #[test]
    fn secrets_are_not_displayed() {
        let config = ValidatedConfig::from_raw(&cli(&["--api-key", KEY]), None).unwrap();

        assert!(!config.to_string().contains(KEY));
        assert!(!format!("{config:?}").contains(KEY));
    }
}

mod precedence {
    use super::*;

    #[test]
    fn defaults_apply_without_overrides() {
        let config = ValidatedConfig::from_raw(&cli(&["--api-key", KEY]), None).unwrap();

        assert_eq!(config.client.base_url(), defaults::BASE_URL);
        assert_eq!(config.client.timeout(), defaults::timeout());
        assert_eq!(config.client.max_retries(), defaults::MAX_RETRIES);
        assert!(!config.client.debug());
        assert!(!config.verbose);
    }

    #[test]
    fn toml_overrides_defaults() {
        let toml = toml(
            r#"
            [client]
            base_url = "https://staging.example.com/v1"
            timeout = 5000
            max_retries = 1
            debug = true
            user_agent = "my-app/1.0"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&["--api-key", KEY]), Some(&toml)).unwrap();

        assert_eq!(config.client.base_url(), "https://staging.example.com/v1");
        assert_eq!(config.client.timeout(), Duration::from_secs(5));
        assert_eq!(config.client.max_retries(), 1);
        assert!(config.client.debug());
        assert_eq!(config.client.user_agent(), "my-app/1.0");
    }

    #[test]
    fn cli_overrides_toml() {
        let toml = toml(
            r#"
            [client]
            api_key = "sk_tomlkey0123456789abcdef"
            base_url = "https://staging.example.com/v1"
            timeout = 5000
            max_retries = 1
        "#,
        );
        let cli = cli(&[
            "--base-url",
            "https://local.test/v1",
            "--timeout",
            "750",
            "--max-retries",
            "0",
            "--verbose",
        ]);

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.client.base_url(), "https://local.test/v1");
        assert_eq!(config.client.timeout(), Duration::from_millis(750));
        assert_eq!(config.client.max_retries(), 0);
        assert!(config.verbose);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--api-key", KEY, "--timeout", "0"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "timeout",
                ..
            })
        ));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result =
            ValidatedConfig::from_raw(&cli(&["--api-key", KEY, "--base-url", "ftp://x"]), None);
        assert!(matches!(result, Err(ConfigError::InvalidClient(_))));
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_reads_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, format!("[client]\napi_key = \"{KEY}\"\nmax_retries = 9\n"))
            .unwrap();

        let cli = cli(&["--config", path.to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.client.max_retries(), 9);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let cli = cli(&["--api-key", KEY, "--config", path.to_str().unwrap()]);

        assert!(matches!(
            ValidatedConfig::load(&cli),
            Err(ConfigError::FileRead { .. })
        ));
    }
}

mod init {
    use super::*;

    #[test]
    fn writes_template_creating_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default_config(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(TomlConfig::parse(&written).is_ok());
    }

    #[test]
    fn explicit_output_wins() {
        let path = init_path(Some(std::path::Path::new("here.toml"))).unwrap();
        assert_eq!(path, std::path::PathBuf::from("here.toml"));
    }
}
