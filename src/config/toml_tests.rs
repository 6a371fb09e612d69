//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [client]
            api_key = "sk_0123456789abcdefghijKLMN"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(
            config.client.api_key.as_deref(),
            Some("sk_0123456789abcdefghijKLMN")
        );
        assert_eq!(config.client.timeout, None);
        assert!(!config.client.debug);
    }

    #[test]
    fn parse_full_client_section() {
        let toml = r#"
            [client]
            bearer_token = "token"
            base_url = "https://staging.example.com/v1"
            timeout = 5000
            max_retries = 1
            debug = true
            user_agent = "my-app/1.0"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let client = &config.client;

        assert_eq!(client.bearer_token.as_deref(), Some("token"));
        assert_eq!(
            client.base_url.as_deref(),
            Some("https://staging.example.com/v1")
        );
        assert_eq!(client.timeout, Some(5000));
        assert_eq!(client.max_retries, Some(1));
        assert!(client.debug);
        assert_eq!(client.user_agent.as_deref(), Some("my-app/1.0"));
    }

    #[test]
    fn empty_file_is_valid() {
        let config = TomlConfig::parse("").unwrap();
        assert!(config.client.api_key.is_none());
    }
}

mod errors {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
            [client]
            api_secret = "nope"
        "#;

        let err = TomlConfig::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = TomlConfig::parse("[webhook]\nurl = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = TomlConfig::parse("[client]\ntimeout = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = TomlConfig::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::FileRead { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}

mod files {
    use super::*;

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[client]\nmax_retries = 7\n").unwrap();

        let config = TomlConfig::load(&path).unwrap();
        assert_eq!(config.client.max_retries, Some(7));
    }

    #[test]
    fn default_path_ends_with_app_file() {
        if let Some(path) = TomlConfig::default_path() {
            assert!(path.ends_with("stockalert/config.toml"));
        }
    }
}

mod template {
    use super::*;
    use crate::config::defaults;

    #[test]
    fn template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();
        assert!(config.client.api_key.is_none());
    }

    #[test]
    fn template_documents_defaults() {
        let template = default_config_template();
        assert!(template.contains("[client]"));
        assert!(template.contains(defaults::BASE_URL));
        assert!(template.contains(&format!("timeout = {}", defaults::TIMEOUT_MS)));
    }
}
