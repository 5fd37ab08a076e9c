//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.api.base_url.is_none());
        assert!(config.api.headers.is_empty());
        assert!(config.retry.max_attempts.is_none());
        assert!(config.webhook.secret.is_none());
    }

    #[test]
    fn parse_api_section() {
        let toml = r#"
            [api]
            base_url = "https://api.mangopay.com"
            token = "tok_live"
            timeout = 15

            [api.headers]
            X-Custom-Header = "custom-value"
            Idempotency-Key = "abc"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let api = &config.api;

        assert_eq!(api.base_url.as_deref(), Some("https://api.mangopay.com"));
        assert_eq!(api.token.as_deref(), Some("tok_live"));
        assert_eq!(api.timeout, Some(15));
        assert_eq!(api.headers.len(), 2);
        assert_eq!(
            api.headers.get("X-Custom-Header").map(String::as_str),
            Some("custom-value")
        );
    }

    #[test]
    fn parse_retry_section() {
        let toml = r"
            [retry]
            max_attempts = 5
            base_delay = 2
            max_delay = 60
            jitter = 0.25
        ";

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.retry.max_attempts, Some(5));
        assert_eq!(config.retry.base_delay, Some(2));
        assert_eq!(config.retry.max_delay, Some(60));
        assert_eq!(config.retry.jitter, Some(0.25));
    }

    #[test]
    fn parse_webhook_section() {
        let toml = r#"
            [webhook]
            secret = "whsec_test"
            tolerance = 0
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.webhook.secret.as_deref(), Some("whsec_test"));
        assert_eq!(config.webhook.tolerance, Some(0));
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_section_is_rejected() {
        assert!(TomlConfig::parse("[logging]\nlevel = \"debug\"").is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(TomlConfig::parse("[api]\nbearer = \"x\"").is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(TomlConfig::parse("[api]\ntimeout = \"thirty\"").is_err());
    }

    #[test]
    fn negative_attempts_are_rejected() {
        assert!(TomlConfig::parse("[retry]\nmax_attempts = -1").is_err());
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TomlConfig::load(&dir.path().join("absent.toml"));

        assert!(matches!(
            result,
            Err(super::super::ConfigError::FileRead { .. })
        ));
    }
}

mod template {
    use super::*;

    #[test]
    fn template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(
            config.api.base_url.as_deref(),
            Some("https://api.sandbox.mangopay.com")
        );
        assert!(config.api.token.is_none());
        assert!(config.webhook.secret.is_none());
    }

    #[test]
    fn template_documents_every_section() {
        let template = default_config_template();

        for section in ["[api]", "[retry]", "[webhook]", "[api.headers]"] {
            assert!(template.contains(section), "missing {section}");
        }
    }
}
