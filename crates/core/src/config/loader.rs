use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// Overrides use a double underscore between section and key, e.g.
/// `VODSYNC_REGISTRY__SECRET` sets `registry.secret`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("VODSYNC_").ignore(&["CONFIG"]).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
[registry]
url = "https://teleup.example/api/vod"
secret = "s3cret"
page_limit = 50

[provider]
url = "https://manage.encoding.com/"
user_id = "1234"
user_key = "abcd"

[storage]
source = "ftp://ftp.example/incoming"
destination = "ftp://ftp.example/encoded"

[quality.sizes]
sd = ["0x480"]
hd = ["0x720"]

[quality.bitrates]
sd = ["1500k"]
hd = ["3500k"]
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(VALID).unwrap();
        assert_eq!(config.registry.page_limit, 50);
        assert_eq!(config.provider.user_id, "1234");
    }

    #[test]
    fn test_load_config_from_str_missing_provider() {
        let toml = r#"
[registry]
url = "https://teleup.example/api/vod"
secret = "s3cret"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{}", VALID).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.registry.url, "https://teleup.example/api/vod");
        assert_eq!(config.storage.destination, "ftp://ftp.example/encoded");
        assert_eq!(config.quality.bitrates.hd, vec!["3500k"]);
    }
}
