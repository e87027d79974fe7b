//! INI parsing logic for converting `Ini` -> `MirrorConfig`.
//!
//! The single place where INI key names map to struct fields. Starts from
//! `MirrorConfig::default()` and overlays any values found in the file.

use super::settings::MirrorConfig;
use super::ConfigFileError;
use ini::Ini;
use std::path::PathBuf;

pub(super) fn parse_ini(ini: &Ini) -> Result<MirrorConfig, ConfigFileError> {
    let mut config = MirrorConfig::default();

    if let Some(section) = ini.section(Some("catalog")) {
        if let Some(v) = non_empty(section.get("base_url")) {
            config.catalog.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = non_empty(section.get("user_id")) {
            config.catalog.user_id = Some(v.to_string());
        }
    }

    if let Some(section) = ini.section(Some("refresh")) {
        if let Some(v) = non_empty(section.get("secret")) {
            config.refresh.secret = Some(v.to_string());
        }
        if let Some(v) = section.get("metadata_ttl") {
            config.refresh.metadata_ttl_secs = parse_secs("refresh", "metadata_ttl", v)?;
        }
        if let Some(v) = section.get("asset_ttl") {
            config.refresh.asset_ttl_secs = parse_secs("refresh", "asset_ttl", v)?;
        }
    }

    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.cache.directory = expand_tilde(v);
        }
    }

    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            config.download.timeout = parse_secs("download", "timeout", v)?;
        }
    }

    if let Some(section) = ini.section(Some("display")) {
        if let Some(v) = non_empty(section.get("site_name")) {
            config.display.site_name = v.to_string();
        }
        if let Some(v) = non_empty(section.get("color_mode")) {
            let v = v.to_lowercase();
            if v != "light" && v != "dark" {
                return Err(ConfigFileError::InvalidValue {
                    section: "display".to_string(),
                    key: "color_mode".to_string(),
                    value: v,
                    reason: "must be 'light' or 'dark'".to_string(),
                });
            }
            config.display.default_color_mode = v;
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}

fn parse_secs(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a whole number of seconds".to_string(),
        })
}

/// Expands a leading `~/` to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<MirrorConfig, ConfigFileError> {
        parse_ini(&Ini::load_from_str(text).unwrap())
    }

    #[test]
    fn empty_ini_yields_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.catalog.base_url, "https://usetrmnl.com");
        assert_eq!(config.catalog.user_id, None);
        assert_eq!(config.refresh.metadata_ttl_secs, 82_800);
        assert_eq!(config.refresh.asset_ttl_secs, 579_600);
        assert_eq!(config.cache.directory, PathBuf::from("plugins"));
        assert_eq!(config.display.default_color_mode, "light");
    }

    #[test]
    fn values_overlay_defaults() {
        let config = parse(
            "[catalog]\n\
             base_url = https://mirror.example/\n\
             user_id = 1234\n\
             [refresh]\n\
             secret = hunter2\n\
             metadata_ttl = 3600\n\
             [cache]\n\
             directory = /srv/plugins\n\
             [display]\n\
             site_name = My Mirror\n\
             color_mode = dark\n",
        )
        .unwrap();

        assert_eq!(config.catalog.base_url, "https://mirror.example");
        assert_eq!(config.catalog.user_id.as_deref(), Some("1234"));
        assert_eq!(config.refresh.secret.as_deref(), Some("hunter2"));
        assert_eq!(config.refresh.metadata_ttl_secs, 3600);
        assert_eq!(config.refresh.asset_ttl_secs, 579_600);
        assert_eq!(config.cache.directory, PathBuf::from("/srv/plugins"));
        assert_eq!(config.display.site_name, "My Mirror");
        assert_eq!(config.display.default_color_mode, "dark");
    }

    #[test]
    fn invalid_ttl_is_rejected() {
        let err = parse("[refresh]\nmetadata_ttl = soon\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
    }

    #[test]
    fn invalid_color_mode_is_rejected() {
        let err = parse("[display]\ncolor_mode = sepia\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = parse("[catalog]\nuser_id = \n").unwrap();
        assert_eq!(config.catalog.user_id, None);
    }
}
