use thiserror::Error;
use url::Url;

/// Relay used when nothing else is configured.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000";

/// Seconds to wait for a relay response before giving up.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MAX_TIMEOUT_SECS: u64 = 120;

/// Where the tutoring relay lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelaySettings {
    base_url: String,
    timeout_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct RelaySettingsDraft {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RelaySettingsError {
    #[error("invalid relay URL: {0}")]
    InvalidBaseUrl(String),
    #[error("relay URL must use http or https")]
    UnsupportedScheme,
    #[error("timeout must be between 1 and 120 seconds")]
    InvalidTimeout,
}

impl RelaySettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `RelaySettingsError` if the URL does not parse, is not
    /// http(s), or the timeout is out of range.
    pub fn validate(self) -> Result<RelaySettings, RelaySettingsError> {
        let raw = normalize_optional(self.base_url).unwrap_or_else(|| DEFAULT_RELAY_URL.into());
        let parsed =
            Url::parse(&raw).map_err(|_| RelaySettingsError::InvalidBaseUrl(raw.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RelaySettingsError::UnsupportedScheme);
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if !(1..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(RelaySettingsError::InvalidTimeout);
        }

        Ok(RelaySettings {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }
}

impl RelaySettings {
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Absolute URL for an endpoint path such as `"chat"`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RELAY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_uses_defaults() {
        let settings = RelaySettingsDraft::new().validate().unwrap();
        assert_eq!(settings, RelaySettings::default());
        assert_eq!(settings.endpoint("chat"), "http://localhost:3000/chat");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let settings = RelaySettingsDraft {
            base_url: Some(" https://relay.example.com/api/ ".into()),
            timeout_secs: Some(5),
        }
        .validate()
        .unwrap();
        assert_eq!(settings.endpoint("/quiz"), "https://relay.example.com/api/quiz");
        assert_eq!(settings.timeout_secs(), 5);
    }

    #[test]
    fn rejects_bad_urls_and_timeouts() {
        let bad = RelaySettingsDraft {
            base_url: Some("not a url".into()),
            timeout_secs: None,
        };
        assert!(matches!(
            bad.validate(),
            Err(RelaySettingsError::InvalidBaseUrl(_))
        ));

        let ftp = RelaySettingsDraft {
            base_url: Some("ftp://relay.example.com".into()),
            timeout_secs: None,
        };
        assert_eq!(ftp.validate(), Err(RelaySettingsError::UnsupportedScheme));

        let zero = RelaySettingsDraft {
            base_url: None,
            timeout_secs: Some(0),
        };
        assert_eq!(zero.validate(), Err(RelaySettingsError::InvalidTimeout));
    }
}
