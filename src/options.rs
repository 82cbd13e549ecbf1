use serde::Deserialize;

/// Retry settings in a form suitable for config files.
///
/// Fields are signed so that out-of-range values surface as
/// [`ConfigError`](crate::ConfigError)s when applied with
/// [`Builder::options`](crate::Builder::options) rather than as parse errors.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Maximum number of transport invocations per request, at least 1.
    pub max_attempts: i64,
    /// Fixed pause between attempts in milliseconds.
    pub delay_ms: i64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            delay_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RetryOptions;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: RetryOptions =
            serde_json::from_str(r#"{"max_attempts": 4}"#).expect("options must parse");
        assert_eq!(
            options,
            RetryOptions {
                max_attempts: 4,
                delay_ms: 0,
            }
        );
    }

    #[test]
    fn negative_values_still_parse() {
        let options: RetryOptions = serde_json::from_str(r#"{"max_attempts": -1, "delay_ms": -5}"#)
            .expect("options must parse");
        assert_eq!(options.max_attempts, -1);
        assert_eq!(options.delay_ms, -5);
    }
}
