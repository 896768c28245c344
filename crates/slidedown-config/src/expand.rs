//! Environment variable expansion for configuration paths.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// Values without `${` are returned unchanged, so a bare `$` in a path
/// needs no escaping. An unset variable without a default is an error
/// naming the config field it appeared in.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Lookup failure carrying the variable name.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var_in_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_SLIDEDOWN_ROOT", "/srv/talks");
        }
        let result = expand_env("${TEST_SLIDEDOWN_ROOT}/deck.sd", "build.source").unwrap();
        assert_eq!(result, "/srv/talks/deck.sd");
        unsafe {
            std::env::remove_var("TEST_SLIDEDOWN_ROOT");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TEST_SLIDEDOWN_THEME");
        }
        let result = expand_env("${TEST_SLIDEDOWN_THEME:-assets}", "assets.dir").unwrap();
        assert_eq!(result, "assets");
    }

    #[test]
    fn test_expand_value_wins_over_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_SLIDEDOWN_OUTPUT", "public");
        }
        let result = expand_env("${TEST_SLIDEDOWN_OUTPUT:-html}", "build.output_dir").unwrap();
        assert_eq!(result, "public");
        unsafe {
            std::env::remove_var("TEST_SLIDEDOWN_OUTPUT");
        }
    }

    #[test]
    fn test_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TEST_SLIDEDOWN_NOPE");
        }
        let err = expand_env("${TEST_SLIDEDOWN_NOPE}", "build.output_dir").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in build.output_dir: ${TEST_SLIDEDOWN_NOPE} not set"
        );
    }

    #[test]
    fn test_plain_values_unchanged() {
        assert_eq!(expand_env("slides.sd", "build.source").unwrap(), "slides.sd");
        assert_eq!(expand_env("cost$5/deck.sd", "build.source").unwrap(), "cost$5/deck.sd");
    }
}
