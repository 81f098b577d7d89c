//! Environment variable interpolation for config files.
//!
//! Supports the following syntax:
//! - `$VAR` or `${VAR}` - substitute with env var value, error if missing
//! - `${VAR:-default}` - use default if VAR is unset or empty
//! - `$$` - escape sequence for literal `$`

use regex::Regex;
use std::env;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \$\$                           # Escape sequence $$
        |
        \$\{
            ([A-Za-z_][A-Za-z0-9_]*)   # Braced variable name
            (?:
                :-
                ([^}]*)                # Optional default value
            )?
        \}
        |
        \$([A-Za-z_][A-Za-z0-9_]*)     # Unbraced $VAR
        ",
    )
    .expect("Invalid regex pattern")
});

/// Interpolate environment variables in the given text.
///
/// Errors are accumulated so the user sees every missing variable at once.
pub fn interpolate(input: &str) -> Result<String, Vec<String>> {
    let mut errors = Vec::new();

    let text = ENV_VAR_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            let full_match = caps.get(0).unwrap().as_str();
            if full_match == "$$" {
                return "$".to_string();
            }

            let var_name = caps
                .get(1)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or("");
            let default_value = caps.get(2).map(|m| m.as_str());

            match env::var(var_name) {
                Ok(value) if value.is_empty() && default_value.is_some() => {
                    default_value.unwrap_or("").to_string()
                }
                Ok(value) => value,
                Err(_) => {
                    if let Some(default) = default_value {
                        default.to_string()
                    } else {
                        errors.push(format!("environment variable '{var_name}' is not set"));
                        full_match.to_string()
                    }
                }
            }
        })
        .to_string();

    if errors.is_empty() {
        Ok(text)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let originals: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();

        // SAFETY: tests touch distinct FLURRY_TEST_* vars and restore them after
        for (key, value) in vars {
            match value {
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }

        let result = f();

        // SAFETY: restoring original environment state
        for (key, original) in originals {
            match original {
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }

        result
    }

    #[test]
    fn test_basic_substitution() {
        with_env_vars(&[("FLURRY_TEST_BASIC", Some("qemu:///session"))], || {
            let text = interpolate("uri: $FLURRY_TEST_BASIC").unwrap();
            assert_eq!(text, "uri: qemu:///session");
        });
    }

    #[test]
    fn test_braced_substitution() {
        with_env_vars(&[("FLURRY_TEST_BRACED", Some("30"))], || {
            let text = interpolate("interval_secs: ${FLURRY_TEST_BRACED}").unwrap();
            assert_eq!(text, "interval_secs: 30");
        });
    }

    #[test]
    fn test_missing_variable_error() {
        with_env_vars(&[("FLURRY_TEST_MISSING", None)], || {
            let errors = interpolate("uri: $FLURRY_TEST_MISSING").unwrap_err();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("FLURRY_TEST_MISSING"));
            assert!(errors[0].contains("not set"));
        });
    }

    #[test]
    fn test_default_value_when_unset() {
        with_env_vars(&[("FLURRY_TEST_UNSET", None)], || {
            let text = interpolate("uri: ${FLURRY_TEST_UNSET:-qemu:///system}").unwrap();
            assert_eq!(text, "uri: qemu:///system");
        });
    }

    #[test]
    fn test_default_value_when_empty() {
        with_env_vars(&[("FLURRY_TEST_EMPTY", Some(""))], || {
            let text = interpolate("uri: ${FLURRY_TEST_EMPTY:-qemu:///system}").unwrap();
            assert_eq!(text, "uri: qemu:///system");
        });
    }

    #[test]
    fn test_escape_sequence() {
        let text = interpolate("note: $$HOME is literal").unwrap();
        assert_eq!(text, "note: $HOME is literal");
    }
}
