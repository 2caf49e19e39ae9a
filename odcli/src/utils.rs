//! Common utilities and helper functions.

use std::env;

use regex::{Captures, Regex};

/// Replaces `${env:VAR_NAME}` placeholders with environment variable values.
///
/// Unset variables are replaced with an empty string. Anything else that
/// looks like `${...}` is left untouched.
///
/// # Example
///
/// ```rust
/// use odcli::utils::replace_env_placeholders;
///
/// unsafe { std::env::set_var("OD_DOC_DIR", "bot"); }
/// let result = replace_env_placeholders("${env:OD_DOC_DIR}/config").unwrap();
/// assert_eq!(result, "bot/config");
/// ```
pub fn replace_env_placeholders(input: &str) -> anyhow::Result<String> {
    let re = Regex::new(r"\$\{env:([A-Za-z_][A-Za-z0-9_]*)\}")?;
    let out = re.replace_all(input, |caps: &Captures| match env::var(&caps[1]) {
        Ok(value) => {
            debug!("Using {}={value}", &caps[1]);
            value
        }
        Err(_) => {
            warn!("environment variable {} is not set", &caps[1]);
            String::new()
        }
    });
    Ok(out.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_env_placeholders() {
        unsafe {
            env::set_var("OD_TEST_DIR", "/srv/bot");
            env::set_var("OD_TEST_NAME", "general");
        }
        assert_eq!(
            replace_env_placeholders("${env:OD_TEST_DIR}/config/${env:OD_TEST_NAME}.json").unwrap(),
            "/srv/bot/config/general.json"
        );
        assert_eq!(replace_env_placeholders("config/general.json").unwrap(), "config/general.json");
    }

    #[test]
    fn test_unset_and_foreign_placeholders() {
        assert_eq!(
            replace_env_placeholders("${env:OD_TEST_SURELY_UNSET_42}/a.json").unwrap(),
            "/a.json"
        );
        assert_eq!(replace_env_placeholders("${home}/a.json").unwrap(), "${home}/a.json");
        assert_eq!(replace_env_placeholders("${env:OD_TEST").unwrap(), "${env:OD_TEST");
    }
}
