use std::env;

const DEFAULT_COOKIE_NAME: &str = "user_session";
const DEFAULT_COOKIE_MAX_AGE: i64 = 7 * 24 * 60 * 60;

/// How the session id cookie is named and issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookieConfig {
    pub name: String,
    /// Lifetime in seconds sent as `Max-Age`.
    pub max_age: i64,
    pub secure: bool,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            max_age: DEFAULT_COOKIE_MAX_AGE,
            secure: false,
        }
    }
}

impl SessionCookieConfig {
    /// Read `SESSION_COOKIE_NAME`, `SESSION_COOKIE_MAX_AGE` and
    /// `SESSION_COOKIE_SECURE`, falling back to the defaults for unset or
    /// unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.name),
            max_age: env::var("SESSION_COOKIE_MAX_AGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_age),
            secure: env::var("SESSION_COOKIE_SECURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.secure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper function to set an environment variable for the duration of the test
    /// and restore the original value afterward.
    fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();

        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        let result = test();

        match original {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        result
    }

    #[test]
    #[serial]
    fn test_cookie_name() {
        with_env_var("SESSION_COOKIE_NAME", None, || {
            assert_eq!(SessionCookieConfig::from_env().name, "user_session");
        });

        with_env_var("SESSION_COOKIE_NAME", Some("CustomSessionId"), || {
            assert_eq!(SessionCookieConfig::from_env().name, "CustomSessionId");
        });
    }

    #[test]
    #[serial]
    fn test_cookie_max_age() {
        with_env_var("SESSION_COOKIE_MAX_AGE", None, || {
            assert_eq!(SessionCookieConfig::from_env().max_age, 604800); // 7 days
        });

        with_env_var("SESSION_COOKIE_MAX_AGE", Some("1800"), || {
            assert_eq!(SessionCookieConfig::from_env().max_age, 1800);
        });

        // Invalid value falls back to the default
        with_env_var("SESSION_COOKIE_MAX_AGE", Some("invalid"), || {
            assert_eq!(SessionCookieConfig::from_env().max_age, 604800);
        });
    }

    #[test]
    #[serial]
    fn test_cookie_secure() {
        with_env_var("SESSION_COOKIE_SECURE", None, || {
            assert!(!SessionCookieConfig::from_env().secure);
        });

        with_env_var("SESSION_COOKIE_SECURE", Some("true"), || {
            assert!(SessionCookieConfig::from_env().secure);
        });
    }
}
