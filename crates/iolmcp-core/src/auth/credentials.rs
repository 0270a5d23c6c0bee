use std::fmt;

/// Account credentials for the OAuth2 password grant.
/// Immutable once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Form fields for the token endpoint
    pub(crate) fn password_grant_form(&self) -> [(&'static str, &str); 3] {
        [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("grant_type", "password"),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("trader", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("trader"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_password_grant_form() {
        let creds = Credentials::new("trader", "hunter2");
        assert_eq!(
            creds.password_grant_form(),
            [
                ("username", "trader"),
                ("password", "hunter2"),
                ("grant_type", "password"),
            ]
        );
    }
}
