use serde::{Deserialize, Serialize};

/// User information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    email: Option<String>,
}

impl UserIdentity {
    /// Creates a user identity from the auth provider's user record.
    #[must_use]
    pub fn new(subject: impl Into<String>, email: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            email,
        }
    }

    /// Returns the stable user id issued by the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
