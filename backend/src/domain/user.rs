//! User accounts and the values that identify them.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::identifier::define_uuid_id;

define_uuid_id! {
    /// Stable user identifier.
    pub struct UserId;
}

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;
/// Maximum email address length in characters.
pub const EMAIL_MAX: usize = 254;

/// Validation errors raised by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("username may only contain letters, digits and @/./+/-/_")]
    UsernameInvalidCharacters,
    #[error("email address must not be empty")]
    EmptyEmail,
    #[error("email address must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email address is not valid")]
    InvalidEmail,
}

/// Login name, unique across accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Examples
    /// ```
    /// use gameconnect::domain::Username;
    ///
    /// assert!(Username::new("trader_42").is_ok());
    /// assert!(Username::new("no spaces").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
        if !trimmed.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Actions gated behind elevated privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create games and articles.
    ManageCatalogue,
}

/// Application user as seen by the rest of the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the user may perform actions requiring `capability`.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageCatalogue => self.is_staff,
        }
    }
}

/// Encoded password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an already encoded PHC string.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Persisted account: the user plus their credential hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub password: PasswordDigest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice")]
    #[case("first.last+games@home")]
    #[case("Zoë-99_x")]
    fn accepts_valid_usernames(#[case] raw: &str) {
        let username = Username::new(raw).expect("valid username");
        assert_eq!(username.as_str(), raw);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("has space", UserValidationError::UsernameInvalidCharacters)]
    #[case("semi;colon", UserValidationError::UsernameInvalidCharacters)]
    fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(raw), Err(expected));
    }

    #[test]
    fn rejects_overlong_usernames() {
        let raw = "a".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(raw),
            Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
    }

    #[rstest]
    #[case("owner@example.com")]
    #[case("  spaced@example.org  ")]
    #[case("a.b+c@sub.example.co.uk")]
    fn accepts_valid_emails(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_str(), raw.trim());
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("no-at-sign", UserValidationError::InvalidEmail)]
    #[case("user@localhost", UserValidationError::InvalidEmail)]
    #[case("two@@example.com", UserValidationError::InvalidEmail)]
    fn rejects_invalid_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn only_staff_manage_the_catalogue(#[case] is_staff: bool, #[case] expected: bool) {
        let user = User {
            id: UserId::random(),
            username: Username::new("someone").expect("valid username"),
            email: EmailAddress::new("someone@example.com").expect("valid email"),
            is_staff,
            created_at: Utc::now(),
        };
        assert_eq!(user.has_capability(Capability::ManageCatalogue), expected);
    }

    #[test]
    fn digest_debug_is_redacted() {
        let digest = PasswordDigest::new("$argon2id$v=19$secret");
        assert!(!format!("{digest:?}").contains("secret"));
    }
}
