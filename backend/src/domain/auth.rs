//! Authentication and account-management inputs.
//!
//! Constructors validate raw strings so handlers hand services values that
//! already satisfy the credential rules.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, UserValidationError, Username};

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN: usize = 8;

/// Validation errors for login, registration and password changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must not be entirely numeric")]
    PasswordEntirelyNumeric,
    #[error("password confirmation does not match")]
    ConfirmationMismatch,
    #[error(transparent)]
    User(#[from] UserValidationError),
}

impl CredentialValidationError {
    /// Name of the request field the failure relates to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername
            | Self::User(
                UserValidationError::EmptyUsername
                | UserValidationError::UsernameTooLong { .. }
                | UserValidationError::UsernameInvalidCharacters,
            ) => "username",
            Self::User(_) => "email",
            Self::ConfirmationMismatch => "passwordConfirmation",
            Self::EmptyPassword | Self::PasswordTooShort { .. } | Self::PasswordEntirelyNumeric => {
                "password"
            }
        }
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; caller whitespace is preserved.
///
/// # Examples
/// ```
/// use gameconnect::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" trader ", "hunter22").unwrap();
/// assert_eq!(creds.username(), "trader");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for account lookups.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// New password that satisfies the password policy.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

impl NewPassword {
    /// Check `password` against the policy and its confirmation.
    pub fn new(password: &str, confirmation: &str) -> Result<Self, CredentialValidationError> {
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(CredentialValidationError::PasswordEntirelyNumeric);
        }
        if password != confirmation {
            return Err(CredentialValidationError::ConfirmationMismatch);
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Borrow the plaintext for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: Username,
    pub email: EmailAddress,
    pub password: NewPassword,
}

impl Registration {
    /// Validate raw sign-up fields.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password: NewPassword::new(password, confirmation)?,
        })
    }
}

/// Validated password change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    old_password: Zeroizing<String>,
    pub new_password: NewPassword,
}

impl PasswordChange {
    /// Validate raw password-change fields.
    pub fn try_from_parts(
        old_password: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<Self, CredentialValidationError> {
        if old_password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            old_password: Zeroizing::new(old_password.to_owned()),
            new_password: NewPassword::new(new_password, confirmation)?,
        })
    }

    /// Current password the caller claims to hold.
    #[must_use]
    pub fn old_password(&self) -> &str {
        self.old_password.as_str()
    }
}
