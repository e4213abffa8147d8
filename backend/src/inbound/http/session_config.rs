//! Cookie-session settings read from the environment.
//!
//! | Variable | Meaning | Debug default |
//! |---|---|---|
//! | `SESSION_KEY_FILE` | path to at least 64 bytes of key material | generated key |
//! | `SESSION_COOKIE_SECURE` | mark the cookie `Secure` | `true` |
//! | `SESSION_SAMESITE` | `Strict`, `Lax` or `None` | `Lax` |
//! | `SESSION_ALLOW_EPHEMERAL` | accept a generated key when the file is unreadable | `false` |
//!
//! Debug builds log a warning and fall back to the default for any missing or
//! malformed value. Release builds refuse to start instead.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const DEFAULT_KEY_PATH: &str = "/var/run/secrets/gameconnect_session_key";
const MIN_KEY_LEN: usize = 64;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// How strictly session variables are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode matching the current compilation profile.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    /// Return `fallback` with a warning in debug builds, `err` otherwise.
    fn tolerate<T>(self, fallback: T, err: SessionConfigError) -> Result<T, SessionConfigError> {
        match self {
            Self::Debug => {
                warn!(error = %err, "session setting ignored in debug build");
                Ok(fallback)
            }
            Self::Release => Err(err),
        }
    }
}

/// Validated session cookie settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    #[error("missing required environment variable {name}")]
    Missing { name: &'static str },
    #[error("invalid {name}={value:?}; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("cannot read session key {path}: {source}")]
    KeyUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key {path} holds {length} bytes; at least {min} are required")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min: usize,
    },
    #[error("SESSION_SAMESITE=None needs SESSION_COOKIE_SECURE enabled")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL cannot be enabled in release builds")]
    EphemeralInRelease,
}

/// Read and validate every session variable.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = toggle(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = toggle(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralInRelease);
    }
    let key = session_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    debug_default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return mode.tolerate(debug_default, SessionConfigError::Missing { name });
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => mode.tolerate(
            debug_default,
            SessionConfigError::Invalid {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return mode.tolerate(SameSite::Lax, SessionConfigError::Missing { name: SAMESITE_ENV });
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => mode.tolerate(SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => mode.tolerate(
            SameSite::Lax,
            SessionConfigError::Invalid {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn session_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_PATH.to_owned()),
    );
    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if allow_ephemeral || mode == BuildMode::Debug => {
            warn!(path = %path.display(), error = %source, "using an ephemeral session key");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyUnreadable { path, source }),
    };
    let length = bytes.len();
    let result = if length < MIN_KEY_LEN && mode == BuildMode::Release {
        Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min: MIN_KEY_LEN,
        })
    } else {
        Ok(Key::derive_from(&bytes))
    };
    bytes.zeroize();
    result
}
