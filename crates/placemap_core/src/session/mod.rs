//! Explicit login session over an injectable key-value store.
//!
//! # Responsibility
//! - Hold login flag and credentials between page interactions.
//! - Derive navigation badge text and the basic-auth header.
//!
//! # Invariants
//! - `sign_in` either writes every session key or none.
//! - `sign_out` removes every session key.
//! - The logged-in flag is only trusted when credentials are present.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const LOGGED_IN_KEY: &str = "logged_in";
pub const BACKEND_ID_KEY: &str = "backend_id";
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";

const SESSION_KEYS: &[&str] = &[LOGGED_IN_KEY, BACKEND_ID_KEY, USERNAME_KEY, PASSWORD_KEY];

pub const LOGIN_LABEL: &str = "Login";
pub const LOGOUT_LABEL: &str = "Logout";

static BACKEND_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid backend id regex"));

/// Returns whether `value` is a well-formed backend id.
pub fn is_valid_backend_id(value: &str) -> bool {
    BACKEND_ID_RE.is_match(value)
}

/// Ephemeral key-value storage (browser session storage or equivalent).
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Process-local `SessionStore`.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Sign-in validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidBackendId(String),
    BlankUsername,
    BlankPassword,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBackendId(value) => write!(f, "backend id is invalid: `{value}`"),
            Self::BlankUsername => write!(f, "username cannot be blank"),
            Self::BlankPassword => write!(f, "password cannot be blank"),
        }
    }
}

impl Error for SessionError {}

/// Signed-in identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub backend_id: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("backend_id", &self.backend_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login session with a set-on-login / clear-on-logout lifecycle.
pub struct Session<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and records credentials.
    pub fn sign_in(
        &mut self,
        backend_id: &str,
        username: &str,
        password: &str,
    ) -> Result<Credentials, SessionError> {
        let backend_id = backend_id.trim();
        if !is_valid_backend_id(backend_id) {
            return Err(SessionError::InvalidBackendId(backend_id.to_string()));
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(SessionError::BlankUsername);
        }
        if password.is_empty() {
            return Err(SessionError::BlankPassword);
        }

        self.store.set(BACKEND_ID_KEY, backend_id);
        self.store.set(USERNAME_KEY, username);
        self.store.set(PASSWORD_KEY, password);
        self.store.set(LOGGED_IN_KEY, "true");
        info!(
            "event=session_sign_in module=session status=ok backend_id={}",
            backend_id
        );

        Ok(Credentials {
            backend_id: backend_id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Clears every session key. Safe to call when already signed out.
    pub fn sign_out(&mut self) {
        let was_signed_in = self.is_signed_in();
        for key in SESSION_KEYS {
            self.store.remove(key);
        }
        if was_signed_in {
            info!("event=session_sign_out module=session status=ok");
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.credentials().is_some()
    }

    /// Stored credentials, when the logged-in flag and every field are present.
    pub fn credentials(&self) -> Option<Credentials> {
        if self.store.get(LOGGED_IN_KEY).as_deref() != Some("true") {
            return None;
        }
        Some(Credentials {
            backend_id: self.store.get(BACKEND_ID_KEY)?,
            username: self.store.get(USERNAME_KEY)?,
            password: self.store.get(PASSWORD_KEY)?,
        })
    }

    /// `Basic <base64(username:password)>` for the signed-in user.
    pub fn authorization_header(&self) -> Option<String> {
        let credentials = self.credentials()?;
        let token = STANDARD.encode(format!("{}:{}", credentials.username, credentials.password));
        Some(format!("Basic {token}"))
    }

    /// Navigation badge text.
    pub fn nav_label(&self) -> &'static str {
        if self.is_signed_in() {
            LOGOUT_LABEL
        } else {
            LOGIN_LABEL
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
