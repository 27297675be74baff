use std::sync::{PoisonError, RwLock};

use tokio::sync::watch;
use tracing::info;

use crate::models::token::Token;

/// Current credential plus an observable "is authenticated" signal.
pub struct AuthState {
    token: RwLock<Option<Token>>,
    authenticated: watch::Sender<bool>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthState {
    pub fn new() -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            token: RwLock::new(None),
            authenticated,
        }
    }

    /// Replaces any previous token and publishes `true`.
    pub fn store(&self, token: Token) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        self.publish(true);
    }

    /// Drops the token and publishes `false`.
    pub fn clear(&self) {
        self.token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.publish(false);
    }

    pub fn token(&self) -> Option<Token> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| token.access_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    fn publish(&self, value: bool) {
        let changed = self.authenticated.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
        if changed {
            info!(authenticated = value, "authentication state changed");
        }
    }
}
