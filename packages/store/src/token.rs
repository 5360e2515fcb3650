//! Access token persistence.
//!
//! The token obtained from the auth provider is the only state that outlives
//! the page. [`TokenStore`] abstracts where it lives: browser local storage on
//! the web ([`crate::LocalStorageTokenStore`]) or process memory elsewhere and
//! in tests ([`MemoryTokenStore`]).

use std::cell::RefCell;
use std::rc::Rc;

/// Local storage key used when the config does not name one.
pub const DEFAULT_TOKEN_KEY: &str = "access_token";

/// Storage for the bearer token sent with every backend request.
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// In-memory token storage. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    token: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.save(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}
