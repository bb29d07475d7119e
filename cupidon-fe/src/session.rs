// Copyright (C) 2025 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of cupidon.
//
// cupidon is free software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// cupidon is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
// even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with cupidon.  If not,
// see <http://www.gnu.org/licenses/>.

//! # cupidon-fe session context
//!
//! The session is just a bearer token sitting in `localStorage`; whether or not it's there is the
//! whole of our notion of "logged-in". Rather than poke at `localStorage` from every event handler,
//! we read it exactly once, at startup, into a [Session], hand that out through context, and route
//! every change through [Session::sign_in] & [Session::sign_out] so that the in-memory copy & the
//! persisted copy can't drift apart.

use std::sync::Arc;

use snafu::{Backtrace, prelude::*};
use tracing::{debug, error};

use cupidon_shared::{Token, api::TOKEN_KEY};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("No browser window!?"))]
    NoWindow { backtrace: Backtrace },
    #[snafu(display("localStorage is unavailable: {reason}"))]
    NoStorage { reason: String, backtrace: Backtrace },
    #[snafu(display("While reading {key} from localStorage: {reason}"))]
    Read {
        key: String,
        reason: String,
        backtrace: Backtrace,
    },
    #[snafu(display("While removing {key} from localStorage: {reason}"))]
    Remove {
        key: String,
        reason: String,
        backtrace: Backtrace,
    },
    #[snafu(display("While writing {key} to localStorage: {reason}"))]
    Write {
        key: String,
        reason: String,
        backtrace: Backtrace,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Somewhere to keep a string that outlives the page
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

/// [TokenStore] backed by the browser's `localStorage`
///
/// `web_sys::Storage` isn't `Send`, so we look it up on each call rather than holding onto it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .context(NoWindowSnafu)?
            .local_storage()
            .map_err(|err| {
                NoStorageSnafu {
                    reason: format!("{err:?}"),
                }
                .build()
            })?
            .context(NoStorageSnafu {
                reason: "no Storage object".to_owned(),
            })
    }
}

impl TokenStore for LocalStorage {
    fn get(&self) -> Result<Option<String>> {
        LocalStorage::storage()?.get_item(TOKEN_KEY).map_err(|err| {
            ReadSnafu {
                key: TOKEN_KEY.to_owned(),
                reason: format!("{err:?}"),
            }
            .build()
        })
    }
    fn set(&self, token: &str) -> Result<()> {
        LocalStorage::storage()?
            .set_item(TOKEN_KEY, token)
            .map_err(|err| {
                WriteSnafu {
                    key: TOKEN_KEY.to_owned(),
                    reason: format!("{err:?}"),
                }
                .build()
            })
    }
    fn remove(&self) -> Result<()> {
        LocalStorage::storage()?
            .remove_item(TOKEN_KEY)
            .map_err(|err| {
                RemoveSnafu {
                    key: TOKEN_KEY.to_owned(),
                    reason: format!("{err:?}"),
                }
                .build()
            })
    }
}

/// The session context
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    token: Option<Token>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Read the persisted token, once
    ///
    /// A store we can't read (private browsing, say) is treated as "not logged-in".
    pub fn load(store: Arc<dyn TokenStore>) -> Session {
        let token = match store.get() {
            Ok(Some(text)) => Token::new(text)
                .map_err(|err| debug!("Ignoring the persisted token: {err}"))
                .ok(),
            Ok(None) => None,
            Err(err) => {
                error!("Failed to read the persisted token: {err}");
                None
            }
        };
        Session { store, token }
    }
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }
    /// Persist `token` & remember it
    ///
    /// If we can't persist it, we still hold onto it for the life of the page.
    pub fn sign_in(&mut self, token: Token) {
        if let Err(err) = self.store.set(token.as_str()) {
            error!("Failed to persist the session token: {err}");
        }
        self.token = Some(token);
    }
    /// Forget the token, both here & in the store
    pub fn sign_out(&mut self) {
        if let Err(err) = self.store.remove() {
            error!("Failed to remove the persisted session token: {err}");
        }
        self.token = None;
    }
}
