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

//! # The authentication gate
//!
//! The top of the page shows one of three things: the login form, the registration form, or (once
//! we hold a token) the logout button & the compose box. Two independent booleans ("logged-in?",
//! "registering?") would admit a fourth, meaningless, combination, so this is an enum.
//!
//! ```text
//!   SignIn <--show_register/show_sign_in--> Register
//!     |  ^                                     |  |
//!     |  +------------ registered -------------+  |
//!  signed_in                                      |
//!     v                                           |
//!   SignedIn <------------- signed_in ------------+
//!     |
//!  signed_out --> SignIn
//! ```
//!
//! A login answered while the registration form is up still lands us in `SignedIn`: the session
//! holds a token by then, and the view must agree with it. Transitions not drawn above leave the
//! state where it is.

use tracing::debug;

use crate::session::Session;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AuthView {
    #[default]
    SignIn,
    Register,
    SignedIn,
}

impl AuthView {
    pub fn for_session(session: &Session) -> AuthView {
        if session.is_authenticated() {
            AuthView::SignedIn
        } else {
            AuthView::SignIn
        }
    }
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthView::SignedIn)
    }
    pub fn show_register(self) -> AuthView {
        self.step("show_register", |s| match s {
            AuthView::SignIn => Some(AuthView::Register),
            _ => None,
        })
    }
    pub fn show_sign_in(self) -> AuthView {
        self.step("show_sign_in", |s| match s {
            AuthView::Register => Some(AuthView::SignIn),
            _ => None,
        })
    }
    /// A registration went through; the user now needs to log in
    pub fn registered(self) -> AuthView {
        self.show_sign_in()
    }
    pub fn signed_in(self) -> AuthView {
        self.step("signed_in", |s| match s {
            AuthView::SignIn | AuthView::Register => Some(AuthView::SignedIn),
            _ => None,
        })
    }
    pub fn signed_out(self) -> AuthView {
        self.step("signed_out", |s| match s {
            AuthView::SignedIn => Some(AuthView::SignIn),
            _ => None,
        })
    }
    fn step(self, name: &str, f: impl FnOnce(AuthView) -> Option<AuthView>) -> AuthView {
        match f(self) {
            Some(next) => next,
            None => {
                debug!("Ignoring {name} in state {self:?}");
                self
            }
        }
    }
}
