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

//! # Requests & responses for the cupidon message API
//!
//! Response types are deliberately lenient: the server isn't ours, and a response that merely
//! *lacks* the field we care about is a business failure (bad credentials, say), not a protocol
//! error. Hence the `Option`s & the absence of `deny_unknown_fields` on anything we receive.

use secrecy::{CloneableSecret, SecretBox, SerializableSecret, zeroize::Zeroize};
use serde::{Deserialize, Serialize};

use crate::{Message, MessageId, UserId};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                           constants                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Number of messages requested per page
pub const PAGE_SIZE: usize = 10;

/// Pages are numbered from one
pub const FIRST_PAGE: u32 = 1;

/// The `localStorage` key under which the session token lives
pub const TOKEN_KEY: &str = "token";

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                           passwords                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Password(pub String);

impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize()
    }
}

impl CloneableSecret for Password {}

impl SerializableSecret for Password {}

pub type SecretPassword = SecretBox<Password>;

impl From<Password> for SecretPassword {
    fn from(value: Password) -> Self {
        SecretBox::new(Box::new(value))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                            messages                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Query parameters for `GET /messages`
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagesReq {
    pub limit: usize,
    pub page: u32,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MessagesRsp {
    pub messages: Vec<Message>,
}

/// Body for `POST /messages`
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PostMessageReq {
    pub message: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PostMessageRsp {
    #[serde(default, rename = "messageId")]
    pub message_id: Option<MessageId>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                             users                                              //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Body for `POST /register`
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterReq {
    pub name: String,
    pub email: String,
    pub password: SecretPassword,
}

/// Response to `POST /register`; the presence of `id` is the only signal of success
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegisterRsp {
    #[serde(default)]
    pub id: Option<UserId>,
}

/// Body for `POST /login`
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoginReq {
    pub email: String,
    pub password: SecretPassword,
}

/// Response to `POST /login`; likewise, no `token` means no session
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LoginRsp {
    #[serde(default)]
    pub token: Option<String>,
}
