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

//! # cupidon-shared
//!
//! Entities that cross the wire between the cupidon front end & the message API. The server isn't
//! ours; these types describe what it sends & what it expects, nothing more. Keep this crate free of
//! anything that won't build for `wasm32-unknown-unknown`.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use snafu::{Backtrace, prelude::*};

pub mod api;
pub mod origin;

pub use api::{
    LoginReq, LoginRsp, MessagesReq, MessagesRsp, Password, PostMessageReq, PostMessageRsp,
    RegisterReq, RegisterRsp, SecretPassword,
};
pub use origin::Origin;

type StdResult<T, E> = std::result::Result<T, E>;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       module Error type                                        //
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("A session token may not be empty"))]
    EmptyToken { backtrace: Backtrace },
    #[snafu(display("{text} is neither an RFC 3339 nor a SQL timestamp: {source}"))]
    Timestamp {
        text: String,
        source: chrono::ParseError,
        backtrace: Backtrace,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                          Identifiers                                           //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Declare a newtype wrapping one of the server's integer identifiers
///
/// The server hands out plain integers for both users & messages; I don't want to be able to pass
/// one where the other is expected.
#[macro_export]
macro_rules! define_id {
    ($type_name:ident) => {
        #[derive(
            Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
        )]
        #[serde(transparent)]
        pub struct $type_name(u64);
        impl $type_name {
            pub fn new(n: u64) -> $type_name {
                $type_name(n)
            }
            pub fn get(&self) -> u64 {
                self.0
            }
        }
        impl From<u64> for $type_name {
            fn from(n: u64) -> Self {
                $type_name(n)
            }
        }
        impl Display for $type_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(MessageId);
define_id!(UserId);

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                            Message                                             //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Format used by the server's SQL layer when it doesn't bother with RFC 3339
const SQL_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Format in which we display timestamps
const DISPLAY_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `date_save` value as the server sends it
///
/// I've seen both RFC 3339 & "YYYY-MM-DD HH:MM:SS" come back; the latter is assumed to be UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(text, SQL_TIMESTAMP)
            .map(|naive| naive.and_utc())
            .context(TimestampSnafu {
                text: text.to_owned(),
            }),
    }
}

/// A message on the wall
///
/// Server-owned; what we hold is a cached copy. The only thing we ever change locally is the like
/// counter, and only optimistically.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Message {
    id: MessageId,
    message: String,
    // Kept verbatim: the server's format isn't documented, and I'd rather display something odd
    // than drop the message on the floor.
    date_save: String,
    likes: u64,
}

impl Message {
    pub fn new(
        id: MessageId,
        message: impl Into<String>,
        date_save: impl Into<String>,
        likes: u64,
    ) -> Message {
        Message {
            id,
            message: message.into(),
            date_save: date_save.into(),
            likes,
        }
    }
    /// Build the local copy of a message we just posted; the server won't tell us its timestamp,
    /// so we use ours.
    pub fn composed(id: MessageId, message: impl Into<String>, now: DateTime<Utc>) -> Message {
        Message::new(id, message, now.to_rfc3339_opts(SecondsFormat::Millis, true), 0)
    }
    pub fn id(&self) -> MessageId {
        self.id
    }
    pub fn text(&self) -> &str {
        &self.message
    }
    pub fn date_save(&self) -> &str {
        &self.date_save
    }
    pub fn likes(&self) -> u64 {
        self.likes
    }
    pub fn like(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }
    pub fn posted(&self) -> Result<DateTime<Utc>> {
        parse_timestamp(&self.date_save)
    }
    /// Human-readable timestamp in the browser's local time; falls back to whatever the server
    /// sent us
    pub fn display_date(&self) -> String {
        self.display_date_in(&Local)
    }
    pub fn display_date_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: Display,
    {
        self.posted()
            .map(|dt| dt.with_timezone(tz).format(DISPLAY_TIMESTAMP).to_string())
            .unwrap_or_else(|_| self.date_save.clone())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                             Token                                              //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// An opaque bearer credential minted by the server on login
///
/// We never look inside it, nor check its expiry. `Debug` won't print it.
#[derive(Clone, Eq, PartialEq)]
pub struct Token(String);

impl Token {
    pub fn new(text: impl Into<String>) -> Result<Token> {
        let text = text.into();
        ensure!(!text.trim().is_empty(), EmptyTokenSnafu);
        Ok(Token(text))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Value for an `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "Token(<redacted>)")
    }
}

impl TryFrom<String> for Token {
    type Error = Error;
    fn try_from(value: String) -> StdResult<Self, Self::Error> {
        Token::new(value)
    }
}
