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

//! The origin at which the message API lives
//!
//! [Url] would do, but it's too broad: it admits opaque origins, arbitrary schemes, paths &
//! queries, none of which make sense as the base onto which we append `/messages` & friends. An
//! [Origin] is scheme (http or https), host & optional port, and displays without a trailing
//! slash.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use snafu::{Backtrace, prelude::*};
use url::Url;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{text} carries a path, query or fragment; only an origin is wanted"))]
    NotAnOrigin { text: String, backtrace: Backtrace },
    #[snafu(display("{text} results in an opaque origin"))]
    OpaqueOrigin { text: String, backtrace: Backtrace },
    #[snafu(display("Failed to parse {text} as an URL: {source}"))]
    OriginUrl {
        text: String,
        source: url::ParseError,
        backtrace: Backtrace,
    },
    #[snafu(display("{text} can't be interepreted as a protocol"))]
    Protocol { text: String, backtrace: Backtrace },
}

pub type Result<T> = std::result::Result<T, Error>;

type StdResult<T, E> = std::result::Result<T, E>;

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Origin(String);

impl Origin {
    pub fn parse(text: &str) -> Result<Origin> {
        let url = Url::parse(text).context(OriginUrlSnafu {
            text: text.to_owned(),
        })?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            ProtocolSnafu {
                text: text.to_owned()
            }
        );
        ensure!(
            url.path() == "/" && url.query().is_none() && url.fragment().is_none(),
            NotAnOriginSnafu {
                text: text.to_owned()
            }
        );
        let origin = url.origin();
        ensure!(
            origin.is_tuple(),
            OpaqueOriginSnafu {
                text: text.to_owned()
            }
        );
        Ok(Origin(origin.ascii_serialization()))
    }
    /// Form the URL for an API path; `path` should begin with '/'
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Origin {
    type Err = Error;
    fn from_str(s: &str) -> StdResult<Self, Self::Err> {
        Origin::parse(s)
    }
}

impl TryFrom<String> for Origin {
    type Error = Error;
    fn try_from(value: String) -> StdResult<Self, Self::Error> {
        Origin::parse(&value)
    }
}

impl From<Origin> for String {
    fn from(value: Origin) -> Self {
        value.0
    }
}
