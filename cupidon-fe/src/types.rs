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

//! # cupidon-fe Types, Constants & Configuration
//!
//! There's no config file & no command line in a browser; what configuration there is gets baked
//! in at build time.

use snafu::{Backtrace, prelude::*};

use cupidon_shared::{Origin, api::PAGE_SIZE, origin};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       module Error type                                        //
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("CUPIDON_API was set to {text}, which is not a usable origin: {source}"))]
    Api {
        text: String,
        #[snafu(source(from(origin::Error, Box::new)))]
        source: Box<origin::Error>,
        backtrace: Backtrace,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                   cupidon-fe common types                                      //
////////////////////////////////////////////////////////////////////////////////////////////////////

// A few new types for `use_context()`
#[derive(Clone, Debug)]
pub struct Api(pub Origin);
#[derive(Clone, Copy, Debug)]
pub struct PageSize(pub usize);

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     cupidon-fe constants                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

pub static USER_AGENT: &str = "cupidon-fe/0.1.0";

/// Where the message API lives unless told otherwise at build time
pub static DEFAULT_API: &str = "https://backend-cupidon-express.decian.ddnsfree.com:7565";

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         configuration                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug)]
pub struct Config {
    pub api: Origin,
    pub page_size: usize,
}

impl Config {
    /// Configuration with an optional API override (which is validated)
    pub fn new(api: Option<&str>) -> Result<Config> {
        let text = api.unwrap_or(DEFAULT_API);
        Ok(Config {
            api: Origin::parse(text).context(ApiSnafu {
                text: text.to_owned(),
            })?,
            page_size: PAGE_SIZE,
        })
    }
    /// Configuration as baked-in by the build environment; `CUPIDON_API` overrides the API origin
    pub fn from_build_env() -> Result<Config> {
        Config::new(option_env!("CUPIDON_API"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: Origin::parse(DEFAULT_API).expect("DEFAULT_API is a valid origin"),
            page_size: PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn configuration() {
        let cfg = Config::default();
        assert_eq!(cfg.api.to_string(), DEFAULT_API);
        assert_eq!(cfg.page_size, 10);

        let cfg = Config::new(Some("http://localhost:7565")).unwrap();
        assert_eq!(cfg.api.join("/messages"), "http://localhost:7565/messages");

        assert!(Config::new(Some("localhost")).is_err());
    }
}
