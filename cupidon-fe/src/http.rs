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

//! # cupidon-fe HTTP utilities
//!
//! One method per endpoint of the message API, behind a trait so that the operations in
//! [wall](crate::wall) can be exercised without a browser.
//!
//! Status handling isn't uniform, on purpose: `/login` & `/register` answer failures with a JSON
//! body that simply lacks the field we want, so we parse those regardless of status & let the
//! caller decide. Everything else is checked with [error_for_status].

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use snafu::{Backtrace, prelude::*};
use tap::Pipe;
use tracing::debug;

use cupidon_shared::{
    LoginReq, LoginRsp, MessageId, MessagesReq, MessagesRsp, Origin, PostMessageReq,
    PostMessageRsp, RegisterReq, RegisterRsp, Token,
};

use crate::types::USER_AGENT;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to serialize the body for {url}: {source}"))]
    Body {
        url: String,
        source: gloo_net::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("While deserializing the response from {url}: {source}"))]
    Json {
        url: String,
        source: gloo_net::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Failed to form a query string: {source}"))]
    Query {
        source: serde_urlencoded::ser::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("While sending to {url}: {source}"))]
    Send {
        url: String,
        source: gloo_net::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("{url} answered {status} {text}"))]
    Status {
        url: String,
        status: u16,
        text: String,
        backtrace: Backtrace,
    },
}

impl Error {
    /// True if the server answered at all
    pub fn server_responded(&self) -> bool {
        matches!(self, Error::Json { .. } | Error::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn error_for_status(url: &str, rsp: Response) -> Result<Response> {
    let status = rsp.status();
    if (200..300).contains(&status) {
        Ok(rsp)
    } else {
        StatusSnafu {
            url,
            status,
            text: rsp.status_text(),
        }
        .fail()
    }
}

/// The remote message API, as the front end sees it
#[async_trait(?Send)]
pub trait FeedApi {
    /// `GET /messages?limit={page size}&page={page}`
    async fn messages(&self, page: u32) -> Result<MessagesRsp>;
    /// `POST /register`; parsed regardless of status
    async fn register(&self, req: &RegisterReq) -> Result<RegisterRsp>;
    /// `POST /login`; parsed regardless of status
    async fn login(&self, req: &LoginReq) -> Result<LoginRsp>;
    /// `POST /messages`
    async fn post_message(&self, token: &Token, req: &PostMessageReq) -> Result<PostMessageRsp>;
    /// `POST /like/{id}`; the response body, if any, is ignored
    async fn like(&self, token: &Token, id: MessageId) -> Result<()>;
}

/// [FeedApi] implementation on top of the browser's `fetch`
#[derive(Clone, Debug)]
pub struct HttpApi {
    api: Origin,
    page_size: usize,
}

impl HttpApi {
    pub fn new(api: Origin, page_size: usize) -> HttpApi {
        HttpApi { api, page_size }
    }
}

#[async_trait(?Send)]
impl FeedApi for HttpApi {
    async fn messages(&self, page: u32) -> Result<MessagesRsp> {
        let url = format!(
            "{}?{}",
            self.api.join("/messages"),
            serde_urlencoded::to_string(MessagesReq {
                limit: self.page_size,
                page,
            })
            .context(QuerySnafu)?
        );
        debug!("Sending {url}");
        Request::get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .context(SendSnafu { url: &url })?
            .pipe(|rsp| error_for_status(&url, rsp))?
            .json::<MessagesRsp>()
            .await
            .context(JsonSnafu { url })
    }

    async fn register(&self, req: &RegisterReq) -> Result<RegisterRsp> {
        let url = self.api.join("/register");
        Request::post(&url)
            .header("User-Agent", USER_AGENT)
            .json(req)
            .context(BodySnafu { url: &url })?
            .send()
            .await
            .context(SendSnafu { url: &url })?
            .json::<RegisterRsp>()
            .await
            .context(JsonSnafu { url })
    }

    async fn login(&self, req: &LoginReq) -> Result<LoginRsp> {
        let url = self.api.join("/login");
        Request::post(&url)
            .header("User-Agent", USER_AGENT)
            .json(req)
            .context(BodySnafu { url: &url })?
            .send()
            .await
            .context(SendSnafu { url: &url })?
            .json::<LoginRsp>()
            .await
            .context(JsonSnafu { url })
    }

    async fn post_message(&self, token: &Token, req: &PostMessageReq) -> Result<PostMessageRsp> {
        let url = self.api.join("/messages");
        Request::post(&url)
            .header("User-Agent", USER_AGENT)
            .header("Authorization", &token.bearer())
            .json(req)
            .context(BodySnafu { url: &url })?
            .send()
            .await
            .context(SendSnafu { url: &url })?
            .pipe(|rsp| error_for_status(&url, rsp))?
            .json::<PostMessageRsp>()
            .await
            .context(JsonSnafu { url })
    }

    async fn like(&self, token: &Token, id: MessageId) -> Result<()> {
        let url = self.api.join(&format!("/like/{id}"));
        Request::post(&url)
            .header("User-Agent", USER_AGENT)
            .header("Authorization", &token.bearer())
            .send()
            .await
            .context(SendSnafu { url: &url })?
            .pipe(|rsp| error_for_status(&url, rsp))
            .map(|_| ())
    }
}
