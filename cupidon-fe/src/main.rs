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

//! # cupidon frontend
//!
//! A wall of declarations: anyone can read it, registered users can post to it & like what's on
//! it. All the real work happens on the message API's server; this is a thin [Leptos] view over
//! it, built with [trunk] for `wasm32-unknown-unknown`.
//!
//! The page is a single component, [FeedView](home::FeedView). Its state (the messages loaded so
//! far, the page cursor, the session & which of the login/register/logged-in views is showing)
//! lives in one signal holding a [Wall](wall::Wall); the operations on it live in [wall] so that
//! they can be tested off the browser.
//!
//! [Leptos]: https://book.leptos.dev
//! [trunk]: https://trunkrs.dev

use std::sync::Arc;

use leptos::prelude::*;
use thaw::{ConfigProvider, Layout, LayoutHeader};
use tracing::{error, info};
use tracing_subscriber::fmt;
use tracing_subscriber_wasm::MakeConsoleWriter;

mod feed;
mod gate;
mod home;
mod http;
mod session;
mod signin;
mod types;
mod wall;

use crate::{
    home::FeedView,
    session::{LocalStorage, Session},
    types::{Api, Config, DEFAULT_API, PageSize},
};

/// [cupidon-fe](crate) root component
#[component]
fn App() -> impl IntoView {
    let config = Config::from_build_env().unwrap_or_else(|err| {
        error!("{err}; falling back to {DEFAULT_API}");
        Config::default()
    });
    info!("Using the message API at {}.", config.api);
    provide_context(Api(config.api));
    provide_context(PageSize(config.page_size));

    // Read the persisted token exactly once; from here on, the session is the source of truth.
    let session = Session::load(Arc::new(LocalStorage));

    view! {
        <ConfigProvider>
            <Layout>
                <LayoutHeader class="banner">
                    <h1 class="title">"Mur des Déclarations 💌"</h1>
                </LayoutHeader>
                <Layout>
                    <main>
                        <FeedView session/>
                    </main>
                </Layout>
            </Layout>
        </ConfigProvider>
    }
}

fn main() {
    // A bog standard tracing-subscriber `Subscriber`, configured to output to the browser console:
    fmt()
        .with_writer(MakeConsoleWriter::default().map_trace_level_to(tracing::Level::DEBUG))
        .without_time()
        .with_ansi(false)
        .init();
    // Rust stack traces for panics, rather than "Unreachable executed"
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
