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

//! # The feed
//!
//! Our local picture of the wall: every message we've been sent so far, in the order we received
//! them, plus whatever we've posted ourselves stacked on top. There's no attempt at keeping this in
//! sync with the server beyond appending the next page when asked.
//!
//! Pagination is a bare page counter. Each time it moves we stamp the new value with a sequence
//! number; a page that comes back is only applied if it answers the *latest* stamp. Without that,
//! clicking "more" twice on a slow connection could append page three before page two (or append
//! page two twice).
//!
//! That cuts both ways: click "more" before the first page has arrived and page one is dropped
//! along with everything else that's been superseded. It won't show up until the page is reloaded.

use tracing::{debug, warn};

use cupidon_shared::{Message, MessageId, api::FIRST_PAGE};

/// Identifies one request for one page
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub seq: u64,
}

/// What became of a page of results
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageOutcome {
    /// This many messages were appended
    Appended(usize),
    /// The server had nothing more; nothing changed
    Empty,
    /// A later page has been requested since; the results were dropped
    Stale,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Feed {
    messages: Vec<Message>,
    request: PageRequest,
}

impl Default for Feed {
    fn default() -> Self {
        Feed::new()
    }
}

impl Feed {
    pub fn new() -> Feed {
        Feed {
            messages: Vec::new(),
            request: PageRequest {
                page: FIRST_PAGE,
                seq: 0,
            },
        }
    }
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
    pub fn page(&self) -> u32 {
        self.request.page
    }
    /// The request whose results we're currently waiting on (or last applied)
    pub fn current_request(&self) -> PageRequest {
        self.request
    }
    /// Advance the cursor by one page; the returned request supersedes any outstanding one
    pub fn load_more(&mut self) -> PageRequest {
        self.request = PageRequest {
            page: self.request.page.saturating_add(1),
            seq: self.request.seq + 1,
        };
        self.request
    }
    pub fn apply_page(&mut self, request: PageRequest, messages: Vec<Message>) -> PageOutcome {
        if request != self.request {
            debug!(
                "Dropping page {} (request #{}); now waiting on page {} (request #{})",
                request.page, request.seq, self.request.page, self.request.seq
            );
            PageOutcome::Stale
        } else if messages.is_empty() {
            warn!("No new messages to load (page {}).", request.page);
            PageOutcome::Empty
        } else {
            let n = messages.len();
            self.messages.extend(messages);
            debug!("Appended {n} messages from page {}.", request.page);
            PageOutcome::Appended(n)
        }
    }
    /// Bump the like counter on the first message bearing `id`
    ///
    /// Nothing stops the server from sending the same message on two pages; we only count the
    /// like once. Returns false if we don't have the message at all.
    pub fn like(&mut self, id: MessageId) -> bool {
        match self.messages.iter_mut().find(|msg| msg.id() == id) {
            Some(msg) => {
                msg.like();
                true
            }
            None => {
                debug!("Liked message {id}, which isn't in the feed!?");
                false
            }
        }
    }
    /// Put a freshly-posted message at the top of the wall
    pub fn prepend(&mut self, message: Message) {
        self.messages.insert(0, message);
    }
}
