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

//! # cupidon-fe FeedView component

use chrono::Utc;
use leptos::{prelude::*, task::spawn_local};
use tracing::{debug, info};

use cupidon_shared::Message;

use crate::{
    feed::PageRequest,
    http::HttpApi,
    session::Session,
    signin::AuthGate,
    types::{Api, PageSize},
    wall::{Wall, like, load_messages, post_message},
};

/// Text of a message's like button
pub fn like_label(message: &Message) -> String {
    format!("❤️ {}", message.likes())
}

/// The page cursor, stamped with its request number
///
/// This is the one reactive dependency of the loader: each time it moves, exactly one fetch goes
/// out. Likes & posts touch the wall, too, but leave the request alone, so the memo keeps them from
/// re-running the loader.
pub fn page_requests(wall: RwSignal<Wall>) -> Memo<PageRequest> {
    Memo::new(move |_| wall.with(|w| w.feed.current_request()))
}

/// Render one message, along with its like button
#[component]
fn MessageCard(message: Message) -> impl IntoView {
    let wall = use_context::<RwSignal<Wall>>().expect("No wall!?");
    let api = use_context::<HttpApi>().expect("No HTTP API!?");

    let id = message.id();
    let on_like = move |_| {
        let api = api.clone();
        let session = wall.with_untracked(|w| w.session.clone());
        spawn_local(async move {
            let liked = like(&api, &session, id).await;
            wall.update(|w| w.apply_like(id, liked));
        });
    };

    let class = move || {
        if wall.with(|w| w.is_authenticated()) {
            "like-button"
        } else {
            "like-button disabled"
        }
    };

    view! {
        <div class="message-card">
            <p class="message-text">{ message.text().to_owned() }</p>
            <div class="message-footer">
                <span class="message-date">{ message.display_date() }</span>
                <button class=class on:click=on_like>{ like_label(&message) }</button>
            </div>
        </div>
    }
}

/// The compose box; only mounted while signed-in
#[component]
fn Compose() -> impl IntoView {
    let wall = use_context::<RwSignal<Wall>>().expect("No wall!?");
    let api = use_context::<HttpApi>().expect("No HTTP API!?");

    let draft = RwSignal::new(String::new());

    let on_send = move |_| {
        let api = api.clone();
        let text = draft.get_untracked();
        let session = wall.with_untracked(|w| w.session.clone());
        spawn_local(async move {
            let posted = post_message(&api, &session, &text, Utc::now()).await;
            if wall.try_update(|w| w.apply_post(posted)).unwrap_or(false) {
                draft.set(String::new());
            }
        });
    };

    view! {
        <div class="message-box">
            <textarea class="message-input" placeholder="Écrivez votre message..."
                      prop:value=move || draft.get()
                      on:input=move |ev| draft.set(event_target_value(&ev))>
            </textarea>
            <button class="send-button" on:click=on_send>"Envoyer"</button>
        </div>
    }
}

/// The wall itself
///
/// We expect the API location & the page size to be available as context; the session is handed
/// to us, having been read once at startup.
#[component]
pub fn FeedView(session: Session) -> impl IntoView {
    debug!("FeedView invoked.");

    let api = use_context::<Api>()
        .expect("Failed to retrieve the API net location")
        .0;
    let page_size = use_context::<PageSize>()
        .expect("Failed to retrieve the page size configuration item")
        .0;
    let api = HttpApi::new(api, page_size);

    let wall = RwSignal::new(Wall::new(session));
    // Make these available to our sub-components rather than prop-drilling them
    provide_context(wall);
    provide_context(api.clone());

    // Results for a cursor value that has since moved on are dropped in `Feed::apply_page`.
    let request = page_requests(wall);
    Effect::new(move |_| {
        let request = request.get();
        let api = api.clone();
        spawn_local(async move {
            if let Some(messages) = load_messages(&api, request.page).await {
                wall.update(|w| {
                    w.apply_page(request, messages);
                });
            }
        });
    });

    let authenticated = Memo::new(move |_| wall.with(|w| w.view.is_authenticated()));

    let on_more = move |_| {
        wall.update(|w| {
            w.feed.load_more();
            info!("Now on page {}.", w.feed.page());
        })
    };

    view! {
        <div class="home-container">
            <AuthGate/>
            <Show when=move || authenticated.get()>
                <Compose/>
            </Show>
            <div class="messages-list">
                <For each=move || {
                         wall.with(|w| w.feed.messages().iter().cloned().enumerate().collect::<Vec<_>>())
                     }
                     // Likes change a message in place; make sure that shows
                     key=|(idx, message)| (*idx, message.id(), message.likes())
                     let:item>
                    <MessageCard message=item.1/>
                </For>
            </div>
            <button class="load-more" on:click=on_more>"Voir plus"</button>
        </div>
    }
}
