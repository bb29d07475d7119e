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

//! # cupidon-fe authentication gate
//!
//! Login & registration forms while anonymous, a logout button once signed-in. Which of the three
//! is showing is [AuthView]'s business; this module just draws it.

use leptos::{either::EitherOf3, ev::SubmitEvent, prelude::*, task::spawn_local};
use tracing::{debug, error};

use cupidon_shared::Password;

use crate::{
    gate::AuthView,
    http::HttpApi,
    wall::{Notice, Wall, login, register},
};

/// Tell the user something, modally
pub fn notify(notice: Notice) {
    if let Err(err) = window().alert_with_message(&notice.to_string()) {
        error!("Failed to alert the user ({notice:?}): {err:?}");
    }
}

/// The top of the wall: whichever of the login form, the registration form or the logout button
/// is appropriate
///
/// We expect the [Wall] signal & the [HttpApi] to be available as context.
#[component]
pub fn AuthGate() -> impl IntoView {
    debug!("AuthGate invoked.");

    let wall = use_context::<RwSignal<Wall>>().expect("No wall!?");
    let api = use_context::<HttpApi>().expect("No HTTP API!?");

    // The form fields are shared between the two forms, so that switching back & forth doesn't
    // lose what's been typed.
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    // Only re-render when the gate actually moves, not on every like
    let gate = Memo::new(move |_| wall.with(|w| w.view));

    let login_api = api.clone();
    let on_login = move |ev: SubmitEvent| {
        // If I don't say this, the page reloads before the HTTP call returns
        ev.prevent_default();
        let api = login_api.clone();
        let email = email.get_untracked();
        let secret = Password(password.get_untracked());
        spawn_local(async move {
            let outcome = login(&api, email, secret).await;
            if let Some(notice) = wall.try_update(|w| w.apply_login(outcome)).flatten() {
                notify(notice);
            } else if wall.with_untracked(|w| w.is_authenticated()) {
                password.set(String::new());
            }
        });
    };

    let on_register = move |ev: SubmitEvent| {
        ev.prevent_default();
        let api = api.clone();
        let name = name.get_untracked();
        let email = email.get_untracked();
        let secret = Password(password.get_untracked());
        spawn_local(async move {
            let outcome = register(&api, name, email, secret).await;
            if let Some(notice) = wall.try_update(|w| w.apply_registration(outcome)).flatten() {
                notify(notice);
            }
        });
    };

    let email_input = move || {
        view! {
            <input type="email" placeholder="Email" required
                   prop:value=move || email.get()
                   on:input=move |ev| email.set(event_target_value(&ev)) />
        }
    };
    let password_input = move || {
        view! {
            <input type="password" placeholder="Mot de passe" required
                   prop:value=move || password.get()
                   on:input=move |ev| password.set(event_target_value(&ev)) />
        }
    };

    view! {
        {move || match gate.get() {
            AuthView::SignIn => EitherOf3::A(view! {
                <div class="auth-container">
                    <form class="auth-box" on:submit=on_login.clone()>
                        <h2>"Connexion"</h2>
                        {email_input()}
                        {password_input()}
                        <button type="submit" class="auth-button">"Se connecter"</button>
                        <p on:click=move |_| wall.update(|w| w.view = w.view.show_register())>
                            "Pas encore inscrit ? Créer un compte"
                        </p>
                    </form>
                </div>
            }),
            AuthView::Register => EitherOf3::B(view! {
                <div class="auth-container">
                    <form class="auth-box" on:submit=on_register.clone()>
                        <h2>"Inscription"</h2>
                        <input type="text" placeholder="Nom" required
                               prop:value=move || name.get()
                               on:input=move |ev| name.set(event_target_value(&ev)) />
                        {email_input()}
                        {password_input()}
                        <button type="submit" class="auth-button">"S'inscrire"</button>
                        <p on:click=move |_| wall.update(|w| w.view = w.view.show_sign_in())>
                            "Déjà un compte ? Se connecter"
                        </p>
                    </form>
                </div>
            }),
            AuthView::SignedIn => EitherOf3::C(view! {
                <button class="logout-button" on:click=move |_| wall.update(|w| w.logout())>
                    "Se déconnecter"
                </button>
            }),
        }}
    }
}
