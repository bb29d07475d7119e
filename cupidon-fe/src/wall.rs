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

//! # The wall's operations
//!
//! Everything the page *does*, minus the DOM. Each user action is split in two:
//!
//! 1. an `async fn` that talks to the server & boils the response down to an outcome (logging any
//!    errors on the way; none of them are shown to the user)
//! 2. a method on [Wall] that folds that outcome into local state
//!
//! The split is forced on us: the reactive state lives in a signal, and I can't hold a `&mut` into
//! a signal across an `.await`. It also means all of this can be tested against a mock [FeedApi].
//!
//! A word on consistency: likes & posts are "assume success". We bump the counter (or prepend the
//! message) as soon as the server has answered, whatever it said, and never reconcile against the
//! server's view. Reload the page for the truth.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use cupidon_shared::{
    LoginReq, Message, MessageId, Password, PostMessageReq, RegisterReq, Token, UserId,
};

use crate::{
    feed::{Feed, PageOutcome, PageRequest},
    gate::AuthView,
    http::FeedApi,
    session::Session,
};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                            outcomes                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// What the server made of a registration
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Registration {
    Registered(UserId),
    Rejected,
}

/// What the server made of a login
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Login {
    SignedIn(Token),
    Rejected,
}

/// Things worth interrupting the user for
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Notice {
    Registered,
    RegistrationFailed,
    BadCredentials,
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Registered => write!(
                f,
                "Inscription réussie ! Vous pouvez maintenant vous connecter."
            ),
            Notice::RegistrationFailed => write!(f, "Erreur lors de l'inscription."),
            Notice::BadCredentials => write!(f, "Email ou mot de passe incorrect."),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         server calls                                           //
////////////////////////////////////////////////////////////////////////////////////////////////////

// I'd really prefer to return a `Result<Vec<Message>>`, but there's nothing the caller could do
// with the error beyond logging it, so log it here & return `None`.
pub async fn load_messages(api: &impl FeedApi, page: u32) -> Option<Vec<Message>> {
    api.messages(page)
        .await
        .map_err(|err| error!("Requesting page {page} of messages: {err}"))
        .ok()
        .map(|rsp| {
            debug!("Loaded {} messages.", rsp.messages.len());
            rsp.messages
        })
}

/// Register a new account; `None` means we never got an intelligible answer
pub async fn register(
    api: &impl FeedApi,
    name: impl Into<String>,
    email: impl Into<String>,
    password: Password,
) -> Option<Registration> {
    let req = RegisterReq {
        name: name.into(),
        email: email.into(),
        password: password.into(),
    };
    match api.register(&req).await {
        Ok(rsp) => match rsp.id {
            Some(id) => {
                info!("Registered user {id}.");
                Some(Registration::Registered(id))
            }
            None => {
                info!("Registration refused: {rsp:?}");
                Some(Registration::Rejected)
            }
        },
        Err(err) => {
            error!("While registering: {err}");
            None
        }
    }
}

/// Log in; `None` means we never got an intelligible answer
pub async fn login(
    api: &impl FeedApi,
    email: impl Into<String>,
    password: Password,
) -> Option<Login> {
    let req = LoginReq {
        email: email.into(),
        password: password.into(),
    };
    match api.login(&req).await {
        Ok(rsp) => match rsp.token.map(Token::new) {
            Some(Ok(token)) => {
                info!("Login successful.");
                Some(Login::SignedIn(token))
            }
            Some(Err(err)) => {
                info!("Login refused: {err}");
                Some(Login::Rejected)
            }
            None => {
                info!("Login refused.");
                Some(Login::Rejected)
            }
        },
        Err(err) => {
            error!("While logging in: {err}");
            None
        }
    }
}

/// Like message `id`; returns true if the local counter should be bumped
///
/// Without a session this is a no-op: no request goes out. Otherwise, any answer from the server
/// (even a refusal) counts; only a transport failure doesn't.
pub async fn like(api: &impl FeedApi, session: &Session, id: MessageId) -> bool {
    let Some(token) = session.token() else {
        debug!("Ignoring a like from an anonymous user.");
        return false;
    };
    match api.like(token, id).await {
        Ok(()) => true,
        Err(err) if err.server_responded() => {
            warn!("Liking message {id}: {err}");
            true
        }
        Err(err) => {
            error!("Liking message {id}: {err}");
            false
        }
    }
}

/// Post `text`; on success, returns the message to be shown at the top of the wall
///
/// No-op (no request) without a session, or if `text` is blank. The returned message is stamped
/// with `now`, since the server doesn't tell us when it saved it.
pub async fn post_message(
    api: &impl FeedApi,
    session: &Session,
    text: &str,
    now: DateTime<Utc>,
) -> Option<Message> {
    let Some(token) = session.token() else {
        debug!("Ignoring a post from an anonymous user.");
        return None;
    };
    if text.trim().is_empty() {
        debug!("Ignoring an empty post.");
        return None;
    }
    let req = PostMessageReq {
        message: text.to_owned(),
    };
    match api.post_message(token, &req).await {
        Ok(rsp) => match rsp.message_id {
            Some(id) => Some(Message::composed(id, text, now)),
            None => {
                warn!("The server accepted our post, but didn't say under what id: {rsp:?}");
                None
            }
        },
        Err(err) => {
            error!("While posting a message: {err}");
            None
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                          local state                                           //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Everything the page knows
#[derive(Clone, Debug)]
pub struct Wall {
    pub feed: Feed,
    pub session: Session,
    pub view: AuthView,
}

impl Wall {
    pub fn new(session: Session) -> Wall {
        Wall {
            feed: Feed::new(),
            view: AuthView::for_session(&session),
            session,
        }
    }
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
    pub fn apply_page(&mut self, request: PageRequest, messages: Vec<Message>) -> PageOutcome {
        self.feed.apply_page(request, messages)
    }
    pub fn apply_registration(&mut self, outcome: Option<Registration>) -> Option<Notice> {
        match outcome? {
            Registration::Registered(_) => {
                self.view = self.view.registered();
                Some(Notice::Registered)
            }
            Registration::Rejected => Some(Notice::RegistrationFailed),
        }
    }
    pub fn apply_login(&mut self, outcome: Option<Login>) -> Option<Notice> {
        match outcome? {
            Login::SignedIn(token) => {
                self.session.sign_in(token);
                self.view = self.view.signed_in();
                None
            }
            Login::Rejected => Some(Notice::BadCredentials),
        }
    }
    pub fn logout(&mut self) {
        self.session.sign_out();
        self.view = self.view.signed_out();
    }
    pub fn apply_like(&mut self, id: MessageId, liked: bool) {
        if liked {
            self.feed.like(id);
        }
    }
    /// Returns true if the message was posted (so the draft can be cleared)
    pub fn apply_post(&mut self, message: Option<Message>) -> bool {
        match message {
            Some(message) => {
                self.feed.prepend(message);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::{cell::RefCell, collections::HashMap, sync::Arc};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use futures::executor::block_on;
    use snafu::IntoError;

    use cupidon_shared::{LoginRsp, MessagesRsp, PostMessageRsp, RegisterRsp};

    use crate::{
        http::{self, SendSnafu, StatusSnafu},
        session::test::MemoryStore,
    };

    #[derive(Clone, Debug, Eq, PartialEq)]
    enum Call {
        Messages(u32),
        Register(String),
        Login(String),
        Post(String, String),
        Like(String, MessageId),
    }

    /// How the mock should answer
    #[derive(Clone, Copy, Debug)]
    enum Answer {
        Ok,
        Refused(u16),
        Offline,
    }

    fn fail<T>(answer: Answer) -> http::Result<T> {
        match answer {
            Answer::Ok => unreachable!(),
            Answer::Refused(status) => StatusSnafu {
                url: "mock",
                status,
                text: "nope",
            }
            .fail(),
            Answer::Offline => Err(SendSnafu { url: "mock" }
                .into_error(gloo_net::Error::GlooError("offline".to_owned()))),
        }
    }

    /// Records every call; answers from canned responses
    struct MockApi {
        calls: RefCell<Vec<Call>>,
        pages: HashMap<u32, Vec<Message>>,
        register: RegisterRsp,
        login: LoginRsp,
        post: PostMessageRsp,
        answer: Answer,
    }

    impl MockApi {
        fn new() -> MockApi {
            MockApi {
                calls: RefCell::new(Vec::new()),
                pages: HashMap::new(),
                register: RegisterRsp::default(),
                login: LoginRsp::default(),
                post: PostMessageRsp::default(),
                answer: Answer::Ok,
            }
        }
        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
        fn record(&self, call: Call) -> http::Result<()> {
            self.calls.borrow_mut().push(call);
            match self.answer {
                Answer::Ok => Ok(()),
                answer => fail(answer),
            }
        }
    }

    #[async_trait(?Send)]
    impl FeedApi for MockApi {
        async fn messages(&self, page: u32) -> http::Result<MessagesRsp> {
            self.record(Call::Messages(page))?;
            Ok(MessagesRsp {
                messages: self.pages.get(&page).cloned().unwrap_or_default(),
            })
        }
        async fn register(&self, req: &RegisterReq) -> http::Result<RegisterRsp> {
            self.record(Call::Register(req.email.clone()))?;
            Ok(self.register.clone())
        }
        async fn login(&self, req: &LoginReq) -> http::Result<LoginRsp> {
            self.record(Call::Login(req.email.clone()))?;
            Ok(self.login.clone())
        }
        async fn post_message(
            &self,
            token: &Token,
            req: &PostMessageReq,
        ) -> http::Result<PostMessageRsp> {
            self.record(Call::Post(token.as_str().to_owned(), req.message.clone()))?;
            Ok(self.post.clone())
        }
        async fn like(&self, token: &Token, id: MessageId) -> http::Result<()> {
            self.record(Call::Like(token.as_str().to_owned(), id))
        }
    }

    fn msg(id: u64, text: &str, likes: u64) -> Message {
        Message::new(MessageId::new(id), text, "2024-01-01T00:00:00Z", likes)
    }

    fn anonymous() -> (Arc<MemoryStore>, Wall) {
        let store = Arc::new(MemoryStore::default());
        let wall = Wall::new(Session::load(store.clone()));
        (store, wall)
    }

    fn signed_in(token: &str) -> (Arc<MemoryStore>, Wall) {
        let store = Arc::new(MemoryStore::with_token(token));
        let wall = Wall::new(Session::load(store.clone()));
        (store, wall)
    }

    /// Fetch whatever page the feed is currently asking for, the way the page's effect does
    fn load(api: &MockApi, wall: &mut Wall) -> Option<PageOutcome> {
        let request = wall.feed.current_request();
        block_on(load_messages(api, request.page)).map(|msgs| wall.apply_page(request, msgs))
    }

    fn with_page(mut api: MockApi, page: u32, msgs: Vec<Message>) -> MockApi {
        api.pages.insert(page, msgs);
        api
    }

    #[test]
    fn initial_load() {
        let api = with_page(
            MockApi::new(),
            1,
            vec![Message::new(MessageId::new(1), "hi", "2024-01-01T00:00:00Z", 0)],
        );
        let (_, mut wall) = anonymous();
        assert_eq!(load(&api, &mut wall), Some(PageOutcome::Appended(1)));
        assert_eq!(api.calls(), vec![Call::Messages(1)]);
        assert_eq!(wall.feed.messages().len(), 1);
        assert_eq!(wall.feed.messages()[0].text(), "hi");
        assert_eq!(crate::home::like_label(&wall.feed.messages()[0]), "❤️ 0");
    }

    #[test]
    fn empty_page() {
        let api = with_page(MockApi::new(), 1, vec![msg(1, "hi", 0)]);
        let (_, mut wall) = anonymous();
        load(&api, &mut wall);
        wall.feed.load_more();
        let before = wall.feed.messages().to_vec();
        assert_eq!(load(&api, &mut wall), Some(PageOutcome::Empty));
        assert_eq!(wall.feed.messages(), before.as_slice());
        // One fetch per page, nothing more
        assert_eq!(api.calls(), vec![Call::Messages(1), Call::Messages(2)]);
    }

    #[test]
    fn failed_load_leaves_state_alone() {
        let mut api = with_page(MockApi::new(), 1, vec![msg(1, "hi", 0)]);
        let (_, mut wall) = anonymous();
        load(&api, &mut wall);
        api.answer = Answer::Refused(500);
        wall.feed.load_more();
        assert_eq!(load(&api, &mut wall), None);
        api.answer = Answer::Offline;
        assert_eq!(load(&api, &mut wall), None);
        assert_eq!(wall.feed.messages().len(), 1);
    }

    #[test]
    fn load_more_fetches_each_page_once() {
        let api = with_page(
            with_page(MockApi::new(), 2, vec![msg(2, "deux", 0)]),
            3,
            vec![msg(3, "trois", 0)],
        );
        let (_, mut wall) = anonymous();
        for expected in 2..=4 {
            let before = wall.feed.page();
            wall.feed.load_more();
            assert_eq!(wall.feed.page(), before + 1);
            assert_eq!(wall.feed.page(), expected);
            load(&api, &mut wall);
        }
        assert_eq!(
            api.calls(),
            vec![Call::Messages(2), Call::Messages(3), Call::Messages(4)]
        );
        let texts: Vec<&str> = wall.feed.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["deux", "trois"]);
    }

    #[test]
    fn login_and_logout() {
        let mut api = MockApi::new();
        api.login = LoginRsp {
            token: Some("abc".to_owned()),
        };
        let (store, mut wall) = anonymous();
        assert_eq!(wall.view, AuthView::SignIn);

        let outcome = block_on(login(&api, "romeo@verona.it", Password("j".to_owned())));
        assert_eq!(wall.apply_login(outcome), None);
        assert!(wall.is_authenticated());
        assert_eq!(wall.view, AuthView::SignedIn);
        assert_eq!(store.peek().as_deref(), Some("abc"));
        assert_eq!(api.calls(), vec![Call::Login("romeo@verona.it".to_owned())]);

        wall.logout();
        assert!(!wall.is_authenticated());
        assert_eq!(wall.view, AuthView::SignIn);
        assert!(store.peek().is_none());
        // purely local
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn login_lands_on_the_registration_form() {
        let mut api = MockApi::new();
        api.login = LoginRsp {
            token: Some("abc".to_owned()),
        };
        let (store, mut wall) = anonymous();
        let outcome = block_on(login(&api, "romeo@verona.it", Password("j".to_owned())));
        // ...meanwhile, the user clicked "Pas encore inscrit ?"
        wall.view = wall.view.show_register();
        assert_eq!(wall.view, AuthView::Register);

        assert_eq!(wall.apply_login(outcome), None);
        assert_eq!(store.peek().as_deref(), Some("abc"));
        assert_eq!(wall.view, AuthView::SignedIn);
        assert_eq!(wall.is_authenticated(), wall.view.is_authenticated());
    }

    #[test]
    fn bad_credentials() {
        let api = MockApi::new();
        let (store, mut wall) = anonymous();
        let outcome = block_on(login(&api, "romeo@verona.it", Password("x".to_owned())));
        assert_eq!(outcome, Some(Login::Rejected));
        assert_eq!(wall.apply_login(outcome), Some(Notice::BadCredentials));
        assert!(!wall.is_authenticated());
        assert!(store.peek().is_none());

        // An empty token is no token
        let mut api = MockApi::new();
        api.login = LoginRsp {
            token: Some(String::new()),
        };
        let outcome = block_on(login(&api, "romeo@verona.it", Password("x".to_owned())));
        assert_eq!(wall.apply_login(outcome), Some(Notice::BadCredentials));

        // Network trouble is logged, not shown
        let mut api = MockApi::new();
        api.answer = Answer::Offline;
        let outcome = block_on(login(&api, "romeo@verona.it", Password("x".to_owned())));
        assert_eq!(wall.apply_login(outcome), None);
        assert_eq!(wall.view, AuthView::SignIn);
    }

    #[test]
    fn registration() {
        let mut api = MockApi::new();
        api.register = RegisterRsp {
            id: Some(UserId::new(12)),
        };
        let (_, mut wall) = anonymous();
        wall.view = wall.view.show_register();
        let outcome = block_on(register(
            &api,
            "Roméo",
            "romeo@verona.it",
            Password("j".to_owned()),
        ));
        assert_eq!(wall.apply_registration(outcome), Some(Notice::Registered));
        assert_eq!(wall.view, AuthView::SignIn);
        // Registering doesn't log you in
        assert!(!wall.is_authenticated());

        let api = MockApi::new();
        wall.view = wall.view.show_register();
        let outcome = block_on(register(&api, "R", "romeo@verona.it", Password("j".to_owned())));
        assert_eq!(
            wall.apply_registration(outcome),
            Some(Notice::RegistrationFailed)
        );
        assert_eq!(wall.view, AuthView::Register);
    }

    #[test]
    fn likes_are_optimistic() {
        let mut api = with_page(
            MockApi::new(),
            1,
            vec![msg(1, "a", 0), msg(2, "b", 4), msg(3, "c", 9)],
        );
        let (_, mut wall) = signed_in("abc");
        load(&api, &mut wall);

        let id = MessageId::new(2);
        let liked = block_on(like(&api, &wall.session, id));
        wall.apply_like(id, liked);
        let likes: Vec<u64> = wall.feed.messages().iter().map(|m| m.likes()).collect();
        assert_eq!(likes, vec![0, 5, 9]);
        assert_eq!(api.calls()[1], Call::Like("abc".to_owned(), id));

        // A refusal (expired token, say) still counts...
        api.answer = Answer::Refused(401);
        let liked = block_on(like(&api, &wall.session, id));
        wall.apply_like(id, liked);
        let likes: Vec<u64> = wall.feed.messages().iter().map(|m| m.likes()).collect();
        assert_eq!(likes, vec![0, 6, 9]);

        // ...but no answer at all doesn't
        api.answer = Answer::Offline;
        let liked = block_on(like(&api, &wall.session, id));
        wall.apply_like(id, liked);
        let likes: Vec<u64> = wall.feed.messages().iter().map(|m| m.likes()).collect();
        assert_eq!(likes, vec![0, 6, 9]);
    }

    #[test]
    fn anonymous_likes_do_nothing() {
        let api = with_page(MockApi::new(), 1, vec![msg(1, "a", 0)]);
        let (_, mut wall) = anonymous();
        load(&api, &mut wall);
        let before = wall.feed.clone();
        let id = MessageId::new(1);
        let liked = block_on(like(&api, &wall.session, id));
        assert!(!liked);
        wall.apply_like(id, liked);
        assert_eq!(wall.feed, before);
        assert_eq!(api.calls(), vec![Call::Messages(1)]);
    }

    #[test]
    fn posting() {
        let now = Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap();
        let mut api = with_page(MockApi::new(), 1, vec![msg(1, "a", 3)]);
        api.post = PostMessageRsp {
            message_id: Some(MessageId::new(8)),
        };
        let (_, mut wall) = signed_in("abc");
        load(&api, &mut wall);

        let posted = block_on(post_message(&api, &wall.session, "je t'aime", now));
        assert!(wall.apply_post(posted));
        let top = &wall.feed.messages()[0];
        assert_eq!(top.id(), MessageId::new(8));
        assert_eq!(top.text(), "je t'aime");
        assert_eq!(top.likes(), 0);
        assert_eq!(top.posted().unwrap(), now);
        assert_eq!(wall.feed.messages().len(), 2);
        assert_eq!(
            api.calls()[1],
            Call::Post("abc".to_owned(), "je t'aime".to_owned())
        );

        // Failures are logged only
        api.answer = Answer::Refused(500);
        let posted = block_on(post_message(&api, &wall.session, "encore", now));
        assert!(!wall.apply_post(posted));
        assert_eq!(wall.feed.messages().len(), 2);
    }

    #[test]
    fn blank_posts_are_never_sent() {
        let now = Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap();
        let api = MockApi::new();
        let (_, wall) = signed_in("abc");
        assert!(block_on(post_message(&api, &wall.session, "", now)).is_none());
        assert!(block_on(post_message(&api, &wall.session, " \n\t ", now)).is_none());

        let (_, wall) = anonymous();
        assert!(block_on(post_message(&api, &wall.session, "coucou", now)).is_none());

        assert!(api.calls().is_empty());
    }
}
