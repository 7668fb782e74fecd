//! Conversation state and the lifecycle of a chat turn.
//!
//! A turn moves `Idle -> AwaitingResponse -> {Completed | Failed | Cancelled} -> Idle`.
//! At most one request is in flight. Starting a turn, starting a session, or
//! switching sessions cancels the in-flight request first, and a response is
//! only applied when its [`RequestHandle`] is still the one the controller is
//! tracking, so a superseded response can never overwrite newer state.
//!
//! The asynchronous half of a turn is split out so that callers can keep
//! driving the controller while a request is outstanding:
//!
//! ```no_run
//! # async fn demo(mut controller: palaver::ConversationController<palaver::ChatClient, palaver::MemorySessionStore>) {
//! let client = controller.client().clone();
//! if let Some(turn) = controller.begin_turn("hello") {
//!     let result = turn.dispatch(&client).await;
//!     controller.finish_turn(turn.handle(), result);
//! }
//! # }
//! ```

use tokio_util::sync::CancellationToken;

use crate::client::ChatApiClient;
use crate::error::{Error, Result};
use crate::observability::{
    SESSIONS_CREATED, TURNS_CANCELLED, TURNS_COMPLETED, TURNS_FAILED, TURNS_STARTED,
};
use crate::store::SessionStore;
use crate::types::{ChatResponse, Message, Session, Theme};

/// Bot text shown when a turn fails for any reason other than cancellation.
pub const ERROR_REPLY: &str = "Error: Unable to get a response.";

/// Bot text shown when the endpoint answers without a reply.
pub const NO_RESPONSE_REPLY: &str = "No response.";

/// Identifies one request and carries its cancellation token.
///
/// Handles compare equal only to clones of themselves.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: u64,
    token: CancellationToken,
}

impl RequestHandle {
    fn new(id: u64) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
        }
    }

    /// The controller-unique request id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The token the request must observe.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns true once the request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl PartialEq for RequestHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RequestHandle {}

/// Whether the controller is waiting on the chat endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnStatus {
    /// No request in flight.
    Idle,
    /// A request is in flight and its placeholder is on screen.
    AwaitingResponse,
}

/// How a turn ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply replaced the placeholder and the session was saved.
    Completed,
    /// The placeholder was replaced by [`ERROR_REPLY`]; nothing was saved.
    Failed,
    /// The turn was abandoned or superseded; its result was discarded.
    Cancelled,
}

/// The synchronous half of a submitted turn, ready to be dispatched.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    handle: RequestHandle,
    text: String,
    history: Vec<String>,
}

impl PendingTurn {
    /// The handle to pass back to [`ConversationController::finish_turn`].
    pub fn handle(&self) -> &RequestHandle {
        &self.handle
    }

    /// The submitted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Message texts sent as history, ending with the submitted text.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Sends the turn to `client` under this turn's cancellation token.
    pub async fn dispatch<C: ChatApiClient + ?Sized>(&self, client: &C) -> Result<ChatResponse> {
        client
            .send(&self.text, &self.history, &self.handle.token)
            .await
    }
}

/// Everything the rendering side needs to draw the conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// Saved sessions, oldest first.
    pub sessions: Vec<Session>,
    /// Index of the session being viewed.
    pub active_session_index: usize,
    /// The visible messages, including unsaved ones and any placeholder.
    pub messages: Vec<Message>,
    /// Unsent input.
    pub draft: String,
    /// Color scheme for rendering.
    pub theme: Theme,
}

/// Owns the conversation and drives turns against a chat backend.
pub struct ConversationController<C, S> {
    client: C,
    store: S,
    state: ConversationState,
    pending: Option<RequestHandle>,
    next_request_id: u64,
}

impl<C: ChatApiClient, S: SessionStore> ConversationController<C, S> {
    /// Loads saved sessions from `store` and reopens the most recent one.
    ///
    /// An empty session is created only when nothing was saved.
    pub fn new(client: C, store: S) -> Self {
        let mut sessions = store.load();
        if sessions.is_empty() {
            sessions.push(Session::default());
            SESSIONS_CREATED.click();
        }
        let active_session_index = sessions.len() - 1;
        let messages = sessions[active_session_index].messages.clone();
        Self {
            client,
            store,
            state: ConversationState {
                sessions,
                active_session_index,
                messages,
                draft: String::new(),
                theme: Theme::default(),
            },
            pending: None,
            next_request_id: 0,
        }
    }

    /// Sets the initial theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.state.theme = theme;
        self
    }

    /// Submits `text` and waits for the turn to finish.
    ///
    /// Returns `None` without touching any state when `text` is blank.
    pub async fn submit(&mut self, text: &str) -> Option<TurnOutcome> {
        let turn = self.begin_turn(text)?;
        let result = turn.dispatch(&self.client).await;
        Some(self.finish_turn(turn.handle(), result))
    }

    /// Starts a turn: records the user message and a pending placeholder.
    ///
    /// Any in-flight request is cancelled first. Returns `None` without
    /// touching any state when `text` is blank.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() {
            return None;
        }
        self.cancel_pending();
        self.state.draft.clear();

        self.state.messages.push(Message::user(text));
        let history = self
            .state
            .messages
            .iter()
            .filter(|message| !message.pending)
            .map(|message| message.text.clone())
            .collect();
        self.state.messages.push(Message::placeholder());

        let handle = RequestHandle::new(self.next_request_id);
        self.next_request_id += 1;
        self.pending = Some(handle.clone());
        TURNS_STARTED.click();
        tracing::debug!(request = handle.id, "turn started");

        Some(PendingTurn {
            handle,
            text: text.to_string(),
            history,
        })
    }

    /// Applies the result of the request identified by `handle`.
    ///
    /// Results for any handle other than the one currently tracked are
    /// discarded without touching state.
    pub fn finish_turn(
        &mut self,
        handle: &RequestHandle,
        result: Result<ChatResponse>,
    ) -> TurnOutcome {
        if self.pending.as_ref() != Some(handle) {
            tracing::debug!(request = handle.id, "discarding superseded response");
            return TurnOutcome::Cancelled;
        }
        if handle.is_cancelled() {
            self.cancel_pending();
            return TurnOutcome::Cancelled;
        }
        match result {
            Ok(response) => {
                let text = response.text().unwrap_or(NO_RESPONSE_REPLY);
                self.resolve_placeholder(Message::bot(text));
                self.persist_active_session();
                TURNS_COMPLETED.click();
                tracing::debug!(request = handle.id, "turn completed");
                TurnOutcome::Completed
            }
            Err(err) if err.is_abort() => {
                self.cancel_pending();
                TurnOutcome::Cancelled
            }
            Err(err) => {
                self.resolve_placeholder(Message::bot(ERROR_REPLY));
                TURNS_FAILED.click();
                tracing::warn!(request = handle.id, error = %err, "turn failed");
                TurnOutcome::Failed
            }
        }
    }

    /// Cancels the in-flight request, if any, and drops its placeholder.
    ///
    /// Returns true if a request was cancelled.
    pub fn cancel_pending(&mut self) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };
        handle.token.cancel();
        self.state.messages.retain(|message| !message.pending);
        TURNS_CANCELLED.click();
        tracing::debug!(request = handle.id, "turn cancelled");
        true
    }

    /// Appends an empty session and makes it active.
    pub fn start_new_session(&mut self) {
        self.cancel_pending();
        self.state.sessions.push(Session::default());
        self.state.active_session_index = self.state.sessions.len() - 1;
        self.state.messages.clear();
        self.state.draft.clear();
        SESSIONS_CREATED.click();
    }

    /// Makes the session at `index` active and shows its saved messages.
    ///
    /// Unsaved messages of the previously active session are discarded.
    pub fn switch_session(&mut self, index: usize) -> Result<()> {
        if index >= self.state.sessions.len() {
            return Err(Error::validation(
                format!(
                    "session {index} does not exist ({} sessions)",
                    self.state.sessions.len()
                ),
                Some("index".to_string()),
            ));
        }
        self.cancel_pending();
        self.state.active_session_index = index;
        self.state.messages = self.state.sessions[index].messages.clone();
        tracing::info!(session = index, "switched session");
        Ok(())
    }

    /// Flips between the dark and light theme and returns the new one.
    pub fn toggle_theme(&mut self) -> Theme {
        self.state.theme = self.state.theme.toggled();
        self.state.theme
    }

    /// Sets the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
    }

    /// Replaces the unsent input.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.state.draft = draft.into();
    }

    fn resolve_placeholder(&mut self, message: Message) {
        self.pending = None;
        match self.state.messages.iter_mut().find(|m| m.pending) {
            Some(placeholder) => *placeholder = message,
            None => self.state.messages.push(message),
        }
    }

    fn persist_active_session(&mut self) {
        let index = self.state.active_session_index;
        self.state.sessions[index].messages = self.state.messages.clone();
        if let Err(err) = self.store.save(&self.state.sessions) {
            tracing::warn!(error = %err, "failed to save sessions");
        }
    }
}

impl<C, S> ConversationController<C, S> {
    /// A snapshot-friendly view of the whole conversation.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Saved sessions, oldest first.
    pub fn sessions(&self) -> &[Session] {
        &self.state.sessions
    }

    /// The visible messages of the active session.
    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    /// Index of the active session.
    pub fn active_session_index(&self) -> usize {
        self.state.active_session_index
    }

    /// Whether a request is in flight.
    pub fn status(&self) -> TurnStatus {
        if self.pending.is_some() {
            TurnStatus::AwaitingResponse
        } else {
            TurnStatus::Idle
        }
    }

    /// The handle of the in-flight request, if any.
    pub fn pending_handle(&self) -> Option<&RequestHandle> {
        self.pending.as_ref()
    }

    /// The current theme.
    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    /// The unsent input.
    pub fn draft(&self) -> &str {
        &self.state.draft
    }

    /// The chat backend.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The session store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
