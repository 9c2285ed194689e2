//! Support chat with the booking assistant.
//!
//! Only signed-in customers reach the assistant; anyone else gets a local
//! notice asking them to sign in. One question is answered at a time.

use crate::environment::BookingEnvironment;
use chrono::{DateTime, Utc};
use cineplex_api::{ApiError, ChatRequest, ChatResponse, ChatTurn, Sender};
use cineplex_core::{Effects, effect::Effect, reducer::Reducer};
use cineplex_runtime::Store;
use smallvec::smallvec;

/// First bot message of every conversation
pub const GREETING: &str = "Xin chào! 🍿 Mình là trợ lý đặt vé. Mình có thể giúp gì cho bạn?";

/// Shown instead of a reply when nobody is signed in
pub const SIGN_IN_NOTICE: &str = "Vui lòng đăng nhập để mình hỗ trợ bạn tốt hơn nhé! 🔒";

/// Shown when the assistant could not be reached
pub const APOLOGY: &str = "Xin lỗi, hệ thống đang gặp sự cố. Vui lòng thử lại sau. 🛠️";

/// The conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatState {
    messages: Vec<ChatTurn>,
    typing: bool,
    next_id: u64,
}

impl ChatState {
    /// Conversation holding only the greeting.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        let mut state = Self {
            messages: Vec::new(),
            typing: false,
            next_id: 0,
        };
        state.push(Sender::Bot, GREETING.to_string(), now);
        state
    }

    /// Messages in order
    #[must_use]
    pub fn messages(&self) -> &[ChatTurn] {
        &self.messages
    }

    /// True while a reply is pending
    #[must_use]
    pub const fn is_typing(&self) -> bool {
        self.typing
    }

    fn push(&mut self, sender: Sender, text: String, timestamp: DateTime<Utc>) {
        self.next_id += 1;
        let prefix = match sender {
            Sender::User => "user",
            Sender::Bot => "bot",
        };
        self.messages.push(ChatTurn {
            id: format!("{prefix}-{}", self.next_id),
            text,
            sender,
            timestamp,
        });
    }
}

/// Chat actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatAction {
    /// Customer submitted a message
    Send {
        /// Message text
        text: String,
        /// Bearer token of the current session, `None` when signed out
        token: Option<String>,
    },
    /// Assistant answered (or could not be reached)
    ReplyReceived {
        /// Reply or failure
        result: Result<ChatResponse, ApiError>,
    },
}

/// Reducer for the chat.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChatReducer;

impl ChatReducer {
    /// Create a new chat reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ChatReducer {
    type State = ChatState;
    type Action = ChatAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            ChatAction::Send { text, token } => {
                let text = text.trim();
                if text.is_empty() || state.typing {
                    return smallvec![Effect::None];
                }

                let now = env.clock().now();
                let Some(token) = token else {
                    tracing::debug!("Chat used while signed out");
                    state.push(Sender::Bot, SIGN_IN_NOTICE.to_string(), now);
                    return smallvec![Effect::None];
                };

                state.push(Sender::User, text.to_string(), now);
                state.typing = true;

                let request = ChatRequest {
                    message: text.to_string(),
                    history: state.messages.clone(),
                };
                let api = env.api();

                smallvec![Effect::future(async move {
                    let result = api.chat(&token, &request).await;
                    Some(ChatAction::ReplyReceived { result })
                })]
            },

            ChatAction::ReplyReceived { result } => {
                let text = match result {
                    Ok(response) => response.reply,
                    Err(e) => {
                        tracing::warn!(error = %e, "Chat request failed");
                        APOLOGY.to_string()
                    },
                };
                state.push(Sender::Bot, text, env.clock().now());
                state.typing = false;
                smallvec![Effect::None]
            },
        }
    }
}

/// Store running the chat.
pub type ChatStore = Store<ChatState, ChatAction, BookingEnvironment, ChatReducer>;

/// Create a chat store holding the greeting.
#[must_use]
pub fn store(env: BookingEnvironment) -> ChatStore {
    let now = env.clock().now();
    Store::new(ChatState::new(now), ChatReducer::new(), env)
}
