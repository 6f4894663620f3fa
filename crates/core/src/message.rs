// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Where a message was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatContext {
    /// A one-to-one chat with the bot.
    Direct,
    /// A group or room the bot is a member of.
    Group,
}

/// The payload of an incoming chat event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MessageContent {
    /// Free text typed by the user.
    Text(String),
    /// A token attached to a button the user pressed.
    Postback(String),
}

/// A chat event addressed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// The chat platform's identifier for the sender.
    pub chat_user_id: String,
    /// Where the message was sent.
    pub context: ChatContext,
    /// What was sent.
    pub content: MessageContent,
}

impl IncomingMessage {
    /// Creates a text message.
    #[must_use]
    pub fn text(chat_user_id: &str, context: ChatContext, text: &str) -> Self {
        Self {
            chat_user_id: chat_user_id.to_string(),
            context,
            content: MessageContent::Text(text.to_string()),
        }
    }

    /// Creates a postback event.
    #[must_use]
    pub fn postback(chat_user_id: &str, context: ChatContext, token: &str) -> Self {
        Self {
            chat_user_id: chat_user_id.to_string(),
            context,
            content: MessageContent::Postback(token.to_string()),
        }
    }
}
