// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::postback::Postback;
use serde::{Deserialize, Serialize};

/// A button offered alongside a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyAction {
    /// Text shown on the button.
    pub label: String,
    /// Token sent back when the button is pressed.
    pub postback: String,
}

/// A message sent back to the chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Body text.
    pub text: String,
    /// Buttons, possibly empty.
    pub actions: Vec<ReplyAction>,
}

impl Reply {
    /// Creates a plain text reply.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }

    /// Adds a button carrying `postback`.
    #[must_use]
    pub fn with_action(mut self, label: impl Into<String>, postback: &Postback) -> Self {
        self.actions.push(ReplyAction {
            label: label.into(),
            postback: postback.token(),
        });
        self
    }
}
