// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! Chat-facing model of the shift workflow engine.
//!
//! Everything here is data: the commands a user can send, the dialogue
//! steps a user can be in, the buttons a reply can carry, and helpers for
//! reading free-form answers. Nothing in this crate touches storage.

mod command;
mod error;
mod input;
mod message;
mod postback;
mod reply;
mod state;

#[cfg(test)]
mod tests;

pub use command::{Command, CommandVocabulary};
pub use error::CoreError;
pub use input::{Confirmation, parse_index, split_selection};
pub use message::{ChatContext, IncomingMessage, MessageContent};
pub use postback::Postback;
pub use reply::{Reply, ReplyAction};
pub use state::{ConversationState, ConversationStep, Flow};
