// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversation state queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::ConversationRow;
use crate::diesel_schema::conversation_states;
use crate::error::PersistenceError;

/// Retrieves the raw stored state row for a chat user, expired or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_conversation_row(
    conn: &mut SqliteConnection,
    chat_user_id: &str,
) -> Result<Option<ConversationRow>, PersistenceError> {
    Ok(conversation_states::table
        .find(chat_user_id)
        .select(ConversationRow::as_select())
        .first(conn)
        .optional()?)
}
