// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversation state mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::diesel_schema::conversation_states;
use crate::error::PersistenceError;

/// Replaces the stored state for a chat user.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn put_conversation_row(
    conn: &mut SqliteConnection,
    chat_user_id: &str,
    step_json: &str,
    created_at: i64,
    expires_at: i64,
) -> Result<(), PersistenceError> {
    diesel::replace_into(conversation_states::table)
        .values((
            conversation_states::chat_user_id.eq(chat_user_id),
            conversation_states::step_json.eq(step_json),
            conversation_states::created_at.eq(created_at),
            conversation_states::expires_at.eq(expires_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Removes the stored state for a chat user.
///
/// Returns whether a row existed.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn delete_conversation_row(
    conn: &mut SqliteConnection,
    chat_user_id: &str,
) -> Result<bool, PersistenceError> {
    let deleted: usize =
        diesel::delete(conversation_states::table.find(chat_user_id)).execute(conn)?;
    Ok(deleted > 0)
}
