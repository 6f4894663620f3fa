// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Postback tokens attached to reply buttons.
//!
//! A token is a fixed prefix followed by a payload. Some prefixes are
//! extensions of others (`approve_addition_` starts with `approve_`), so
//! the table below is ordered longest prefix first and parsing stops at
//! the first match.

use crate::error::CoreError;
use shiftbot_domain::{Decision, RequestId, RequestKind};

#[derive(Debug, Clone, Copy)]
enum PrefixAction {
    Decide(RequestKind, Decision),
    SelectExchangeShift,
    SelectDeletionShift,
}

const PREFIXES: [(&str, PrefixAction); 9] = [
    (
        "approve_addition_",
        PrefixAction::Decide(RequestKind::Addition, Decision::Approve),
    ),
    (
        "approve_deletion_",
        PrefixAction::Decide(RequestKind::Deletion, Decision::Approve),
    ),
    (
        "reject_addition_",
        PrefixAction::Decide(RequestKind::Addition, Decision::Reject),
    ),
    (
        "reject_deletion_",
        PrefixAction::Decide(RequestKind::Deletion, Decision::Reject),
    ),
    ("deletion_shift_", PrefixAction::SelectDeletionShift),
    (
        "approve_",
        PrefixAction::Decide(RequestKind::Exchange, Decision::Approve),
    ),
    (
        "reject_",
        PrefixAction::Decide(RequestKind::Exchange, Decision::Reject),
    ),
    (
        "cancel_",
        PrefixAction::Decide(RequestKind::Exchange, Decision::Cancel),
    ),
    ("shift_", PrefixAction::SelectExchangeShift),
];

/// An action carried by a button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Postback {
    /// A shift picked during the exchange dialogue.
    SelectExchangeShift {
        /// The chosen shift.
        shift_id: i64,
    },
    /// A shift picked during the deletion dialogue.
    SelectDeletionShift {
        /// The chosen shift.
        shift_id: i64,
    },
    /// A decision on a pending request.
    Decide {
        /// Which workflow the request belongs to.
        kind: RequestKind,
        /// The decision taken.
        decision: Decision,
        /// The request.
        request_id: RequestId,
    },
}

impl Postback {
    /// Parses a postback token.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownPostback` if no prefix matches, or
    /// `CoreError::MalformedPostback` if the payload is invalid.
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        let token: &str = token.trim();
        let (payload, action) = PREFIXES
            .iter()
            .find_map(|(prefix, action)| token.strip_prefix(*prefix).map(|rest| (rest, *action)))
            .ok_or_else(|| CoreError::UnknownPostback(token.to_string()))?;

        let malformed = |reason: &str| CoreError::MalformedPostback {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        match action {
            PrefixAction::Decide(kind, decision) => {
                let request_id: RequestId =
                    RequestId::parse(payload).map_err(|e| malformed(&e.to_string()))?;
                Ok(Self::Decide {
                    kind,
                    decision,
                    request_id,
                })
            }
            PrefixAction::SelectExchangeShift => Ok(Self::SelectExchangeShift {
                shift_id: payload
                    .parse()
                    .map_err(|_| malformed("shift id must be numeric"))?,
            }),
            PrefixAction::SelectDeletionShift => Ok(Self::SelectDeletionShift {
                shift_id: payload
                    .parse()
                    .map_err(|_| malformed("shift id must be numeric"))?,
            }),
        }
    }

    /// Encodes the postback as a token.
    #[must_use]
    pub fn token(&self) -> String {
        match self {
            Self::SelectExchangeShift { shift_id } => format!("shift_{shift_id}"),
            Self::SelectDeletionShift { shift_id } => format!("deletion_shift_{shift_id}"),
            Self::Decide {
                kind,
                decision,
                request_id,
            } => {
                let prefix: &str = match (kind, decision) {
                    (RequestKind::Exchange, Decision::Approve) => "approve_",
                    (RequestKind::Exchange, Decision::Reject) => "reject_",
                    (_, Decision::Cancel) => "cancel_",
                    (RequestKind::Addition, Decision::Approve) => "approve_addition_",
                    (RequestKind::Addition, Decision::Reject) => "reject_addition_",
                    (RequestKind::Deletion, Decision::Approve) => "approve_deletion_",
                    (RequestKind::Deletion, Decision::Reject) => "reject_deletion_",
                };
                format!("{prefix}{request_id}")
            }
        }
    }
}
