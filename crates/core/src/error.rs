// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftbot_domain::DomainError;

/// Errors raised while interpreting chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A postback token did not match any known action.
    UnknownPostback(String),
    /// A postback token carried a malformed payload.
    MalformedPostback {
        /// The raw token.
        token: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::UnknownPostback(token) => write!(f, "Unknown postback '{token}'"),
            Self::MalformedPostback { token, reason } => {
                write!(f, "Malformed postback '{token}': {reason}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
