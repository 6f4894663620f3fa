// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of an employee as it appears in the roster.
///
/// Identifiers are trimmed on construction; comparison is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Creates a new employee identifier.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw identifier
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Creates an identifier, rejecting empty input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmployeeId` when the trimmed value is empty.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let id: Self = Self::new(value);
        if id.0.is_empty() {
            return Err(DomainError::InvalidEmployeeId(String::from(
                "employee id must not be empty",
            )));
        }
        Ok(id)
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a linked employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular staff member.
    #[default]
    Employee,
    /// The store owner. Owners create addition requests and decide deletions.
    Owner,
}

impl Role {
    /// Converts this role to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Owner => "owner",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Self::Employee),
            "owner" => Ok(Self::Owner),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employee whose chat account has been linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Roster identifier.
    pub employee_id: EmployeeId,
    /// Name shown in replies.
    pub display_name: String,
    /// Role held by the employee.
    pub role: Role,
    /// The chat platform user bound to this employee, if any.
    pub chat_user_id: Option<String>,
}

impl Employee {
    /// Returns whether this employee is the owner.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }

    /// Returns the lightweight candidate view of this employee.
    #[must_use]
    pub fn as_candidate(&self) -> Candidate {
        Candidate {
            employee_id: self.employee_id.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// An employee offered as a choice during a dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Roster identifier.
    pub employee_id: EmployeeId,
    /// Name shown in replies.
    pub display_name: String,
}

impl Candidate {
    /// Creates a new candidate.
    #[must_use]
    pub fn new(employee_id: EmployeeId, display_name: &str) -> Self {
        Self {
            employee_id,
            display_name: display_name.to_string(),
        }
    }
}
