// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine configuration.

use serde::{Deserialize, Serialize};
use shiftbot::{Command, CommandVocabulary, Flow};
use shiftbot_domain::EmployeeId;
use std::collections::BTreeMap;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

/// Settings loaded once at startup and passed to every component.
///
/// Every field has a default so a partial configuration file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Roster id of the business owner. Linking this employee grants the
    /// owner role.
    pub owner_employee_id: Option<String>,
    /// E-mail addresses allowed to link a chat account. Empty allows all.
    pub allowed_emails: Vec<String>,
    /// Offset of the business's local time from UTC, in hours.
    pub utc_offset_hours: i8,
    /// Lifetime of an exchange, addition or deletion dialogue.
    pub flow_ttl_minutes: i64,
    /// Lifetime of the authentication dialogue.
    pub auth_ttl_minutes: i64,
    /// Number of days shown by the all-shifts listing, starting today.
    pub show_all_shifts_days: i64,
    /// Number of days shown by the my-shifts listing, starting today.
    pub show_my_shifts_days: i64,
    /// Extra phrases recognized as commands.
    pub command_aliases: BTreeMap<String, Command>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            owner_employee_id: None,
            allowed_emails: Vec::new(),
            utc_offset_hours: 9,
            flow_ttl_minutes: 30,
            auth_ttl_minutes: 24 * 60,
            show_all_shifts_days: 7,
            show_my_shifts_days: 31,
            command_aliases: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Returns the local offset, falling back to UTC for an out-of-range
    /// value.
    #[must_use]
    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC)
    }

    /// Returns the business's current local day.
    #[must_use]
    pub fn today(&self, now: OffsetDateTime) -> Date {
        now.to_offset(self.utc_offset()).date()
    }

    /// Returns how long a dialogue of `flow` stays alive between turns.
    #[must_use]
    pub const fn ttl_for(&self, flow: Flow) -> Duration {
        match flow {
            Flow::Authentication => Duration::minutes(self.auth_ttl_minutes),
            Flow::Exchange | Flow::Addition | Flow::Deletion => {
                Duration::minutes(self.flow_ttl_minutes)
            }
        }
    }

    /// Returns the owner's roster id, if configured.
    #[must_use]
    pub fn owner_id(&self) -> Option<EmployeeId> {
        self.owner_employee_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(EmployeeId::new)
    }

    /// Returns whether an employee with `email` may link a chat account.
    #[must_use]
    pub fn is_email_allowed(&self, email: Option<&str>) -> bool {
        if self.allowed_emails.is_empty() {
            return true;
        }
        email.is_some_and(|email| {
            self.allowed_emails
                .iter()
                .any(|allowed| allowed.trim().eq_ignore_ascii_case(email.trim()))
        })
    }

    /// Builds the command vocabulary including configured aliases.
    #[must_use]
    pub fn vocabulary(&self) -> CommandVocabulary {
        CommandVocabulary::with_defaults().with_aliases(&self.command_aliases)
    }
}
