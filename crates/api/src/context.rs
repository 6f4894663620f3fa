// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared dependencies of the dialogue router, workflows and coordinator.

use shiftbot_domain::{Candidate, EmployeeId};
use std::collections::HashMap;
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tracing::warn;

use crate::config::EngineConfig;
use crate::ports::{NotificationEvent, Notifier, Roster, RosterEntry, dispatch};

/// Configuration and collaborators, injected once at startup.
#[derive(Clone)]
pub struct EngineContext {
    config: EngineConfig,
    roster: Arc<dyn Roster>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EngineContext {
    /// Creates a context.
    #[must_use]
    pub fn new(config: EngineConfig, roster: Arc<dyn Roster>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            roster,
            notifier,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the business's current local day.
    #[must_use]
    pub fn today(&self, now: OffsetDateTime) -> Date {
        self.config.today(now)
    }

    /// Lists roster entries.
    ///
    /// A failing roster is logged and treated as empty, so callers report
    /// that no one is available instead of failing.
    #[must_use]
    pub fn roster_entries(&self) -> Vec<RosterEntry> {
        self.roster.list_employees().unwrap_or_else(|e| {
            warn!(error = %e, "Roster lookup failed; continuing with an empty roster");
            Vec::new()
        })
    }

    /// Snapshots the roster for name lookups.
    #[must_use]
    pub fn directory(&self) -> Directory {
        Directory::from_entries(&self.roster_entries())
    }

    /// Sends notifications for a committed change.
    pub fn notify(&self, events: &[NotificationEvent]) {
        dispatch(self.notifier.as_ref(), events);
    }
}

/// Display names keyed by employee id.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    names: HashMap<EmployeeId, String>,
}

impl Directory {
    /// Builds a directory from roster entries.
    #[must_use]
    pub fn from_entries(entries: &[RosterEntry]) -> Self {
        Self {
            names: entries
                .iter()
                .map(|e| (EmployeeId::new(&e.employee_id), e.display_name.clone()))
                .collect(),
        }
    }

    /// Returns the display name for `employee_id`, or the id itself when
    /// the roster does not know it.
    #[must_use]
    pub fn name(&self, employee_id: &EmployeeId) -> String {
        self.names
            .get(employee_id)
            .cloned()
            .unwrap_or_else(|| employee_id.value().to_string())
    }

    /// Returns `employee_id` as a candidate.
    #[must_use]
    pub fn candidate(&self, employee_id: &EmployeeId) -> Candidate {
        Candidate::new(employee_id.clone(), &self.name(employee_id))
    }
}
