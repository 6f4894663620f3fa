// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Arc;

use shiftbot::{ChatContext, ConversationStep, IncomingMessage, Reply};
use shiftbot_domain::{Candidate, Employee, EmployeeId, NewShift, Role, Shift, TimeRange};
use shiftbot_persistence::Persistence;
use time::macros::datetime;
use time::{Date, Month, OffsetDateTime, Time};

use crate::{
    DialogRouter, EngineConfig, EngineContext, NotificationEvent, Notifier, NotifyError,
    RecordingNotifier, RosterEntry, StaticRoster,
};

pub const OWNER: &str = "U-owner";
pub const ALICE: &str = "U-alice";
pub const BOB: &str = "U-bob";

/// 18:00 on 2025-09-01 in the default UTC+9 business time zone.
pub fn test_now() -> OffsetDateTime {
    datetime!(2025-09-01 09:00 UTC)
}

pub fn create_test_date(day: u8) -> Date {
    Date::from_calendar_date(2025, Month::September, day).unwrap()
}

pub fn create_test_range(start: (u8, u8), end: (u8, u8)) -> TimeRange {
    TimeRange::new(
        Time::from_hms(start.0, start.1, 0).unwrap(),
        Time::from_hms(end.0, end.1, 0).unwrap(),
    )
    .unwrap()
}

pub fn roster_entry(id: &str, name: &str) -> RosterEntry {
    RosterEntry {
        employee_id: id.to_string(),
        display_name: name.to_string(),
        email: Some(format!("{id}@example.com")),
    }
}

pub fn create_test_roster() -> Vec<RosterEntry> {
    vec![
        roster_entry("owner", "Owner"),
        roster_entry("alice", "Alice"),
        roster_entry("bob", "Bob"),
        roster_entry("carol", "Carol"),
    ]
}

pub fn create_test_config() -> EngineConfig {
    EngineConfig {
        owner_employee_id: Some(String::from("owner")),
        ..EngineConfig::default()
    }
}

pub fn candidate(id: &str, name: &str) -> Candidate {
    Candidate::new(EmployeeId::new(id), name)
}

/// A notifier whose channel is always down.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _event: &NotificationEvent) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable(String::from("channel offline")))
    }
}

/// A router over an in-memory database with a recording notifier.
pub struct TestEngine {
    pub router: DialogRouter,
    pub persistence: Persistence,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with(create_test_config(), create_test_roster())
    }

    pub fn with(config: EngineConfig, roster: Vec<RosterEntry>) -> Self {
        let notifier: Arc<RecordingNotifier> = Arc::new(RecordingNotifier::new());
        let shared: Arc<dyn Notifier> = notifier.clone();
        let context = EngineContext::new(config, Arc::new(StaticRoster::new(roster)), shared);
        Self {
            router: DialogRouter::new(context),
            persistence: Persistence::new_in_memory().expect("Failed to create in-memory database"),
            notifier,
        }
    }

    /// A started engine with the owner and three employees linked.
    pub fn with_staff() -> Self {
        let mut engine = Self::new();
        engine.link_staff();
        engine
    }

    pub fn context(&self) -> &EngineContext {
        self.router.context()
    }

    /// Links `owner`, `alice`, `bob` and `carol` to chat ids `U-{id}`.
    pub fn link_staff(&mut self) {
        for (id, name, role) in [
            ("owner", "Owner", Role::Owner),
            ("alice", "Alice", Role::Employee),
            ("bob", "Bob", Role::Employee),
            ("carol", "Carol", Role::Employee),
        ] {
            let employee = Employee {
                employee_id: EmployeeId::new(id),
                display_name: name.to_string(),
                role,
                chat_user_id: Some(format!("U-{id}")),
            };
            self.persistence.link_employee(&employee, test_now()).unwrap();
        }
    }

    pub fn employee(&mut self, id: &str) -> Employee {
        self.persistence
            .get_employee(&EmployeeId::new(id))
            .unwrap()
            .unwrap()
    }

    pub fn seed_shift(&mut self, employee: &str, day: u8, range: TimeRange) -> Shift {
        let shift = NewShift::scheduled(EmployeeId::new(employee), create_test_date(day), range);
        self.persistence.create_shift(&shift, test_now()).unwrap()
    }

    pub fn say_at(&mut self, user: &str, text: &str, now: OffsetDateTime) -> Option<Reply> {
        let message = IncomingMessage::text(user, ChatContext::Direct, text);
        self.router.route(&mut self.persistence, &message, now)
    }

    pub fn say(&mut self, user: &str, text: &str) -> Reply {
        self.say_at(user, text, test_now())
            .expect("expected a reply in a direct chat")
    }

    pub fn say_in_group(&mut self, user: &str, text: &str) -> Option<Reply> {
        let message = IncomingMessage::text(user, ChatContext::Group, text);
        self.router.route(&mut self.persistence, &message, test_now())
    }

    pub fn press(&mut self, user: &str, token: &str) -> Reply {
        let message = IncomingMessage::postback(user, ChatContext::Direct, token);
        self.router
            .route(&mut self.persistence, &message, test_now())
            .expect("button presses always get a reply")
    }

    pub fn step_of(&mut self, user: &str) -> Option<ConversationStep> {
        self.persistence
            .get_conversation_state(user, test_now())
            .unwrap()
            .map(|state| state.step)
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.notifier.events()
    }
}
