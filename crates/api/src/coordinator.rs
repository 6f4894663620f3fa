// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Deciding requests.
//!
//! The state change and every schedule mutation it implies are applied by
//! the persistence layer in one transaction. Notifications go out only
//! after that transaction has committed, and a failed notification never
//! undoes a decision.

use serde::{Deserialize, Serialize};
use shiftbot_domain::{
    Decision, DeletionRequest, Employee, ExchangeRequest, RequestId, RequestKind, RequestStatus,
    Shift,
};
use shiftbot_persistence::{
    AdditionDecisionOutcome, AppliedMerge, DeletionDecisionOutcome, ExchangeDecisionOutcome,
    Persistence,
};
use time::OffsetDateTime;
use tracing::info;

use crate::context::{Directory, EngineContext};
use crate::error::ApiError;
use crate::messages::describe_slot;
use crate::ports::{NotificationEvent, NotificationKind};
use crate::submissions::notification;

/// The result of a decision, as reported to the deciding actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReport {
    /// The workflow the request belongs to.
    pub kind: RequestKind,
    /// The decided request.
    pub request_id: RequestId,
    /// The request's status after the decision.
    pub status: RequestStatus,
    /// The shift now holding the hours, for approved exchanges and
    /// additions.
    pub shift: Option<Shift>,
    /// Requests closed as a side effect.
    pub auto_rejected: Vec<RequestId>,
    /// Text for the actor.
    pub message: String,
}

/// Applies approve, reject and cancel decisions to requests.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalCoordinator<'a> {
    context: &'a EngineContext,
}

fn merged_shift(merge: Option<&AppliedMerge>) -> Option<Shift> {
    merge.map(|m| m.shift().clone())
}

fn auto_rejection_events(
    directory: &Directory,
    exchanges: &[ExchangeRequest],
    deletions: &[DeletionRequest],
) -> Vec<NotificationEvent> {
    let exchange_events = exchanges.iter().map(|r| {
        notification(
            NotificationKind::AutoRejected,
            RequestKind::Exchange,
            &r.request_id,
            &r.approver_id,
            format!(
                "The request to take over {}'s shift on {} is closed because the shift changed.",
                directory.name(&r.requester_id),
                describe_slot(r.shift_date, &r.shift_range)
            ),
        )
    });
    let deletion_events = deletions.iter().map(|r| {
        notification(
            NotificationKind::AutoRejected,
            RequestKind::Deletion,
            &r.request_id,
            &r.requester_id,
            format!(
                "Your request to remove the shift on {} is closed because the shift changed.",
                describe_slot(r.shift_date, &r.shift_range)
            ),
        )
    });
    exchange_events.chain(deletion_events).collect()
}

fn request_ids<'r, I>(ids: I) -> Vec<RequestId>
where
    I: IntoIterator<Item = &'r RequestId>,
{
    ids.into_iter().cloned().collect()
}

impl<'a> ApprovalCoordinator<'a> {
    /// Creates a coordinator over the given context.
    #[must_use]
    pub const fn new(context: &'a EngineContext) -> Self {
        Self { context }
    }

    /// Decides a request of any kind.
    ///
    /// # Errors
    ///
    /// See the kind-specific methods.
    pub fn decide(
        &self,
        persistence: &mut Persistence,
        kind: RequestKind,
        request_id: &RequestId,
        actor: &Employee,
        decision: Decision,
        now: OffsetDateTime,
    ) -> Result<DecisionReport, ApiError> {
        match kind {
            RequestKind::Exchange => {
                self.decide_exchange(persistence, request_id, actor, decision, now)
            }
            RequestKind::Addition => {
                self.decide_addition(persistence, request_id, actor, decision, now)
            }
            RequestKind::Deletion => {
                self.decide_deletion(persistence, request_id, actor, decision, now)
            }
        }
    }

    /// Decides an exchange request.
    ///
    /// The approver may approve or reject; the requester may cancel.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` for an unknown request,
    /// `ApiError::Unauthorized` for the wrong actor, or
    /// `ApiError::StateConflict` if the request was already decided or its
    /// shift is gone.
    pub fn decide_exchange(
        &self,
        persistence: &mut Persistence,
        request_id: &RequestId,
        actor: &Employee,
        decision: Decision,
        now: OffsetDateTime,
    ) -> Result<DecisionReport, ApiError> {
        let outcome: ExchangeDecisionOutcome =
            persistence.decide_exchange(request_id, &actor.employee_id, decision, now)?;
        let directory: Directory = self.context.directory();
        let request: &ExchangeRequest = &outcome.request;
        let slot: String = describe_slot(request.shift_date, &request.shift_range);
        let requester: String = directory.name(&request.requester_id);
        let approver: String = directory.name(&request.approver_id);

        let (kind, recipient, notice, message) = match decision {
            Decision::Approve => (
                NotificationKind::Approved,
                &request.requester_id,
                format!("{approver} took over your shift on {slot}."),
                format!("You took over {requester}'s shift on {slot}."),
            ),
            Decision::Reject => (
                NotificationKind::Rejected,
                &request.requester_id,
                format!("{approver} declined your shift on {slot}."),
                format!("You declined {requester}'s shift on {slot}."),
            ),
            Decision::Cancel => (
                NotificationKind::Cancelled,
                &request.approver_id,
                format!("{requester} withdrew the request for their shift on {slot}."),
                format!("You withdrew your request to {approver} for {slot}."),
            ),
        };

        let mut events: Vec<NotificationEvent> = vec![notification(
            kind,
            RequestKind::Exchange,
            request_id,
            recipient,
            notice,
        )];
        events.extend(auto_rejection_events(
            &directory,
            &outcome.auto_rejected_exchanges,
            &outcome.auto_rejected_deletions,
        ));
        self.context.notify(&events);

        info!(
            request_id = %request_id,
            actor = %actor.employee_id,
            decision = %decision,
            "Exchange decision applied"
        );

        Ok(DecisionReport {
            kind: RequestKind::Exchange,
            request_id: request_id.clone(),
            status: outcome.request.status,
            shift: merged_shift(outcome.merge.as_ref()),
            auto_rejected: request_ids(
                outcome
                    .auto_rejected_exchanges
                    .iter()
                    .map(|r| &r.request_id)
                    .chain(outcome.auto_rejected_deletions.iter().map(|r| &r.request_id)),
            ),
            message,
        })
    }

    /// Decides an addition request. Only the target may decide.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` for an unknown request,
    /// `ApiError::Unauthorized` for the wrong actor, `ApiError::InvalidInput`
    /// for cancellation, or `ApiError::StateConflict` if the request was
    /// already decided.
    pub fn decide_addition(
        &self,
        persistence: &mut Persistence,
        request_id: &RequestId,
        actor: &Employee,
        decision: Decision,
        now: OffsetDateTime,
    ) -> Result<DecisionReport, ApiError> {
        let outcome: AdditionDecisionOutcome =
            persistence.decide_addition(request_id, &actor.employee_id, decision, now)?;
        let directory: Directory = self.context.directory();
        let request = &outcome.request;
        let slot: String = describe_slot(request.shift_date, &request.shift_range);
        let target: String = directory.name(&request.target_employee_id);

        let (kind, notice, message) = if decision == Decision::Approve {
            (
                NotificationKind::Approved,
                format!("{target} will work the extra shift on {slot}."),
                format!("You will work the extra shift on {slot}."),
            )
        } else {
            (
                NotificationKind::Rejected,
                format!("{target} declined the extra shift on {slot}."),
                format!("You declined the extra shift on {slot}."),
            )
        };

        let mut events: Vec<NotificationEvent> = vec![notification(
            kind,
            RequestKind::Addition,
            request_id,
            &request.requester_id,
            notice,
        )];
        events.extend(auto_rejection_events(
            &directory,
            &outcome.auto_rejected_exchanges,
            &outcome.auto_rejected_deletions,
        ));
        self.context.notify(&events);

        info!(
            request_id = %request_id,
            actor = %actor.employee_id,
            decision = %decision,
            "Addition decision applied"
        );

        Ok(DecisionReport {
            kind: RequestKind::Addition,
            request_id: request_id.clone(),
            status: outcome.request.status,
            shift: merged_shift(outcome.merge.as_ref()),
            auto_rejected: request_ids(
                outcome
                    .auto_rejected_exchanges
                    .iter()
                    .map(|r| &r.request_id)
                    .chain(outcome.auto_rejected_deletions.iter().map(|r| &r.request_id)),
            ),
            message,
        })
    }

    /// Decides a deletion request. Only the owner may decide.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` for an unknown request,
    /// `ApiError::Unauthorized` unless the actor is the owner,
    /// `ApiError::InvalidInput` for cancellation, or
    /// `ApiError::StateConflict` if the request was already decided or its
    /// shift is gone.
    pub fn decide_deletion(
        &self,
        persistence: &mut Persistence,
        request_id: &RequestId,
        actor: &Employee,
        decision: Decision,
        now: OffsetDateTime,
    ) -> Result<DecisionReport, ApiError> {
        let outcome: DeletionDecisionOutcome =
            persistence.decide_deletion(request_id, actor, decision, now)?;
        let directory: Directory = self.context.directory();
        let request: &DeletionRequest = &outcome.request;
        let slot: String = describe_slot(request.shift_date, &request.shift_range);
        let requester: String = directory.name(&request.requester_id);

        let (kind, notice, message) = if decision == Decision::Approve {
            (
                NotificationKind::Approved,
                format!("Your shift on {slot} was removed."),
                format!("Removed {requester}'s shift on {slot}."),
            )
        } else {
            (
                NotificationKind::Rejected,
                format!("Your request to remove the shift on {slot} was declined."),
                format!("Declined {requester}'s request to remove the shift on {slot}."),
            )
        };

        let mut events: Vec<NotificationEvent> = vec![notification(
            kind,
            RequestKind::Deletion,
            request_id,
            &request.requester_id,
            notice,
        )];
        events.extend(auto_rejection_events(
            &directory,
            &outcome.auto_rejected_exchanges,
            &[],
        ));
        self.context.notify(&events);

        info!(
            request_id = %request_id,
            actor = %actor.employee_id,
            decision = %decision,
            "Deletion decision applied"
        );

        Ok(DecisionReport {
            kind: RequestKind::Deletion,
            request_id: request_id.clone(),
            status: outcome.request.status,
            shift: None,
            auto_rejected: request_ids(outcome.auto_rejected_exchanges.iter().map(|r| &r.request_id)),
            message,
        })
    }
}
