// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entry point for chat events.
//!
//! The router decides, per incoming event, whether it is a command, a
//! button press, or an answer within an ongoing dialogue, and keeps the
//! stored conversation state in step with the dialogue.
//!
//! Precedence for text:
//!
//! 1. A recognized command always wins and discards any dialogue in
//!    progress.
//! 2. Otherwise the text answers the stored step, if one exists and has
//!    not expired.
//! 3. Otherwise, in a direct chat the user is told the text was not
//!    understood; in a group the bot stays silent.
//!
//! Button presses are handled regardless of the stored step.

use shiftbot::{
    ChatContext, Command, CommandVocabulary, ConversationState, ConversationStep,
    IncomingMessage, MessageContent, Postback, Reply,
};
use shiftbot_domain::Employee;
use shiftbot_persistence::{Persistence, PersistenceError};
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::auth::resolve_chat_user;
use crate::context::EngineContext;
use crate::coordinator::{ApprovalCoordinator, DecisionReport};
use crate::error::{ApiError, translate_core_error};
use crate::workflows::{StepOutcome, addition, authentication, deletion, exchange, queries};

const NOT_RECOGNIZED: &str = "Sorry, I did not understand that. Send 'help' to see what I can do.";
const USE_DIRECT_CHAT: &str = "Please send that to me in a direct chat.";
const STATE_LOST: &str =
    "Sorry, I lost track of our conversation. Please start again from the command.";

/// Routes chat events to commands, dialogue steps and decisions.
#[derive(Debug, Clone)]
pub struct DialogRouter {
    context: EngineContext,
    vocabulary: CommandVocabulary,
}

impl DialogRouter {
    /// Creates a router, building the command vocabulary from the
    /// configured aliases.
    #[must_use]
    pub fn new(context: EngineContext) -> Self {
        let vocabulary: CommandVocabulary = context.config().vocabulary();
        Self {
            context,
            vocabulary,
        }
    }

    /// Returns the engine context.
    #[must_use]
    pub const fn context(&self) -> &EngineContext {
        &self.context
    }

    /// Handles one chat event.
    ///
    /// Returns `None` when the bot should stay silent.
    pub fn route(
        &self,
        persistence: &mut Persistence,
        message: &IncomingMessage,
        now: OffsetDateTime,
    ) -> Option<Reply> {
        debug!(
            chat_user_id = %message.chat_user_id,
            context = ?message.context,
            "Routing chat event"
        );
        match &message.content {
            MessageContent::Postback(token) => {
                Some(self.route_postback(persistence, message, token, now))
            }
            MessageContent::Text(text) => self.route_text(persistence, message, text, now),
        }
    }

    fn route_postback(
        &self,
        persistence: &mut Persistence,
        message: &IncomingMessage,
        token: &str,
        now: OffsetDateTime,
    ) -> Reply {
        let result: Result<Reply, ApiError> = Postback::parse(token)
            .map_err(translate_core_error)
            .and_then(|postback| self.handle_postback(persistence, message, &postback, now));
        Self::reply_or_error(&message.chat_user_id, result)
    }

    fn handle_postback(
        &self,
        persistence: &mut Persistence,
        message: &IncomingMessage,
        postback: &Postback,
        now: OffsetDateTime,
    ) -> Result<Reply, ApiError> {
        let user: &str = &message.chat_user_id;
        let employee: Employee = resolve_chat_user(persistence, user)?;
        match postback {
            Postback::Decide {
                kind,
                decision,
                request_id,
            } => {
                let report: DecisionReport = ApprovalCoordinator::new(&self.context).decide(
                    persistence,
                    *kind,
                    request_id,
                    &employee,
                    *decision,
                    now,
                )?;
                Ok(Reply::text(report.message))
            }
            Postback::SelectExchangeShift { shift_id } => {
                if message.context == ChatContext::Group {
                    return Ok(Reply::text(USE_DIRECT_CHAT));
                }
                let outcome = exchange::select_shift(
                    &self.context,
                    persistence,
                    &employee.employee_id,
                    *shift_id,
                    now,
                );
                self.settle(persistence, user, outcome, now)
            }
            Postback::SelectDeletionShift { shift_id } => {
                if message.context == ChatContext::Group {
                    return Ok(Reply::text(USE_DIRECT_CHAT));
                }
                let outcome = deletion::select_shift(
                    &self.context,
                    persistence,
                    &employee.employee_id,
                    *shift_id,
                    now,
                );
                self.settle(persistence, user, outcome, now)
            }
        }
    }

    fn route_text(
        &self,
        persistence: &mut Persistence,
        message: &IncomingMessage,
        text: &str,
        now: OffsetDateTime,
    ) -> Option<Reply> {
        let user: &str = &message.chat_user_id;
        let state: Option<ConversationState> = match persistence.get_conversation_state(user, now)
        {
            Ok(state) => state,
            Err(PersistenceError::CorruptConversationState { reason, .. }) => {
                warn!(chat_user_id = user, %reason, "Discarding unreadable conversation state");
                if let Err(e) = persistence.clear_conversation_state(user) {
                    error!(chat_user_id = user, error = %e, "Failed to clear conversation state");
                }
                return Some(Reply::text(STATE_LOST));
            }
            Err(e) => return Some(Self::reply_or_error(user, Err(e.into()))),
        };

        if let Some(command) = self.vocabulary.recognize(text) {
            if let Some(previous) = &state {
                debug!(
                    chat_user_id = user,
                    step = previous.step.name(),
                    "Command interrupts dialogue"
                );
            }
            let result: Result<Reply, ApiError> = persistence
                .clear_conversation_state(user)
                .map_err(ApiError::from)
                .and_then(|_| self.run_command(persistence, message, command, now));
            return Some(Self::reply_or_error(user, result));
        }

        match state {
            Some(state) => {
                let outcome = self.run_step(persistence, user, &state.step, text, now);
                Some(Self::reply_or_error(
                    user,
                    self.settle(persistence, user, outcome, now),
                ))
            }
            None => match message.context {
                ChatContext::Group => None,
                ChatContext::Direct => Some(Reply::text(NOT_RECOGNIZED)),
            },
        }
    }

    fn run_command(
        &self,
        persistence: &mut Persistence,
        message: &IncomingMessage,
        command: Command,
        now: OffsetDateTime,
    ) -> Result<Reply, ApiError> {
        let user: &str = &message.chat_user_id;
        if command.requires_direct_chat() && message.context == ChatContext::Group {
            return Ok(Reply::text(USE_DIRECT_CHAT));
        }
        info!(chat_user_id = user, command = command.identifier(), "Command received");

        match command {
            Command::Help => Ok(queries::help(&self.vocabulary)),
            Command::Authenticate => {
                self.settle(persistence, user, Ok(authentication::start()), now)
            }
            Command::ShowMyShifts => {
                let employee: Employee = resolve_chat_user(persistence, user)?;
                queries::my_shifts(&self.context, persistence, &employee, now)
            }
            Command::ShowAllShifts => {
                resolve_chat_user(persistence, user)?;
                queries::all_shifts(&self.context, persistence, now)
            }
            Command::StartExchange => {
                let employee: Employee = resolve_chat_user(persistence, user)?;
                self.settle(persistence, user, Ok(exchange::start(&employee)), now)
            }
            Command::StartAddition => {
                let employee: Employee = resolve_chat_user(persistence, user)?;
                self.settle(persistence, user, addition::start(&employee), now)
            }
            Command::StartDeletion => {
                let employee: Employee = resolve_chat_user(persistence, user)?;
                self.settle(persistence, user, Ok(deletion::start(&employee)), now)
            }
            Command::CheckPending => {
                let employee: Employee = resolve_chat_user(persistence, user)?;
                queries::pending(&self.context, persistence, &employee)
            }
        }
    }

    /// Feeds the text to the handler of the stored step.
    fn run_step(
        &self,
        persistence: &mut Persistence,
        user: &str,
        step: &ConversationStep,
        text: &str,
        now: OffsetDateTime,
    ) -> Result<StepOutcome, ApiError> {
        let context: &EngineContext = &self.context;
        match step {
            ConversationStep::WaitingForEmployeeName => {
                authentication::on_employee_name(context, persistence, user, text, now)
            }
            ConversationStep::WaitingForShiftDate { requester_id } => {
                exchange::on_shift_date(context, persistence, requester_id, text, now)
            }
            ConversationStep::WaitingForShiftSelection {
                requester_id,
                shift_ids,
                ..
            } => exchange::on_shift_selection(
                context,
                persistence,
                requester_id,
                shift_ids,
                text,
                now,
            ),
            ConversationStep::WaitingForEmployeeSelectionExchange {
                requester_id,
                shift_id,
                candidates,
            } => Ok(exchange::on_employee_selection(
                requester_id,
                *shift_id,
                candidates,
                text,
            )),
            ConversationStep::WaitingForConfirmationExchange {
                requester_id,
                shift_id,
                approver,
            } => exchange::on_confirmation(
                context,
                persistence,
                requester_id,
                *shift_id,
                approver,
                text,
                now,
            ),
            ConversationStep::WaitingForAdditionDate { owner_id } => {
                Ok(addition::on_date(context, owner_id, text, now))
            }
            ConversationStep::WaitingForAdditionTime { owner_id, date } => {
                addition::on_time(context, persistence, owner_id, *date, text)
            }
            ConversationStep::WaitingForAdditionEmployees {
                owner_id,
                date,
                range,
                candidates,
            } => addition::on_employees(persistence, owner_id, *date, *range, candidates, text),
            ConversationStep::WaitingForAdditionConfirmation {
                owner_id,
                date,
                range,
                targets,
            } => addition::on_confirmation(
                context,
                persistence,
                owner_id,
                (*date, *range),
                targets,
                text,
                now,
            ),
            ConversationStep::WaitingForDeletionDate { requester_id } => {
                deletion::on_date(context, persistence, requester_id, text, now)
            }
            ConversationStep::WaitingForDeletionShift {
                requester_id,
                shift_ids,
                ..
            } => deletion::on_shift(context, persistence, requester_id, shift_ids, text, now),
            ConversationStep::WaitingForDeletionReason {
                requester_id,
                shift_id,
            } => deletion::on_reason(context, persistence, requester_id, *shift_id, text, now),
        }
    }

    /// Applies a step outcome to the stored state.
    ///
    /// Errors that make the dialogue pointless also discard the state.
    fn settle(
        &self,
        persistence: &mut Persistence,
        user: &str,
        outcome: Result<StepOutcome, ApiError>,
        now: OffsetDateTime,
    ) -> Result<Reply, ApiError> {
        match outcome {
            Ok(StepOutcome::Advance(step, reply)) => {
                let ttl = self.context.config().ttl_for(step.flow());
                debug!(chat_user_id = user, step = step.name(), "Dialogue advanced");
                persistence.set_conversation_state(user, &ConversationState::new(step, now, ttl))?;
                Ok(reply)
            }
            Ok(StepOutcome::Stay(reply)) => Ok(reply),
            Ok(StepOutcome::Finish(reply)) => {
                persistence.clear_conversation_state(user)?;
                Ok(reply)
            }
            Err(e) => {
                if e.ends_dialogue() {
                    persistence.clear_conversation_state(user)?;
                }
                Err(e)
            }
        }
    }

    fn reply_or_error(user: &str, result: Result<Reply, ApiError>) -> Reply {
        match result {
            Ok(reply) => reply,
            Err(e) => {
                if matches!(e, ApiError::Internal { .. }) {
                    error!(chat_user_id = user, error = %e, "Chat event failed");
                } else {
                    debug!(chat_user_id = user, error = %e, "Chat event refused");
                }
                Reply::text(e.user_message())
            }
        }
    }
}
