// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolving who is acting and what they may do.

use shiftbot_domain::{Employee, EmployeeId, Role};
use shiftbot_persistence::Persistence;

use crate::context::EngineContext;
use crate::error::ApiError;

/// Resolves the employee linked to a chat user.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` if the chat user has not
/// linked an employee yet.
pub fn resolve_chat_user(
    persistence: &mut Persistence,
    chat_user_id: &str,
) -> Result<Employee, ApiError> {
    persistence
        .get_employee_by_chat_user(chat_user_id)?
        .ok_or_else(|| ApiError::AuthenticationFailed {
            reason: String::from(
                "Your chat account is not linked yet. Send 'authenticate' in a direct chat first.",
            ),
        })
}

/// Resolves an employee named by id in an API call.
///
/// A linked employee is returned as stored. An employee who has never
/// linked a chat account is known only from the roster and gets the
/// owner role exactly when their id is the configured owner id.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if neither storage nor the roster
/// knows the id.
pub fn resolve_actor(
    persistence: &mut Persistence,
    context: &EngineContext,
    employee_id: &EmployeeId,
) -> Result<Employee, ApiError> {
    if let Some(employee) = persistence.get_employee(employee_id)? {
        return Ok(employee);
    }

    let entry = context
        .roster_entries()
        .into_iter()
        .find(|e| e.employee_id.trim() == employee_id.value())
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Employee"),
            message: format!("Employee {employee_id} is not on the roster."),
        })?;

    Ok(Employee {
        employee_id: employee_id.clone(),
        display_name: entry.display_name,
        role: role_for(context, employee_id),
        chat_user_id: None,
    })
}

/// Returns the role an employee receives when linking.
#[must_use]
pub fn role_for(context: &EngineContext, employee_id: &EmployeeId) -> Role {
    if context.config().owner_id().as_ref() == Some(employee_id) {
        Role::Owner
    } else {
        Role::Employee
    }
}

/// Authorization checks for owner-only actions.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor may ask employees to work extra hours.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the actor is the owner.
    pub fn authorize_request_addition(actor: &Employee) -> Result<(), ApiError> {
        Self::require_owner(actor, "request additional shifts")
    }

    /// Checks that the actor may seed shifts directly.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the actor is the owner.
    pub fn authorize_create_shift(actor: &Employee) -> Result<(), ApiError> {
        Self::require_owner(actor, "create shifts")
    }

    /// Checks that the actor acts on their own shift.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the shift belongs to someone else.
    pub fn authorize_shift_holder(
        actor: &EmployeeId,
        holder: &EmployeeId,
        action: &str,
    ) -> Result<(), ApiError> {
        if actor == holder {
            Ok(())
        } else {
            Err(ApiError::Unauthorized {
                action: action.to_string(),
                requirement: String::from("only the shift's own employee may do this"),
            })
        }
    }

    fn require_owner(actor: &Employee, action: &str) -> Result<(), ApiError> {
        match actor.role {
            Role::Owner => Ok(()),
            Role::Employee => Err(ApiError::Unauthorized {
                action: action.to_string(),
                requirement: String::from("only the owner may do this"),
            }),
        }
    }
}
