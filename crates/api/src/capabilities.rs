// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions an account is permitted to perform
//! without leaking domain internals. They are advisory only and do not
//! replace the checks in the operations themselves.

use filmfest_domain::{Application, ApplicationOperation};

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::{ApplicationCapabilities, Capability, GlobalCapabilities};

/// Computes global capabilities for an authenticated account.
#[must_use]
pub const fn compute_global_capabilities(actor: &AuthenticatedActor) -> GlobalCapabilities {
    match actor.role {
        Role::Admin => GlobalCapabilities {
            can_create_application: Capability::Denied,
            can_review: Capability::Allowed,
            can_export: Capability::Allowed,
        },
        Role::Applicant => GlobalCapabilities {
            can_create_application: Capability::Allowed,
            can_review: Capability::Denied,
            can_export: Capability::Denied,
        },
    }
}

/// Computes what `actor` may do with one application.
///
/// Lifecycle actions depend on ownership and the status guard; review
/// depends on the admin role and the status guard.
#[must_use]
pub fn compute_application_capabilities(
    actor: &AuthenticatedActor,
    application: &Application,
) -> ApplicationCapabilities {
    let owner: bool = application.is_owned_by(&actor.uid);
    let owner_may = |operation: ApplicationOperation| {
        Capability::from_bool(owner && application.status.permits(operation))
    };

    ApplicationCapabilities {
        can_edit: owner_may(ApplicationOperation::Edit),
        can_submit: owner_may(ApplicationOperation::Submit),
        can_replace_files: owner_may(ApplicationOperation::ReplaceFile),
        can_delete: owner_may(ApplicationOperation::Delete),
        can_withdraw: owner_may(ApplicationOperation::Withdraw),
        can_review: Capability::from_bool(
            actor.role == Role::Admin && application.status.permits(ApplicationOperation::Review),
        ),
    }
}
