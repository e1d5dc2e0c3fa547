// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApplicationOperation, ApplicationStatus, DomainError};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::OperationNotPermitted {
        operation: ApplicationOperation::Delete,
        status: ApplicationStatus::Withdrawn,
    };
    assert_eq!(format!("{err}"), "Cannot delete withdrawn applications");

    let err: DomainError = DomainError::OperationNotPermitted {
        operation: ApplicationOperation::Withdraw,
        status: ApplicationStatus::Draft,
    };
    assert_eq!(
        format!("{err}"),
        "Cannot withdraw draft applications: only submitted applications can be withdrawn"
    );

    let err: DomainError = DomainError::InvalidScore {
        criterion: "overall",
        value: 12,
    };
    assert_eq!(
        format!("{err}"),
        "Invalid overall score: 12. Must be between 0 and 10"
    );

    let err: DomainError = DomainError::InvalidCategory(String::from("short"));
    assert_eq!(format!("{err}"), "Invalid competition category: short");

    let err: DomainError = DomainError::MissingGrader;
    assert_eq!(format!("{err}"), "Grader identity is required");
}

#[test]
fn test_invalid_transition_display() {
    let err: DomainError = ApplicationStatus::Deleted
        .validate_transition(ApplicationStatus::Draft)
        .unwrap_err();
    assert_eq!(
        format!("{err}"),
        "Invalid status transition from deleted to draft: cannot transition from terminal state"
    );
}

#[test]
fn test_domain_error_is_std_error() {
    let err: DomainError = DomainError::InvalidFileSlot(String::from("trailer"));
    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert_eq!(boxed.to_string(), "Invalid file slot: trailer");
}
