// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the sign-up password policy.

use crate::password_policy::{PasswordPolicy, PasswordPolicyError};

#[test]
fn test_password_policy_accepts_two_character_classes() {
    let policy = PasswordPolicy::default();

    assert!(policy.validate("longpassword1", "naree@example.com").is_ok());
    assert!(policy.validate("Str0ng!Pass", "naree@example.com").is_ok());
}

#[test]
fn test_password_policy_rejects_short_passwords() {
    let policy = PasswordPolicy::default();

    let result = policy.validate("Ab1!", "naree@example.com");

    assert_eq!(
        result,
        Err(PasswordPolicyError::TooShort { min_length: 8 })
    );
}

#[test]
fn test_password_policy_rejects_single_class() {
    let policy = PasswordPolicy::default();

    let result = policy.validate("alllowercase", "naree@example.com");

    assert_eq!(
        result,
        Err(PasswordPolicyError::InsufficientComplexity {
            required: 2,
            found: 1,
        })
    );
}

#[test]
fn test_password_policy_rejects_email_and_local_part() {
    let policy = PasswordPolicy::default();

    for password in ["Naree.Wongsa@example.com", "NAREE.WONGSA"] {
        let result = policy.validate(password, "naree.wongsa@example.com");
        assert!(
            matches!(
                result,
                Err(PasswordPolicyError::MatchesForbiddenField { ref field }) if field == "email"
            ),
            "{password} should be rejected"
        );
    }
}

#[test]
fn test_password_policy_error_messages() {
    assert_eq!(
        PasswordPolicyError::TooShort { min_length: 8 }.to_string(),
        "Password must be at least 8 characters long"
    );
    assert_eq!(
        PasswordPolicyError::MatchesForbiddenField {
            field: String::from("email"),
        }
        .to_string(),
        "Password must not match email"
    );
}

#[test]
fn test_custom_policy_thresholds() {
    let policy = PasswordPolicy {
        min_length: 12,
        min_complexity: 3,
    };

    assert!(policy.validate("Short1!", "a@example.com").is_err());
    assert!(policy.validate("lowercaseonly1", "a@example.com").is_err());
    assert!(policy.validate("Lowercase-and1", "a@example.com").is_ok());
}
