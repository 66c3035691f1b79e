//! Form validation applied before any remote call.

use velora_core::{StoreError, StoreResult};

const MIN_PASSWORD_LEN: usize = 6;

/// Validate a sign-up form. Every field is required, the passwords must
/// match, and the password must be at least six characters.
pub fn validate_sign_up(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> StoreResult<()> {
    if name.trim().is_empty()
        || email.trim().is_empty()
        || password.is_empty()
        || confirm_password.is_empty()
    {
        return Err(StoreError::validation("Please fill in all fields"));
    }
    if password != confirm_password {
        return Err(StoreError::validation("Passwords do not match"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(StoreError::validation(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

/// Validate a sign-in form. Both fields are required.
pub fn validate_sign_in(email: &str, password: &str) -> StoreResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(StoreError::validation("Please fill in all fields"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_rejects_missing_fields() {
        let err = validate_sign_up("", "a@b.c", "secret1", "secret1").unwrap_err();
        match err {
            StoreError::Validation(msg) => assert_eq!(msg, "Please fill in all fields"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(validate_sign_up("Maria", "", "secret1", "secret1").is_err());
        assert!(validate_sign_up("Maria", "a@b.c", "", "").is_err());
    }

    #[test]
    fn sign_up_rejects_mismatched_passwords() {
        let err = validate_sign_up("Maria", "a@b.c", "secret1", "secret2").unwrap_err();
        match err {
            StoreError::Validation(msg) => assert_eq!(msg, "Passwords do not match"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn sign_up_rejects_short_passwords() {
        let err = validate_sign_up("Maria", "a@b.c", "five5", "five5").unwrap_err();
        match err {
            StoreError::Validation(msg) => {
                assert_eq!(msg, "Password must be at least 6 characters")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn sign_up_accepts_a_complete_form() {
        assert!(validate_sign_up("Maria", "a@b.c", "secret1", "secret1").is_ok());
    }

    #[test]
    fn sign_in_requires_both_fields() {
        assert!(validate_sign_in("", "secret1").is_err());
        assert!(validate_sign_in("a@b.c", "").is_err());
        assert!(validate_sign_in("a@b.c", "secret1").is_ok());
    }
}
