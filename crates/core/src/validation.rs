//! Request validation helpers built on the `validator` crate.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// Custom validator rejecting empty or whitespace-only strings.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be empty"));
        return Err(err);
    }
    Ok(())
}

/// Run `validator` rules on `input` and fold any failures into a single
/// [`CoreError::Validation`] message such as `title: must not be empty`.
pub fn validate<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .errors()
        .iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => list
                .iter()
                .map(|e| {
                    let msg = e
                        .message
                        .as_deref()
                        .map(str::to_string)
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{field}: {msg}")
                })
                .collect::<Vec<_>>(),
            ValidationErrorsKind::Struct(_) | ValidationErrorsKind::List(_) => {
                vec![format!("{field}: invalid")]
            }
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
