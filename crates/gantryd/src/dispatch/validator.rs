//! Content-type and token-arity validation for inbound command bodies.

use std::str;

use gantry_config::DispatchForm;

use super::errors::ValidationError;

/// The only content type the dispatch endpoint accepts.
const PLAIN_TEXT: &str = "text/plain";

/// A validated command body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandText {
    /// Two-token control command.
    Control {
        /// Control identifier token.
        control: String,
        /// Requested state token.
        state: String,
    },
    /// Single-token named program run (dual form only).
    Program {
        /// Program name token.
        name: String,
    },
}

/// Validates a request body against the configured form.
///
/// Pure function of its inputs; no side effects.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the content type is not exactly
/// `text/plain`, the body is not UTF-8, or the token count does not match
/// the form.
pub(crate) fn validate(
    form: DispatchForm,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<CommandText, ValidationError> {
    match content_type {
        Some(PLAIN_TEXT) => {}
        other => {
            return Err(ValidationError::bad_content_type(
                other.unwrap_or_default(),
            ));
        }
    }

    let text = str::from_utf8(body).map_err(|_| ValidationError::BadEncoding)?;
    let tokens: Vec<&str> = text.split_whitespace().collect();

    match (form, tokens.as_slice()) {
        (_, [control, state]) => Ok(CommandText::Control {
            control: (*control).to_owned(),
            state: (*state).to_owned(),
        }),
        (DispatchForm::Dual, [name]) => Ok(CommandText::Program {
            name: (*name).to_owned(),
        }),
        (DispatchForm::Control, _) => Err(ValidationError::bad_arity("2", tokens.len())),
        (DispatchForm::Dual, _) => Err(ValidationError::bad_arity("1 or 2", tokens.len())),
    }
}
