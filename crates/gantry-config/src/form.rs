use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Request body forms the dispatch endpoint can serve.
///
/// The form is fixed at startup; it is never negotiated per request.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
    ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DispatchForm {
    /// Two-token control commands only: `<control-id> <state>`.
    #[default]
    Control,
    /// Control commands plus single-token named program runs.
    Dual,
}

impl DispatchForm {
    /// Methods advertised in the CORS preflight response.
    ///
    /// The control-only server advertised the narrow set; the dual-form
    /// server advertised the wider one. Both are preserved verbatim.
    #[must_use]
    pub fn allowed_methods(self) -> &'static str {
        match self {
            Self::Control => "OPTIONS, POST",
            Self::Dual => "HEAD, GET, OPTIONS, POST",
        }
    }
}
