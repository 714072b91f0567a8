use tracing::warn;

use crate::errors::Error;

/// Stable translation keys understood by the presentation layer.
///
/// The wire spellings (see [`TrCode::key`]) are load-bearing for existing
/// localization bundles, historical typos included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrCode {
    NoSuchTwitterUser,
    TooManyUsersRequested,
    NoSuchTwitterId,
    TwitterUnknownError,
    StartGeneralError,
    GetInfoGeneralError,
    TweetIdGeneralError,
    UserLimit,
}

impl TrCode {
    pub fn key(self) -> &'static str {
        match self {
            TrCode::NoSuchTwitterUser => "noSuchTwitterUser",
            TrCode::TooManyUsersRequested => "tooManyUsersRequested",
            TrCode::NoSuchTwitterId => "noSuchTwitterId",
            TrCode::TwitterUnknownError => "twitterUnknwnError",
            TrCode::StartGeneralError => "startGeneralError",
            TrCode::GetInfoGeneralError => "getInfoGeneralError",
            TrCode::TweetIdGeneralError => "tweetIdGeneralError",
            TrCode::UserLimit => "userLimit",
        }
    }
}

/// A user-facing failure with structured context, ready for localization.
///
/// Context fields are optional; each `TrCode` fills the ones its message
/// template interpolates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translated {
    pub code: TrCode,
    pub count: Option<usize>,
    pub name: Option<String>,
    pub screen_name: Option<String>,
    pub id: Option<String>,
}

impl Translated {
    pub fn new(code: TrCode) -> Self {
        Self {
            code,
            count: None,
            name: None,
            screen_name: None,
            id: None,
        }
    }
}

/// Uniform result contract for every public operation in this layer: a
/// success payload or a translated failure, never a raw error.
pub type Outcome<T> = std::result::Result<T, Translated>;

/// Map a provider error code to its user-facing outcome.
///
/// Pure and total: every code lands on exactly one `TrCode`. Unrecognized
/// codes are logged with full detail and collapse to the generic key.
pub fn classify(code: u32, message: &str, requested: &[String]) -> Translated {
    match code {
        17 | 34 => Translated {
            count: Some(requested.len()),
            name: Some(requested.join(",")),
            ..Translated::new(TrCode::NoSuchTwitterUser)
        },
        18 => {
            warn!("exceeded user lookup limit");
            Translated::new(TrCode::TooManyUsersRequested)
        }
        144 => Translated::new(TrCode::NoSuchTwitterId),
        _ => {
            warn!(code, detail = message, "unknown provider error");
            Translated::new(TrCode::TwitterUnknownError)
        }
    }
}

/// Convert a failed provider/store call into the caller's outcome.
///
/// Coded provider rejections go through [`classify`]; anything without an
/// extractable code (transport, store) falls back to the operation-specific
/// `general` outcome, which carries the caller's context.
pub fn translate(err: &Error, requested: &[String], general: Translated) -> Translated {
    match err {
        Error::Provider { code, message } => classify(*code, message, requested),
        other => {
            warn!(error = %other, "call failed without a provider error code");
            general
        }
    }
}
