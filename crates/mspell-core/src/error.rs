//! Errors raised while reading spell data and engine options

use thiserror::Error;

use crate::spell::ParamKind;

/// A spell token or spell line that could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown spell '{0}'")]
    UnknownToken(String),

    #[error("unknown effect '{effect}' in '{token}'")]
    UnknownEffect { token: String, effect: String },

    #[error("unknown summon type '{0}'")]
    UnknownSummon(String),

    #[error("'{token}' takes a {expected} parameter, not '{arg}'")]
    IncompatibleOverride {
        token: String,
        arg: String,
        expected: ParamKind,
    },

    #[error("malformed argument '{arg}' in '{token}'")]
    MalformedArgument { token: String, arg: String },

    #[error("bad spell frequency '{0}'")]
    BadFrequency(String),

    #[error("bad spell power '{0}'")]
    BadPower(String),
}

/// A species whose spell data failed to load
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{species}: {source}")]
pub struct LoadError {
    pub species: String,
    #[source]
    pub source: ParseError,
}

/// Engine options that could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),

    #[error("missing value for option '{0}'")]
    MissingValue(String),
}
