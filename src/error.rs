use std::num::ParseFloatError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid percentage `{input}`")]
    ParsePercentage {
        input: String,

        #[source]
        source: ParseFloatError,
    },

    #[error("unknown locale `{0}`")]
    UnknownLocale(String),

    #[error("invalid number `{input}`")]
    ParseOperand { input: String },
}
