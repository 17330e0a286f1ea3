// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConnectionError {
    #[error("Timed out")]
    TimedOut,
    #[error("Not connected")]
    NotConnected,
    #[error("{msg:?}")]
    Generic { msg: String },
}

impl ConnectionError {
    pub fn generic(err: impl ToString) -> Self {
        Self::Generic {
            msg: err.to_string(),
        }
    }
}
