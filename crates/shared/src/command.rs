use std::fmt::Display;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load catalog {origin}: {reason}")]
    CatalogLoad { origin: String, reason: String },

    #[error("rotation state {target}: {reason}")]
    Persistence { target: String, reason: String },

    #[error("no dinners available in category: {0}")]
    EmptyCategory(String),

    #[error("no unused dinner left in category {category} after {attempts} draws")]
    NoUnusedDinner { category: String, attempts: usize },

    #[error("invalid week plan: {0}")]
    InvalidPlan(String),
}

impl Error {
    pub fn catalog(origin: impl Display, reason: impl Display) -> Self {
        Self::CatalogLoad {
            origin: origin.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn persistence(target: impl Display, reason: impl Display) -> Self {
        Self::Persistence {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the failure came from a category that cannot supply a dinner.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::EmptyCategory(_) | Self::NoUnusedDinner { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::InvalidPlan(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::InvalidPlan(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::InvalidPlan(format!($fmt, $($arg)*)))
    };
}
