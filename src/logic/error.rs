use thiserror::Error;

/// Errors produced while validating, merging or persisting cupcakes.
///
/// The display text of each validation variant is the message returned to
/// API clients, so it must stay stable.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("name is required")]
    NameRequired,

    #[error("name must have at least 2 characters")]
    NameTooShort,

    #[error("flavor is required")]
    FlavorRequired,

    #[error("price must be greater than zero")]
    InvalidPrice,

    /// The store has no row for the requested id.
    #[error("record not found")]
    NotFound,

    /// Raised by delete when the existence check fails.
    #[error("cupcake not found")]
    CupcakeNotFound,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    /// True for errors caused by the request content rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Store(_))
    }
}
