pub mod cupcake_service;
pub mod error;
pub mod validate;

pub use cupcake_service::*;
pub use error::*;
pub use validate::*;
