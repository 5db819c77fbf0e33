pub mod memory;
pub mod postgres;
pub(crate) mod row;
pub mod sqlite;
pub mod traits;

pub use memory::*;
pub use postgres::*;
pub use sqlite::*;
pub use traits::*;
