pub mod cupcake;

pub use cupcake::*;
