pub mod client;
pub mod todo;
pub mod validation;

pub use client::*;
pub use todo::*;
pub use validation::*;
