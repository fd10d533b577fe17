pub mod client_extractor;
pub mod docs;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use client_extractor::*;
pub use error::*;
pub use extract::*;
pub use handlers::*;
pub use routes::*;
