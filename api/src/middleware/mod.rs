pub mod cors;
pub mod rate_limit;

pub use cors::*;
pub use rate_limit::*;
