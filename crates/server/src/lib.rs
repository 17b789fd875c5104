pub mod errors;
pub mod identity;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use startup::run;
