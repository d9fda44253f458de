// Application layer - workflow operations over the repository.
// Every balance-mutating operation runs as one atomic unit of work
// against the store; partial application is never observable.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
