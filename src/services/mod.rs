pub mod builds;
pub mod catalog;
pub mod errors;
pub mod export;

pub use errors::{ServiceError, ServiceResult};
