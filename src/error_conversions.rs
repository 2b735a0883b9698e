//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service or repository error types,
//! so the `From` impls that cross layers live here.

use crate::builder::BuilderError;
use crate::domain::types::TypeConstraintError;
use crate::forms::builds::{CreateBuildFormError, RenameBuildFormError, SelectProductFormError};
use crate::repository::RepositoryError;
use crate::services::ServiceError;
use crate::services::export::DownloadError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<BuilderError> for ServiceError {
    fn from(val: BuilderError) -> Self {
        match val {
            BuilderError::NotFound(_) => ServiceError::NotFound,
            BuilderError::CategoryMismatch(e) => ServiceError::Form(e.to_string()),
        }
    }
}

impl From<DownloadError> for ServiceError {
    fn from(val: DownloadError) -> Self {
        match val {
            DownloadError::InvalidFormat(_) => ServiceError::Form(val.to_string()),
            DownloadError::CsvRender | DownloadError::XlsxRender => {
                log::error!("Failed to render build export: {val}");
                ServiceError::Internal
            }
        }
    }
}

impl From<CreateBuildFormError> for ServiceError {
    fn from(val: CreateBuildFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<RenameBuildFormError> for ServiceError {
    fn from(val: RenameBuildFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<SelectProductFormError> for ServiceError {
    fn from(val: SelectProductFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
