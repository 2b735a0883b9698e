use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{BuildName, ProductId, ProductIdValue, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct CreateBuildForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateBuildFormPayload {
    pub name: BuildName,
}

#[derive(Debug, Error)]
pub enum CreateBuildFormError {
    #[error("Create build form validation failed: {0}")]
    Validation(String),
    #[error("Create build form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CreateBuildFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CreateBuildFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CreateBuildForm> for CreateBuildFormPayload {
    type Error = CreateBuildFormError;

    fn try_from(value: CreateBuildForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: BuildName::new(value.name)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RenameBuildForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameBuildFormPayload {
    pub name: BuildName,
}

#[derive(Debug, Error)]
pub enum RenameBuildFormError {
    #[error("Rename build form validation failed: {0}")]
    Validation(String),
    #[error("Rename build form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for RenameBuildFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RenameBuildFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RenameBuildForm> for RenameBuildFormPayload {
    type Error = RenameBuildFormError;

    fn try_from(value: RenameBuildForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: BuildName::new(value.name)?,
        })
    }
}

/// Catalog products are addressed by a positive number or a text key.
#[derive(Deserialize, Validate)]
pub struct SelectProductForm {
    pub product_id: ProductIdValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectProductFormPayload {
    pub product_id: ProductId,
}

#[derive(Debug, Error)]
pub enum SelectProductFormError {
    #[error("Select product form validation failed: {0}")]
    Validation(String),
    #[error("Select product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SelectProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SelectProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<SelectProductForm> for SelectProductFormPayload {
    type Error = SelectProductFormError;

    fn try_from(value: SelectProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            product_id: ProductId::try_from(value.product_id)?,
        })
    }
}
