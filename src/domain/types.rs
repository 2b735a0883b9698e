//! Strongly-typed value objects used by domain entities.
//!
//! Catalog records and saved builds carry these wrappers instead of raw
//! primitives so that identifiers, names and physical quantities are checked
//! once, when data enters the crate.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateUrl;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A quantity was negative, infinite or NaN.
    #[error("{0} must be a finite number, zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// URL validation failed.
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
    /// A build identifier was not a UUID.
    #[error("build id must be a UUID: {0}")]
    InvalidBuildId(String),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Generates a trimmed, non-empty text wrapper.
macro_rules! name_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trims whitespace and rejects empty input.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

/// Generates a finite, non-negative quantity.
macro_rules! quantity_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            /// Constructs a finite value that is zero or greater.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() && value >= 0.0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `f64` value.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }
    };
}

/// Catalog identifier of a product.
///
/// Catalogs key products either by a positive number or by a text key such
/// as `ram-5`; both forms are kept as written.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "ProductIdValue")]
pub enum ProductId {
    Number(i32),
    Key(String),
}

/// Product identifier exactly as it appears in JSON, before validation.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProductIdValue {
    Number(i64),
    Key(String),
}

impl ProductId {
    /// Creates a numeric identifier ensuring it is greater than zero.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self::Number(value))
        } else {
            Err(TypeConstraintError::NonPositiveId("product_id"))
        }
    }

    /// Creates a text identifier, trimming whitespace and rejecting empty keys.
    pub fn key<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, "product_id").map(Self::Key)
    }

    /// The numeric form, if this identifier has one.
    pub fn as_number(&self) -> Option<i32> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Key(_) => None,
        }
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(value) => serializer.serialize_i32(*value),
            Self::Key(key) => serializer.serialize_str(key),
        }
    }
}

impl TryFrom<i32> for ProductId {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<ProductIdValue> for ProductId {
    type Error = TypeConstraintError;

    fn try_from(value: ProductIdValue) -> Result<Self, Self::Error> {
        match value {
            ProductIdValue::Number(value) => i32::try_from(value)
                .map_err(|_| TypeConstraintError::InvalidValue(format!("product_id {value}")))
                .and_then(Self::new),
            ProductIdValue::Key(key) => Self::key(key),
        }
    }
}

impl From<i32> for ProductIdValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for ProductIdValue {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl PartialEq<i32> for ProductId {
    fn eq(&self, other: &i32) -> bool {
        self.as_number() == Some(*other)
    }
}

name_newtype!(ProductName, "Product display name.", "product name");
name_newtype!(BuildName, "User-facing name of a saved build.", "build name");

impl BuildName {
    /// Name given to builds created implicitly.
    pub const DEFAULT: &'static str = "My Build";

    /// The [`Self::DEFAULT`] name.
    pub fn default_build() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// Same name with `suffix` appended, e.g. `" (Copy)"`.
    pub fn suffixed(&self, suffix: &str) -> Self {
        Self(format!("{}{suffix}", self.0))
    }
}

quantity_newtype!(
    ProductPrice,
    "Non-negative price value in standard currency units.",
    "price"
);
quantity_newtype!(
    Wattage,
    "Power in watts. Draw for components, capacity for power supplies.",
    "wattage"
);
quantity_newtype!(Millimeters, "Physical length in millimetres.", "length");

/// Product image location: an absolute URL or a path relative to the
/// storefront, e.g. `assets/ram.png`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Constructs a trimmed location. Anything carrying a scheme must be a
    /// valid URL.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "image url")?;
        if trimmed.contains("://") && !trimmed.as_str().validate_url() {
            return Err(TypeConstraintError::InvalidUrl("image url"));
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ImageUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImageUrl> for String {
    fn from(value: ImageUrl) -> Self {
        value.0
    }
}

/// Identifier of a saved build, generated once at creation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BuildId(Uuid);

impl BuildId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier received from a caller.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidBuildId(value.to_string()))
    }

    pub const fn get(self) -> Uuid {
        self.0
    }
}

impl Display for BuildId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for BuildId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
