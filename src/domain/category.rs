use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::domain::types::TypeConstraintError;

/// Component slot of a PC build. The set of slots is closed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Motherboard,
    Ram,
    Gpu,
    Storage,
    Psu,
    Case,
}

impl Category {
    /// Every category in slot order.
    pub const ALL: [Category; 7] = [
        Self::Cpu,
        Self::Motherboard,
        Self::Ram,
        Self::Gpu,
        Self::Storage,
        Self::Psu,
        Self::Case,
    ];

    /// Key used in persisted JSON and in API paths.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Motherboard => "motherboard",
            Self::Ram => "ram",
            Self::Gpu => "gpu",
            Self::Storage => "storage",
            Self::Psu => "psu",
            Self::Case => "case",
        }
    }

    /// Human-readable slot title.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cpu => "Processor (CPU)",
            Self::Motherboard => "Motherboard",
            Self::Ram => "Memory (RAM)",
            Self::Gpu => "Graphics Card",
            Self::Storage => "Storage (SSD)",
            Self::Psu => "Power Supply",
            Self::Case => "PC Case",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("category: {value}")))
    }
}

impl TryFrom<String> for Category {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}
