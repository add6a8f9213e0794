use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    #[default]
    MoveType,
    Locations,
    Size,
    Date,
    Contact,
    Summary,
}

impl WizardStep {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::MoveType,
            Self::Locations,
            Self::Size,
            Self::Date,
            Self::Contact,
            Self::Summary,
        ]
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::MoveType => Some(Self::Locations),
            Self::Locations => Some(Self::Size),
            Self::Size => Some(Self::Date),
            Self::Date => Some(Self::Contact),
            Self::Contact => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::MoveType => None,
            Self::Locations => Some(Self::MoveType),
            Self::Size => Some(Self::Locations),
            Self::Date => Some(Self::Size),
            Self::Contact => Some(Self::Date),
            Self::Summary => Some(Self::Contact),
        }
    }

    /// One-based position shown in the progress header.
    pub const fn position(self) -> usize {
        match self {
            Self::MoveType => 1,
            Self::Locations => 2,
            Self::Size => 3,
            Self::Date => 4,
            Self::Contact => 5,
            Self::Summary => 6,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MoveType => "Type",
            Self::Locations => "Locations",
            Self::Size => "Size",
            Self::Date => "Date",
            Self::Contact => "Contact",
            Self::Summary => "Summary",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::MoveType => "move-type",
            Self::Locations => "locations",
            Self::Size => "size",
            Self::Date => "date",
            Self::Contact => "contact",
            Self::Summary => "summary",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Summary)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
