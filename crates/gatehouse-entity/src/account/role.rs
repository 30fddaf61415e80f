//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Authorization tiers. Each resolves to a permission set through the
/// role-permission table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including alert configuration.
    Admin,
    /// Works with the data but cannot configure alerts.
    Analyst,
    /// Read and download only.
    #[default]
    Viewer,
}

impl UserRole {
    /// Every role, most privileged first.
    pub const ALL: [UserRole; 3] = [Self::Admin, Self::Analyst, Self::Viewer];

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Analyst => "analyst",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = gatehouse_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "analyst" => Ok(Self::Analyst),
            "viewer" => Ok(Self::Viewer),
            _ => Err(gatehouse_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, analyst, viewer"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("ANALYST".parse::<UserRole>().unwrap(), UserRole::Analyst);
        assert!("manager".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_default_is_viewer() {
        assert_eq!(UserRole::default(), UserRole::Viewer);
    }
}
