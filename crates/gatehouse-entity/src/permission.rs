//! Capability flags granted through roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A capability granted by role membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Open protected pages.
    View,
    /// Change analysis settings.
    Edit,
    /// Upload data files.
    Upload,
    /// Download reports.
    Download,
    /// Manage price alerts.
    ConfigureAlerts,
}

impl Permission {
    /// Return the permission as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Upload => "upload",
            Self::Download => "download",
            Self::ConfigureAlerts => "configure_alerts",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = gatehouse_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            "upload" => Ok(Self::Upload),
            "download" => Ok(Self::Download),
            "configure_alerts" => Ok(Self::ConfigureAlerts),
            _ => Err(gatehouse_core::AppError::validation(format!(
                "Unknown permission: '{s}'"
            ))),
        }
    }
}
