//! Role-permission table overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Role-permission configuration.
///
/// When `roles` is empty the built-in table applies. Otherwise it replaces
/// the built-in table entirely; roles left out grant nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Role name to ordered permission names.
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<String>>,
}
