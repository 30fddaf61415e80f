//! Role-to-permission mapping.

use std::collections::HashMap;

use gatehouse_core::config::RbacConfig;
use gatehouse_core::error::AppError;
use gatehouse_entity::account::UserRole;
use gatehouse_entity::permission::Permission;

/// Static role-permission table, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, Vec<Permission>>,
}

impl RbacPolicies {
    /// Built-in table.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        policies.insert(
            UserRole::Admin,
            vec![
                Permission::View,
                Permission::Edit,
                Permission::Upload,
                Permission::Download,
                Permission::ConfigureAlerts,
            ],
        );

        policies.insert(
            UserRole::Analyst,
            vec![
                Permission::View,
                Permission::Edit,
                Permission::Upload,
                Permission::Download,
            ],
        );

        policies.insert(
            UserRole::Viewer,
            vec![Permission::View, Permission::Download],
        );

        Self { policies }
    }

    /// Table from configuration, or the built-in one when none is configured.
    ///
    /// Role and permission names are checked here so a typo fails startup
    /// instead of silently granting nothing.
    pub fn from_config(config: &RbacConfig) -> Result<Self, AppError> {
        if config.roles.is_empty() {
            return Ok(Self::new());
        }

        let mut policies = HashMap::new();
        for (role_name, permission_names) in &config.roles {
            let role: UserRole = role_name
                .parse()
                .map_err(|e: AppError| AppError::configuration(e.message))?;

            let mut permissions = Vec::with_capacity(permission_names.len());
            for name in permission_names {
                let permission: Permission = name.parse().map_err(|e: AppError| {
                    AppError::configuration(format!("Role '{role_name}': {}", e.message))
                })?;
                if !permissions.contains(&permission) {
                    permissions.push(permission);
                }
            }
            policies.insert(role, permissions);
        }

        Ok(Self { policies })
    }

    /// Ordered permissions granted to `role`; empty when the table has no
    /// entry for it.
    pub fn permissions_for(&self, role: UserRole) -> &[Permission] {
        self.policies.get(&role).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
