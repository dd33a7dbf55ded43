//! Admin roles and the permissions each one grants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::permissions::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Every permission.
    SuperAdmin,
    /// Runs day-to-day operations but cannot manage other admins.
    Manager,
    /// Read-only access plus exports.
    Auditor,
}

const MANAGER: &[&str] = &[
    ADMIN_VIEW_SELF,
    ADMIN_UPDATE_SELF,
    ADMIN_VIEW_ALL,
    USER_VIEW_ALL,
    USER_UPDATE,
    USER_DELETE,
    USER_APPROVE,
    DEPOSIT_VIEW_ALL,
    DEPOSIT_MANAGE,
    LOAN_VIEW_ALL,
    LOAN_APPROVE,
    CARD_VIEW_ALL,
    CARD_MANAGE,
    TRANSACTION_VIEW_ALL,
    TRANSACTIONS_EXPORT,
    ANALYTICS_VIEW,
];

const AUDITOR: &[&str] = &[
    ADMIN_VIEW_SELF,
    ADMIN_UPDATE_SELF,
    ADMIN_VIEW_ALL,
    USER_VIEW_ALL,
    DEPOSIT_VIEW_ALL,
    LOAN_VIEW_ALL,
    CARD_VIEW_ALL,
    TRANSACTION_VIEW_ALL,
    TRANSACTIONS_EXPORT,
    ANALYTICS_VIEW,
];

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::Manager => "manager",
            AdminRole::Auditor => "auditor",
        }
    }

    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            AdminRole::SuperAdmin => ALL,
            AdminRole::Manager => MANAGER,
            AdminRole::Auditor => AUDITOR,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(AdminRole::SuperAdmin),
            "manager" => Ok(AdminRole::Manager),
            "auditor" => Ok(AdminRole::Auditor),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_has_everything() {
        for permission in ALL {
            assert!(AdminRole::SuperAdmin.has_permission(permission));
        }
    }

    #[test]
    fn test_manager_cannot_manage_admins() {
        assert!(!AdminRole::Manager.has_permission(ADMIN_REGISTER));
        assert!(!AdminRole::Manager.has_permission(ADMIN_DELETE));
        assert!(!AdminRole::Manager.has_permission(ADMIN_UPDATE_OTHER));
        assert!(AdminRole::Manager.has_permission(LOAN_APPROVE));
    }

    #[test]
    fn test_auditor_is_read_only() {
        assert!(AdminRole::Auditor.has_permission(TRANSACTIONS_EXPORT));
        assert!(AdminRole::Auditor.has_permission(ANALYTICS_VIEW));
        assert!(!AdminRole::Auditor.has_permission(CARD_MANAGE));
        assert!(!AdminRole::Auditor.has_permission(DEPOSIT_MANAGE));
    }

    #[test]
    fn test_role_strings_round_trip() {
        for role in [AdminRole::SuperAdmin, AdminRole::Manager, AdminRole::Auditor] {
            assert_eq!(role.as_str().parse::<AdminRole>(), Ok(role));
        }
        assert!("root".parse::<AdminRole>().is_err());
    }
}
