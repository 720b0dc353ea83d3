/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier type for every civic entity and administrator account
pub type EntityId = i64;

/// Administrative operations an actor can request against the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Action::Read)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// The five levels of the civic hierarchy, root first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Municipality,
    Barangay,
    Zone,
    Household,
    Resident,
}

impl EntityKind {
    /// Kind that owns this one, `None` for the root
    pub fn parent(&self) -> Option<EntityKind> {
        match self {
            EntityKind::Municipality => None,
            EntityKind::Barangay => Some(EntityKind::Municipality),
            EntityKind::Zone => Some(EntityKind::Barangay),
            EntityKind::Household => Some(EntityKind::Zone),
            EntityKind::Resident => Some(EntityKind::Household),
        }
    }

    /// Kind whose rows reference this one, `None` for the leaf
    pub fn child(&self) -> Option<EntityKind> {
        match self {
            EntityKind::Municipality => Some(EntityKind::Barangay),
            EntityKind::Barangay => Some(EntityKind::Zone),
            EntityKind::Zone => Some(EntityKind::Household),
            EntityKind::Household => Some(EntityKind::Resident),
            EntityKind::Resident => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Municipality => "municipality",
            EntityKind::Barangay => "barangay",
            EntityKind::Zone => "zone",
            EntityKind::Household => "household",
            EntityKind::Resident => "resident",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrator roles. Scopes are a fixed three-level ladder, not arbitrary ACLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    SuperAdmin,
    MunicipalityAdmin,
    BarangayAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::MunicipalityAdmin => "MunicipalityAdmin",
            Role::BarangayAdmin => "BarangayAdmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SuperAdmin" | "super_admin" | "superadmin" => Ok(Role::SuperAdmin),
            "MunicipalityAdmin" | "municipality_admin" | "municipalityadmin" => {
                Ok(Role::MunicipalityAdmin)
            }
            "BarangayAdmin" | "barangay_admin" | "barangayadmin" => Ok(Role::BarangayAdmin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}
