use std::sync::Arc;

use serde::Serialize;

use super::ownership::OwnerChain;
use crate::auth::{AuthError, Claims, CredentialVerifier};
use crate::error::RegistryError;
use crate::types::{EntityId, Role};

/// How much of the hierarchy an actor may see and modify.
///
/// Constructed only through the role constructors or `from_claims`, so a
/// `MunicipalityAdmin` always has a municipality id and no barangay id, and a
/// `BarangayAdmin` always has both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    role: Role,
    municipality_id: Option<EntityId>,
    barangay_id: Option<EntityId>,
}

impl Scope {
    pub fn super_admin() -> Self {
        Self {
            role: Role::SuperAdmin,
            municipality_id: None,
            barangay_id: None,
        }
    }

    pub fn municipality_admin(municipality_id: EntityId) -> Self {
        Self {
            role: Role::MunicipalityAdmin,
            municipality_id: Some(municipality_id),
            barangay_id: None,
        }
    }

    pub fn barangay_admin(municipality_id: EntityId, barangay_id: EntityId) -> Self {
        Self {
            role: Role::BarangayAdmin,
            municipality_id: Some(municipality_id),
            barangay_id: Some(barangay_id),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn municipality_id(&self) -> Option<EntityId> {
        self.municipality_id
    }

    pub fn barangay_id(&self) -> Option<EntityId> {
        self.barangay_id
    }

    /// Build a scope from verified claims, rejecting role/id combinations that
    /// break the invariants above.
    pub fn from_claims(claims: &Claims) -> Result<Self, RegistryError> {
        let role: Role = claims.role.parse().map_err(RegistryError::ScopeMalformed)?;

        match (role, claims.municipality_id, claims.barangay_id) {
            (Role::SuperAdmin, None, None) => Ok(Self::super_admin()),
            (Role::SuperAdmin, _, _) => Err(RegistryError::ScopeMalformed(
                "SuperAdmin must not carry municipality or barangay ids".to_string(),
            )),
            (Role::MunicipalityAdmin, Some(m), None) => Ok(Self::municipality_admin(m)),
            (Role::MunicipalityAdmin, None, _) => Err(RegistryError::ScopeMalformed(
                "MunicipalityAdmin requires a municipality id".to_string(),
            )),
            (Role::MunicipalityAdmin, Some(_), Some(_)) => Err(RegistryError::ScopeMalformed(
                "MunicipalityAdmin must not carry a barangay id".to_string(),
            )),
            (Role::BarangayAdmin, Some(m), Some(b)) => Ok(Self::barangay_admin(m, b)),
            (Role::BarangayAdmin, _, _) => Err(RegistryError::ScopeMalformed(
                "BarangayAdmin requires both municipality and barangay ids".to_string(),
            )),
        }
    }

    /// The access table: whether an entity owned by `chain` lies inside this scope
    pub fn covers(&self, chain: &OwnerChain) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::MunicipalityAdmin => {
                chain.municipality_id.is_some() && chain.municipality_id == self.municipality_id
            }
            Role::BarangayAdmin => {
                chain.barangay_id.is_some() && chain.barangay_id == self.barangay_id
            }
        }
    }
}

/// Derives an actor's `Scope` from a raw credential
#[derive(Clone)]
pub struct ScopeResolver {
    verifier: Arc<dyn CredentialVerifier>,
}

impl ScopeResolver {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }

    /// `Unauthenticated` for a missing or invalid credential, `ScopeMalformed`
    /// when the claims do not form a valid scope
    pub fn resolve(&self, credential: Option<&str>) -> Result<Scope, RegistryError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Missing)?;
        let claims = self.verifier.verify(token)?;
        Scope::from_claims(&claims)
    }
}
