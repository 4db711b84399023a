use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::domain::{
    Biometrics, BudgetRange, DietaryRestriction, MedicalCondition, ProfileId, TenantId, UserGoal,
    UserProfile,
};

/// Stored profile row as the external profile resolver returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub id: ProfileId,
    pub tenant_id: TenantId,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update applied to an existing profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub goal: Option<UserGoal>,
    #[serde(default)]
    pub dietary_restrictions: Option<BTreeSet<DietaryRestriction>>,
    #[serde(default)]
    pub medical_conditions: Option<BTreeSet<MedicalCondition>>,
    #[serde(default)]
    pub budget_range: Option<BudgetRange>,
    #[serde(default)]
    pub biometrics: Option<Biometrics>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut UserProfile) {
        if let Some(goal) = self.goal {
            profile.goal = goal;
        }
        if let Some(restrictions) = self.dietary_restrictions {
            profile.dietary_restrictions = restrictions;
        }
        if let Some(conditions) = self.medical_conditions {
            profile.medical_conditions = conditions;
        }
        if let Some(budget) = self.budget_range {
            profile.budget_range = budget;
        }
        if let Some(biometrics) = self.biometrics {
            profile.biometrics = Some(biometrics);
        }
    }
}

/// Storage abstraction for anamnesis profiles, scoped by tenant on every
/// call so no ambient tenant state exists.
pub trait ProfileStore: Send + Sync {
    fn create(
        &self,
        tenant_id: TenantId,
        profile: UserProfile,
    ) -> Result<StoredProfile, ProfileError>;

    fn fetch(
        &self,
        tenant_id: TenantId,
        id: ProfileId,
    ) -> Result<Option<StoredProfile>, ProfileError>;

    fn update(
        &self,
        tenant_id: TenantId,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<StoredProfile, ProfileError>;
}

/// Error enumeration for profile store failures.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile not found")]
    NotFound,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}
