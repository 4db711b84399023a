use super::domain::{EvidenceEntry, SupplementCategory};

/// Read abstraction over the shared scientific-evidence base (AIS/Examine).
/// Only strong-evidence entries feed recommendations.
pub trait EvidenceStore: Send + Sync {
    fn strong_evidence(
        &self,
        category: SupplementCategory,
    ) -> Result<Vec<EvidenceEntry>, EvidenceError>;
}

/// Error enumeration for evidence lookups.
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("evidence store unavailable: {0}")]
    Unavailable(String),
}
