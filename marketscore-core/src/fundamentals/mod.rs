//! Fundamentals: completeness detection, filing-fact extraction and
//! reconciliation of the primary snapshot with the filing source.

pub mod completeness;
pub mod filing;
pub mod reconcile;

pub use completeness::{
    field_weight, CompletenessDetector, CompletenessThresholds, FallbackRecommendation, FieldWeight,
    SparseDataResult,
};
pub use filing::{FactField, FilingFacts, RawConcept, RawFact, RawFilingDocument};
pub use reconcile::{
    DataReconciler, ReconcileOutcome, REASON_IDENTIFIER_NOT_FOUND, REASON_NOTHING_ADDED,
    REASON_SECONDARY_UNAVAILABLE,
};
