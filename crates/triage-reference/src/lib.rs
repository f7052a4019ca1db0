//! The Reference Runtime (C12): loads every static reference corpus once at startup
//! and hands back an immutable, indexed view. No global state — callers own the
//! `ReferenceRuntime` value and pass it by reference through the pipeline.

pub mod emergency;
pub mod error;
pub mod question_bank;
pub mod rules;
pub mod runtime;
pub mod specialty;
pub mod synonym;

pub use emergency::{AgeRisk, EmergencyRules, HardTrigger, SoftTrigger};
pub use error::ReferenceError;
pub use question_bank::QuestionDef;
pub use rules::{CandidateConfig, EffectivenessEntry, RiskRules, StopRules};
pub use runtime::ReferenceRuntime;
pub use specialty::{DiseaseSpecialtyMapping, ScoringConstants, SpecialtyDef};
pub use synonym::SynonymIndex;
