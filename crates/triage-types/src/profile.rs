use serde::{Deserialize, Serialize};

/// Caller-supplied demographic context. Every field is optional — the pipeline must
/// produce a valid result even when none of it is known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub age: Option<u32>,
    pub pregnant: Option<bool>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}
