use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConstants {
    pub keyword_match_points: i64,
    pub phrase_match_points: i64,
    pub negative_keyword_penalty: i64,
}

impl Default for ScoringConstants {
    fn default() -> Self {
        Self {
            keyword_match_points: 3,
            phrase_match_points: 5,
            negative_keyword_penalty: -4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialtySpec {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub negative_keywords: Vec<String>,
    #[serde(default)]
    pub answer_boosts: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialtyKeywordsFile {
    pub scoring: ScoringConstants,
    pub specialties: Vec<SpecialtySpec>,
}

#[derive(Debug, Clone)]
pub struct SpecialtyDef {
    pub display_name: String,
    pub keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseToSpecialtyEntry {
    pub disease_label: String,
    pub specialty_id: String,
    pub display_name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseToSpecialtyFile {
    pub fallback_specialty_id: String,
    pub map: Vec<DiseaseToSpecialtyEntry>,
}

#[derive(Debug, Clone)]
pub struct DiseaseSpecialtyMapping {
    pub specialty_id: String,
    pub display_name: String,
    pub confidence: f64,
}
