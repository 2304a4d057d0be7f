use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// `{name: url}` listing harvested from one source. Iteration order is
/// insertion order, which is also the tie-break order during matching.
pub type WebsiteMap = IndexMap<String, String>;

/// One scraped occurrence of an institution, as produced by a source adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNameRecord {
    #[serde(default)]
    pub source: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accreditation_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl RawNameRecord {
    pub fn new(source: &str, name: &str) -> Self {
        Self {
            source: source.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// One programme offered by an institution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramRecord {
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub utme_subjects: Vec<String>,
}

/// One year's admission cutoff for a programme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffRecord {
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    pub year: u16,
    pub cutoff: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// An institution already known to the persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInstitution {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl TargetInstitution {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: None,
            website: None,
        }
    }

    pub fn with_website(mut self, url: &str) -> Self {
        self.website = Some(url.to_string());
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    /// Blank strings count as missing.
    pub fn has_website(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.trim().is_empty())
    }
}

/// Ids arrive as strings from the API and as numbers from hand-written files.
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

// ---------------------------------------------------------------------------
// Matching output
// ---------------------------------------------------------------------------

/// A website attached to a target institution through a name match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteMatch {
    pub institution_id: String,
    pub institution_name: String,
    pub website: String,
    pub matched_name: String,
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    pub targets: usize,
    pub skipped_with_website: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub sources: usize,
    pub merged_entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub matches: Vec<WebsiteMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_accepts_numeric_and_string_ids() {
        let json = r#"[
            {"id": "ck1", "name": "University of Lagos", "type": "university", "website": null},
            {"id": 42, "name": "Yaba College of Technology"}
        ]"#;
        let targets: Vec<TargetInstitution> = serde_json::from_str(json).unwrap();
        assert_eq!(targets[0].id, "ck1");
        assert_eq!(targets[0].kind.as_deref(), Some("university"));
        assert_eq!(targets[1].id, "42");
        assert!(targets[1].website.is_none());
    }

    #[test]
    fn blank_website_is_missing() {
        let t = TargetInstitution::new("1", "X").with_website("   ");
        assert!(!t.has_website());
        let t = TargetInstitution::new("1", "X").with_website("https://x.edu.ng");
        assert!(t.has_website());
    }

    #[test]
    fn raw_record_optional_fields() {
        let json = r#"{"source": "nuc", "name": "Bayero University", "type": "University", "state": "Kano"}"#;
        let r: RawNameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.kind.as_deref(), Some("University"));
        assert_eq!(r.state.as_deref(), Some("Kano"));
        assert!(r.website.is_none());

        let out = serde_json::to_value(&r).unwrap();
        assert_eq!(out["type"], "University");
        assert!(out.get("website").is_none());
    }

    #[test]
    fn match_serializes_snake_case() {
        let m = WebsiteMatch {
            institution_id: "1".into(),
            institution_name: "University of Lagos".into(),
            website: "https://unilag.edu.ng".into(),
            matched_name: "Lagos".into(),
            confidence: 90.0,
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["institution_id"], "1");
        assert_eq!(v["matched_name"], "Lagos");
        assert_eq!(v["confidence"], 90.0);
    }
}
