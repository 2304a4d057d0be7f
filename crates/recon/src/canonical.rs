//! Canonical institution records.
//!
//! Raw records from several sources are consolidated by institution kind and
//! normalized name into one record per institution. Later duplicates only
//! fill gaps; they never overwrite a field an earlier source already supplied.

use std::collections::HashMap;
use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::lexicon::Lexicon;
use crate::model::{RawNameRecord, WebsiteMatch};
use crate::normalize::{clean_display_name, Normalizer};
use crate::url_filter::UrlFilter;

pub const DEFAULT_LICENSE: &str = "Unknown";

const REQUIRED_FIELD_POINTS: u32 = 15;
const OPTIONAL_FIELD_POINTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionKind {
    University,
    Polytechnic,
    College,
    Nursing,
    Military,
}

impl InstitutionKind {
    /// Substring classification; anything unrecognised is a university.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("university") {
            Self::University
        } else if lower.contains("polytechnic") {
            Self::Polytechnic
        } else if lower.contains("college") {
            Self::College
        } else if lower.contains("nursing") {
            Self::Nursing
        } else if lower.contains("military") {
            Self::Military
        } else {
            Self::University
        }
    }
}

impl fmt::Display for InstitutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::University => write!(f, "university"),
            Self::Polytechnic => write!(f, "polytechnic"),
            Self::College => write!(f, "college"),
            Self::Nursing => write!(f, "nursing"),
            Self::Military => write!(f, "military"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    Federal,
    State,
    Private,
}

impl Ownership {
    /// Substring classification; defaults to federal.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("federal") {
            Self::Federal
        } else if lower.contains("state") {
            Self::State
        } else if lower.contains("private") {
            Self::Private
        } else {
            Self::Federal
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Federal => write!(f, "federal"),
            Self::State => write!(f, "state"),
            Self::Private => write!(f, "private"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub source_url: String,
    pub fetched_at: String,
    pub license: String,
}

impl Provenance {
    pub fn new(source_url: &str, license: Option<&str>) -> Self {
        Self {
            source_url: source_url.to_string(),
            fetched_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            license: license
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(DEFAULT_LICENSE)
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalInstitution {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InstitutionKind,
    pub ownership: Ownership,
    pub state: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
    pub matched_name: Option<String>,
    pub confidence: Option<f64>,
    pub contact: Contact,
    pub accreditation_status: Option<String>,
    pub sources: Vec<String>,
    pub provenance: Provenance,
    pub data_quality_score: u32,
    pub missing_fields: Vec<String>,
    // `kind` and `ownership` always hold a value; these record whether a
    // source actually stated it.
    #[serde(skip)]
    kind_supplied: bool,
    #[serde(skip)]
    ownership_supplied: bool,
}

impl CanonicalInstitution {
    /// Attach a matched website. Returns false, leaving the record untouched,
    /// when it already has one.
    pub fn apply_match(&mut self, m: &WebsiteMatch) -> bool {
        if self.website.is_some() {
            return false;
        }
        self.website = Some(m.website.clone());
        self.matched_name = Some(m.matched_name.clone());
        self.confidence = Some(m.confidence);
        self.refresh_quality();
        true
    }

    fn refresh_quality(&mut self) {
        let (score, missing) = quality(self);
        self.data_quality_score = score;
        self.missing_fields = missing;
    }
}

/// Required fields score 15 each, optional fields 5 each, capped at 100.
fn quality(inst: &CanonicalInstitution) -> (u32, Vec<String>) {
    let required = [
        ("name", !inst.name.is_empty()),
        ("type", inst.kind_supplied),
        ("ownership", inst.ownership_supplied),
        ("state", inst.state.is_some()),
        ("city", inst.city.is_some()),
    ];
    let optional = [
        ("website", inst.website.is_some()),
        ("email", inst.contact.email.is_some()),
        ("phone", inst.contact.phone.is_some()),
        ("accreditation_status", inst.accreditation_status.is_some()),
    ];

    let mut score = 0;
    let mut missing = Vec::new();
    for (field, present) in required {
        if present {
            score += REQUIRED_FIELD_POINTS;
        } else {
            missing.push(field.to_string());
        }
    }
    for (field, present) in optional {
        if present {
            score += OPTIONAL_FIELD_POINTS;
        } else {
            missing.push(field.to_string());
        }
    }
    (score.min(100), missing)
}

/// Stated type when present, otherwise inferred from the name.
fn kind_of(record: &RawNameRecord) -> InstitutionKind {
    match non_empty(&record.kind) {
        Some(kind) => InstitutionKind::parse(&kind),
        None => InstitutionKind::parse(&record.name),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Builds canonical records from raw adapter output.
#[derive(Debug, Clone, Default)]
pub struct Consolidator {
    normalizer: Normalizer,
    filter: UrlFilter,
    lexicon: Lexicon,
}

impl Consolidator {
    pub fn new(lexicon: &Lexicon) -> Self {
        Self {
            normalizer: Normalizer::from_lexicon(lexicon),
            filter: UrlFilter::from_lexicon(lexicon),
            lexicon: lexicon.clone(),
        }
    }

    /// Deduplicate by kind and normalized name, keeping first-seen order.
    ///
    /// The token form drops type words, so "Kwara State University" and
    /// "Kwara State Polytechnic" share one; the kind keeps them apart. Names
    /// made only of stopwords ("University of Nigeria") fall back to their
    /// plain form. Only blank names are dropped.
    pub fn consolidate(&self, records: &[RawNameRecord]) -> Vec<CanonicalInstitution> {
        let mut out: Vec<CanonicalInstitution> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in records {
            let mut form = self.normalizer.normalize(&record.name);
            if form.is_empty() {
                form = self.normalizer.plain(&record.name);
            }
            if form.is_empty() {
                log::debug!("dropping record with blank name from {}", record.source);
                continue;
            }

            let kind = kind_of(record);
            let key = format!("{kind}:{form}");
            match index.get(&key) {
                Some(&i) => self.fill_gaps(&mut out[i], record),
                None => {
                    index.insert(key, out.len());
                    out.push(self.build(kind, &form, record));
                }
            }
        }

        out
    }

    fn build(&self, kind: InstitutionKind, form: &str, record: &RawNameRecord) -> CanonicalInstitution {
        let mut inst = CanonicalInstitution {
            id: format!("{kind}-{}", form.replace(' ', "-")),
            name: clean_display_name(&record.name),
            kind,
            ownership: Ownership::parse(record.ownership.as_deref().unwrap_or_default()),
            state: self.state_of(record),
            city: non_empty(&record.city),
            website: self.website_of(record),
            matched_name: None,
            confidence: None,
            contact: Contact {
                email: non_empty(&record.email),
                phone: non_empty(&record.phone),
            },
            accreditation_status: non_empty(&record.accreditation_status),
            sources: vec![record.source.clone()],
            provenance: Provenance::new(
                record.source_url.as_deref().unwrap_or_default(),
                record.license.as_deref(),
            ),
            data_quality_score: 0,
            missing_fields: Vec::new(),
            kind_supplied: non_empty(&record.kind).is_some(),
            ownership_supplied: non_empty(&record.ownership).is_some(),
        };
        inst.refresh_quality();
        inst
    }

    fn fill_gaps(&self, inst: &mut CanonicalInstitution, record: &RawNameRecord) {
        // The dedupe key already pins the kind; a later source can only
        // confirm it.
        if !inst.kind_supplied && non_empty(&record.kind).is_some() {
            inst.kind_supplied = true;
        }
        if !inst.ownership_supplied {
            if let Some(ownership) = non_empty(&record.ownership) {
                inst.ownership = Ownership::parse(&ownership);
                inst.ownership_supplied = true;
            }
        }
        if inst.website.is_none() {
            inst.website = self.website_of(record);
        }
        if inst.state.is_none() {
            inst.state = self.state_of(record);
        }
        if inst.city.is_none() {
            inst.city = non_empty(&record.city);
        }
        if inst.contact.email.is_none() {
            inst.contact.email = non_empty(&record.email);
        }
        if inst.contact.phone.is_none() {
            inst.contact.phone = non_empty(&record.phone);
        }
        if inst.accreditation_status.is_none() {
            inst.accreditation_status = non_empty(&record.accreditation_status);
        }
        if !inst.sources.contains(&record.source) {
            inst.sources.push(record.source.clone());
        }
        inst.refresh_quality();
    }

    fn website_of(&self, record: &RawNameRecord) -> Option<String> {
        non_empty(&record.website).filter(|w| self.filter.is_valid(w))
    }

    fn state_of(&self, record: &RawNameRecord) -> Option<String> {
        record
            .state
            .as_deref()
            .and_then(|s| self.lexicon.normalize_state(s))
    }
}
