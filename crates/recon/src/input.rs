//! File and payload loaders for targets, website listings and raw records.
//!
//! Loaders take the already-read text plus a label used in error messages;
//! the caller owns IO.

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::{RawNameRecord, TargetInstitution, WebsiteMap};

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum TargetPayload {
    Plain(Vec<TargetInstitution>),
    Envelope { data: Vec<TargetInstitution> },
}

/// JSON array of targets, or the API's `{"data": [...]}` envelope.
pub fn load_targets_json(source: &str, data: &str) -> Result<Vec<TargetInstitution>, ReconError> {
    let payload: TargetPayload = serde_json::from_str(data).map_err(|e| ReconError::InputParse {
        source: source.into(),
        message: e.to_string(),
    })?;
    Ok(match payload {
        TargetPayload::Plain(targets) => targets,
        TargetPayload::Envelope { data } => data,
    })
}

/// CSV with `id` and `name` columns; `type` and `website` are optional.
pub fn load_targets_csv(source: &str, data: &str) -> Result<Vec<TargetInstitution>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(source, e))?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| -> Result<usize, ReconError> {
        position(name).ok_or_else(|| ReconError::MissingColumn {
            source: source.into(),
            column: name.into(),
        })
    };

    let id_idx = required("id")?;
    let name_idx = required("name")?;
    let kind_idx = position("type");
    let website_idx = position("website");

    let optional = |record: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    let mut targets = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(source, e))?;
        let name = record.get(name_idx).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        targets.push(TargetInstitution {
            id: record.get(id_idx).unwrap_or("").to_string(),
            name: name.to_string(),
            kind: optional(&record, kind_idx),
            website: optional(&record, website_idx),
        });
    }
    Ok(targets)
}

/// Dispatch on content: a leading `[` or `{` means JSON, anything else CSV.
pub fn load_targets(source: &str, data: &str) -> Result<Vec<TargetInstitution>, ReconError> {
    if looks_like_json(data) {
        load_targets_json(source, data)
    } else {
        load_targets_csv(source, data)
    }
}

fn csv_error(source: &str, e: csv::Error) -> ReconError {
    ReconError::InputParse {
        source: source.into(),
        message: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Website listings
// ---------------------------------------------------------------------------

/// JSON object `{name: url}`. Key order is preserved.
pub fn load_website_map_json(source: &str, data: &str) -> Result<WebsiteMap, ReconError> {
    serde_json::from_str(data).map_err(|e| ReconError::InputParse {
        source: source.into(),
        message: e.to_string(),
    })
}

/// Plain-text listing, one `Name - https://url` per line. A hyphen or an
/// en dash separates the two parts; other lines are ignored.
pub fn parse_website_listing(text: &str) -> WebsiteMap {
    let mut map = WebsiteMap::new();
    for line in text.lines() {
        if let Some((name, url)) = parse_listing_line(line) {
            map.insert(name, url);
        }
    }
    map
}

fn parse_listing_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    let at = ["http://", "https://"]
        .iter()
        .filter_map(|scheme| line.find(scheme))
        .min()?;
    let (head, tail) = line.split_at(at);
    let name = head
        .trim_end()
        .strip_suffix('-')
        .or_else(|| head.trim_end().strip_suffix('\u{2013}'))?
        .trim();
    let url = tail.split_whitespace().next()?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), url.to_string()))
}

/// JSON object when the payload starts with `{`, text listing otherwise.
pub fn load_website_map(source: &str, data: &str) -> Result<WebsiteMap, ReconError> {
    if data.trim_start().starts_with('{') {
        load_website_map_json(source, data)
    } else {
        Ok(parse_website_listing(data))
    }
}

// ---------------------------------------------------------------------------
// Raw records
// ---------------------------------------------------------------------------

/// JSON array of raw records. Records without a `source` get `source`.
pub fn load_raw_records(source: &str, data: &str) -> Result<Vec<RawNameRecord>, ReconError> {
    let mut records: Vec<RawNameRecord> =
        serde_json::from_str(data).map_err(|e| ReconError::InputParse {
            source: source.into(),
            message: e.to_string(),
        })?;
    for r in records.iter_mut().filter(|r| r.source.is_empty()) {
        r.source = source.to_string();
    }
    Ok(records)
}

fn looks_like_json(data: &str) -> bool {
    matches!(data.trim_start().chars().next(), Some('[') | Some('{'))
}
