use crate::error::ReconError;
use crate::model::{CutoffRecord, ProgramRecord, RawNameRecord, WebsiteMap};

/// A provider of institution listings.
///
/// Output is untrusted: the reconciler filters every URL it receives.
/// Sources that do not publish a kind of data keep the empty default.
pub trait SourceAdapter {
    fn name(&self) -> &str;

    fn scrape_institution_websites(&self) -> Result<WebsiteMap, ReconError>;

    fn scrape_institutions(&self) -> Result<Vec<RawNameRecord>, ReconError> {
        Ok(Vec::new())
    }

    /// Programmes, optionally narrowed to one institution.
    fn scrape_programs(&self, _institution_id: Option<&str>) -> Result<Vec<ProgramRecord>, ReconError> {
        Ok(Vec::new())
    }

    /// Cutoff history, optionally narrowed to one programme.
    fn scrape_cutoffs(&self, _program_id: Option<&str>) -> Result<Vec<CutoffRecord>, ReconError> {
        Ok(Vec::new())
    }
}

/// In-memory source, used for file inputs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    websites: WebsiteMap,
    records: Vec<RawNameRecord>,
    programs: Vec<ProgramRecord>,
    cutoffs: Vec<CutoffRecord>,
}

impl StaticSource {
    pub fn new(name: &str, websites: WebsiteMap) -> Self {
        Self {
            name: name.to_string(),
            websites,
            records: Vec::new(),
            programs: Vec::new(),
            cutoffs: Vec::new(),
        }
    }

    pub fn with_records(mut self, records: Vec<RawNameRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_programs(mut self, programs: Vec<ProgramRecord>) -> Self {
        self.programs = programs;
        self
    }

    pub fn with_cutoffs(mut self, cutoffs: Vec<CutoffRecord>) -> Self {
        self.cutoffs = cutoffs;
        self
    }
}

impl SourceAdapter for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn scrape_institution_websites(&self) -> Result<WebsiteMap, ReconError> {
        Ok(self.websites.clone())
    }

    fn scrape_institutions(&self) -> Result<Vec<RawNameRecord>, ReconError> {
        Ok(self.records.clone())
    }

    fn scrape_programs(&self, institution_id: Option<&str>) -> Result<Vec<ProgramRecord>, ReconError> {
        Ok(self
            .programs
            .iter()
            .filter(|p| institution_id.map_or(true, |id| p.institution_id.as_deref() == Some(id)))
            .cloned()
            .collect())
    }

    fn scrape_cutoffs(&self, program_id: Option<&str>) -> Result<Vec<CutoffRecord>, ReconError> {
        Ok(self
            .cutoffs
            .iter()
            .filter(|c| program_id.map_or(true, |id| c.program_id.as_deref() == Some(id)))
            .cloned()
            .collect())
    }
}

/// Collect website maps from each source in order. A failing source is
/// logged and contributes nothing.
pub fn collect_website_maps(sources: &[Box<dyn SourceAdapter>]) -> Vec<WebsiteMap> {
    let mut maps = Vec::with_capacity(sources.len());
    for source in sources {
        match source.scrape_institution_websites() {
            Ok(map) => {
                log::info!("source {}: {} entries", source.name(), map.len());
                maps.push(map);
            }
            Err(e) => log::warn!("source {} failed: {e}", source.name()),
        }
    }
    maps
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl SourceAdapter for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn scrape_institution_websites(&self) -> Result<WebsiteMap, ReconError> {
            Err(ReconError::Source {
                source: "broken".into(),
                message: "HTTP 503".into(),
            })
        }
    }

    #[test]
    fn default_records_are_empty() {
        assert!(Broken.scrape_institutions().unwrap().is_empty());
        assert!(Broken.scrape_programs(None).unwrap().is_empty());
        assert!(Broken.scrape_cutoffs(Some("p1")).unwrap().is_empty());
    }

    #[test]
    fn static_source_narrows_programs_and_cutoffs() {
        let program = |inst: &str, name: &str| ProgramRecord {
            source: "unilag".into(),
            institution_id: Some(inst.into()),
            name: name.into(),
            ..ProgramRecord::default()
        };
        let cutoff = |prog: &str, year: u16, cutoff: u32| CutoffRecord {
            source: "unilag".into(),
            program_id: Some(prog.into()),
            year,
            cutoff,
            admission_mode: Some("UTME".into()),
            source_url: None,
        };
        let src = StaticSource::new("unilag", WebsiteMap::new())
            .with_programs(vec![
                program("ck1", "Medicine and Surgery"),
                program("ck1", "Computer Science"),
                program("ck2", "Law"),
            ])
            .with_cutoffs(vec![cutoff("mbbs", 2023, 280), cutoff("mbbs", 2022, 275), cutoff("csc", 2023, 240)]);

        assert_eq!(src.scrape_programs(None).unwrap().len(), 3);
        let ck1: Vec<_> = src.scrape_programs(Some("ck1")).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(ck1, vec!["Medicine and Surgery", "Computer Science"]);

        let mbbs = src.scrape_cutoffs(Some("mbbs")).unwrap();
        assert_eq!(mbbs.iter().map(|c| c.cutoff).collect::<Vec<_>>(), vec![280, 275]);
        assert!(src.scrape_cutoffs(Some("law")).unwrap().is_empty());
    }

    #[test]
    fn failing_source_is_skipped() {
        let mut map = WebsiteMap::new();
        map.insert("Bayero University".into(), "https://buk.edu.ng".into());
        let sources: Vec<Box<dyn SourceAdapter>> =
            vec![Box::new(Broken), Box::new(StaticSource::new("file", map))];
        let maps = collect_website_maps(&sources);
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0]["Bayero University"], "https://buk.edu.ng");
    }

    #[test]
    fn static_source_returns_records() {
        let src = StaticSource::new("nuc", WebsiteMap::new())
            .with_records(vec![RawNameRecord::new("nuc", "Bayero University")]);
        assert_eq!(src.name(), "nuc");
        assert_eq!(src.scrape_institutions().unwrap().len(), 1);
    }
}
