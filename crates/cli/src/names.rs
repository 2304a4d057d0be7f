//! `edurepo normalize` and `edurepo score`.

use edurepo_recon::{Abbreviator, Normalizer, ReconConfig, Scorer};
use serde::Serialize;

use crate::reconcile::checked_threshold;
use crate::util::emit_json;
use crate::CliError;

#[derive(Serialize)]
struct NameForms {
    name: String,
    normalized: String,
    domain: String,
    abbreviation: Option<String>,
}

pub fn cmd_normalize(config: &ReconConfig, names: &[String], json: bool) -> Result<(), CliError> {
    let lexicon = config.lexicon();
    let normalizer = Normalizer::from_lexicon(&lexicon);
    let abbreviator = Abbreviator::from_lexicon(&lexicon);

    let forms: Vec<NameForms> = names
        .iter()
        .map(|name| NameForms {
            name: name.clone(),
            normalized: normalizer.normalize(name),
            domain: normalizer.normalize_for_domain(name),
            abbreviation: abbreviator.abbreviate(name),
        })
        .collect();

    if json {
        return emit_json(&forms, None, true);
    }

    for f in &forms {
        println!("{}", f.name);
        println!("  normalized:   {}", f.normalized);
        println!("  domain:       {}", f.domain);
        println!("  abbreviation: {}", f.abbreviation.as_deref().unwrap_or("-"));
    }
    Ok(())
}

pub fn cmd_score(
    config: &ReconConfig,
    name_a: &str,
    name_b: &str,
    threshold: Option<f64>,
    json: bool,
) -> Result<(), CliError> {
    let threshold = checked_threshold(threshold, config.matching.min_threshold)?;

    let scorer = Scorer::new(Normalizer::from_lexicon(&config.lexicon()));
    let result = scorer.matches(name_a, name_b, threshold);

    if json {
        return emit_json(&result, None, true);
    }

    println!(
        "{:.2}\t{}",
        result.score,
        if result.is_match { "match" } else { "no match" }
    );
    eprintln!("threshold {}", result.threshold);
    Ok(())
}
