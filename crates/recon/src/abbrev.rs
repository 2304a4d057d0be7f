use crate::lexicon::{Abbreviation, Lexicon};

/// Minimum length of a synthesized initialism.
const MIN_INITIALISM_LEN: usize = 3;

/// Resolves a name to a short form usable as a domain label.
#[derive(Debug, Clone)]
pub struct Abbreviator {
    table: Vec<Abbreviation>,
}

impl Default for Abbreviator {
    fn default() -> Self {
        Self::from_lexicon(&Lexicon::default())
    }
}

impl Abbreviator {
    pub fn new(table: Vec<Abbreviation>) -> Self {
        Self { table }
    }

    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        Self::new(lexicon.abbreviations.clone())
    }

    /// Table lookup first (substring of the lowercased name, first hit wins),
    /// then initials of every word longer than two characters.
    pub fn abbreviate(&self, name: &str) -> Option<String> {
        let lower = name.to_lowercase();
        if lower.trim().is_empty() {
            return None;
        }

        if let Some(hit) = self.table.iter().find(|a| lower.contains(a.name.as_str())) {
            return Some(hit.abbreviation.to_lowercase());
        }

        let words: Vec<&str> = name.split_whitespace().collect();
        if words.len() < 2 {
            return None;
        }

        let initials: String = words
            .iter()
            .filter(|w| w.chars().count() > 2)
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        (initials.len() >= MIN_INITIALISM_LEN).then_some(initials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup() {
        let a = Abbreviator::default();
        assert_eq!(a.abbreviate("University of Lagos").as_deref(), Some("unilag"));
        assert_eq!(a.abbreviate("UNIVERSITY OF IBADAN").as_deref(), Some("ui"));
        assert_eq!(a.abbreviate("Obafemi Awolowo University, Ile-Ife").as_deref(), Some("oau"));
        assert_eq!(
            a.abbreviate("Federal University of Technology, Minna").as_deref(),
            Some("fut")
        );
    }

    #[test]
    fn first_table_hit_wins() {
        let a = Abbreviator::new(vec![
            Abbreviation { name: "lagos".into(), abbreviation: "lag".into() },
            Abbreviation { name: "university of lagos".into(), abbreviation: "unilag".into() },
        ]);
        assert_eq!(a.abbreviate("University of Lagos").as_deref(), Some("lag"));
    }

    #[test]
    fn initials_fallback() {
        let a = Abbreviator::default();
        // "of" is too short to contribute an initial.
        assert_eq!(a.abbreviate("Lagos State University").as_deref(), Some("lsu"));
        assert_eq!(a.abbreviate("Yaba College of Technology").as_deref(), Some("yct"));
        assert_eq!(
            a.abbreviate("Federal Polytechnic (Nekede) Owerri").as_deref(),
            Some("fpo")
        );
    }

    #[test]
    fn initialism_too_short() {
        let a = Abbreviator::default();
        assert_eq!(a.abbreviate("Covenant University"), None);
        assert_eq!(a.abbreviate("Babcock"), None);
        assert_eq!(a.abbreviate("Kwara of Ilorin"), None);
        assert_eq!(a.abbreviate(""), None);
        assert_eq!(a.abbreviate("   "), None);
    }
}
