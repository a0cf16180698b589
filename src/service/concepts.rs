//! Concept extraction from free legal text
//!
//! Pure keyword match plus shallow compound-term matching, no external
//! calls. The extracted terms feed the decomposition prompts as hints.

use regex::Regex;
use std::sync::OnceLock;

/// Domain terms for Spanish Intellectual Property law
const KEYWORDS: &[&str] = &[
    "patente",
    "software",
    "ia",
    "marca",
    "sonora",
    "diseño",
    "industrial",
    "derecho",
    "autor",
    "copyright",
    "ue",
    "españa",
    "cjeu",
    "boe",
    "oepm",
    "propiedad intelectual",
    "secreto industrial",
    "competencia desleal",
    "obra derivada",
    "convenio de berna",
    "tratado de la ompi",
    "obras huérfanas",
    "límites al derecho de autor",
    "copia privada",
];

/// Filler tokens that must not surface as concepts on their own
const STOPWORDS: &[&str] = &[
    "de", "la", "el", "y", "en", "para", "qué", "cómo", "cuándo",
];

/// Compound terms: two 4+ letter words, optionally joined by an article or
/// preposition ("secreto industrial", "límites de la protección")
fn compound_term_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\b([a-záéíóúñ]{4,}\s+(?:(?:de|la|el|los|las)\s+)?[a-záéíóúñ]{4,})\b")
            .expect("compound term regex is valid")
    })
}

/// Extract domain-relevant concepts from free text
///
/// Matches the keyword list first, then compound terms. Results keep their
/// first-seen order and contain no duplicates, so repeated calls over the
/// same text are deterministic.
pub fn extract_concepts(text: &str) -> Vec<String> {
    fn push_unique(candidate: &str, found: &mut Vec<String>) {
        if !found.iter().any(|c| c == candidate) {
            found.push(candidate.to_string());
        }
    }

    let lowered = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for keyword in KEYWORDS {
        if lowered.contains(keyword) {
            push_unique(keyword, &mut found);
        }
    }

    for capture in compound_term_regex().captures_iter(&lowered) {
        let token = capture[1].trim();
        if STOPWORDS.contains(&token) {
            continue;
        }
        if token.split_whitespace().count() <= 4 {
            push_unique(token, &mut found);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_listed_keywords() {
        let concepts =
            extract_concepts("¿Es patentable el software de IA bajo la ley de patentes?");
        assert!(concepts.iter().any(|c| c == "software"));
        assert!(concepts.iter().any(|c| c == "patente"));
    }

    #[test]
    fn finds_compound_terms() {
        let concepts = extract_concepts("El secreto industrial y la competencia desleal");
        assert!(concepts.iter().any(|c| c == "secreto industrial"));
        assert!(concepts.iter().any(|c| c == "competencia desleal"));
    }

    #[test]
    fn empty_text_yields_no_concepts() {
        assert!(extract_concepts("").is_empty());
    }

    #[test]
    fn no_duplicates_and_stable_order() {
        let text = "patente patente software, software y patente";
        let a = extract_concepts(text);
        let b = extract_concepts(text);
        assert_eq!(a, b);
        let patente_count = a.iter().filter(|c| c.as_str() == "patente").count();
        assert_eq!(patente_count, 1);
    }

    #[test]
    fn handles_accented_characters() {
        let concepts = extract_concepts("los límites al derecho de autor en España");
        assert!(concepts.iter().any(|c| c == "límites al derecho de autor"));
        assert!(concepts.iter().any(|c| c == "españa"));
    }
}
