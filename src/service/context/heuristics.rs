//! Cheap first-pass validation of a claim's grounding
//!
//! Computed from the retrieved excerpt text, never from the generated
//! answer, so a claim cannot validate itself. The claim auditor is the
//! authoritative, stricter judge when invoked.

use crate::model::ValidationStatus;

/// Formal-citation markers: statute and ruling tokens as they appear in
/// Spanish legal sources. Matched case-sensitively ("ley" as a common noun
/// is not a citation).
const CITATION_MARKERS: &[&str] = &[
    "Ley",
    "Artículo",
    "Art.",
    "Real Decreto",
    "Directiva",
    "Reglamento",
    "Sentencia",
    "BOE",
];

/// Interpretive/doctrinal markers, matched case-insensitively
const DOCTRINE_MARKERS: &[&str] = &["doctrina", "jurisprudencia", "criterio interpretativo"];

/// Preliminary validation status from grounding text
///
/// A formal citation marker wins over doctrinal language; doctrinal
/// language without a citation is a partial grounding; neither means the
/// text cannot support a validated claim.
pub fn preliminary_status(grounding: &str) -> ValidationStatus {
    if CITATION_MARKERS
        .iter()
        .any(|marker| grounding.contains(marker))
    {
        return ValidationStatus::Validated;
    }

    let lowered = grounding.to_lowercase();
    if DOCTRINE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return ValidationStatus::Partial;
    }

    ValidationStatus::NotValidated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citation_marker_validates() {
        let grounding = "La Ley 24/2015 establece los requisitos de patentabilidad.";
        assert_eq!(preliminary_status(grounding), ValidationStatus::Validated);
    }

    #[test]
    fn doctrine_without_citation_is_partial() {
        let grounding = "Según doctrina mayoritaria, la protección alcanza a la interfaz.";
        assert_eq!(preliminary_status(grounding), ValidationStatus::Partial);
    }

    #[test]
    fn doctrine_is_case_insensitive() {
        let grounding = "La DOCTRINA del Tribunal es constante en este punto.";
        assert_eq!(preliminary_status(grounding), ValidationStatus::Partial);
    }

    #[test]
    fn citation_wins_over_doctrine() {
        let grounding = "La doctrina interpreta la Ley 24/2015 de forma restrictiva.";
        assert_eq!(preliminary_status(grounding), ValidationStatus::Validated);
    }

    #[test]
    fn neither_marker_is_not_validated() {
        let grounding = "El texto describe prácticas comerciales habituales.";
        assert_eq!(preliminary_status(grounding), ValidationStatus::NotValidated);
    }

    #[test]
    fn lowercase_ley_is_not_a_citation() {
        // Common-noun use must not count as a formal citation
        let grounding = "la ley del mercado manda aquí";
        assert_eq!(preliminary_status(grounding), ValidationStatus::NotValidated);
    }

    #[test]
    fn empty_grounding_is_not_validated() {
        assert_eq!(preliminary_status(""), ValidationStatus::NotValidated);
    }
}
