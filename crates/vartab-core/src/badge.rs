//! Compact display badges for the applied criteria of one variant.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::criteria::CriterionCode;
use crate::evidence::AcmgEvidence;

/// Curated label at the start of a note, e.g. `PM2:` or `BP6_stand-alone:`.
static NOTE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]+[0-9]+(?:_(?:supporting|stand-alone))?):").expect("valid note label regex")
});

/// One applied criterion as shown in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    /// The criterion note, verbatim.
    pub tooltip: String,
}

/// Label for a criterion: the note's leading `CODE[_strength]:` prefix without
/// the colon, or the upper-cased code when the note has no such prefix.
pub fn badge_label(code: CriterionCode, note: &str) -> String {
    match NOTE_LABEL.captures(note).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().to_string(),
        None => code.label(),
    }
}

/// Badges for every entry with score > 0, categories in `pvs .. bp` order and
/// entries in insertion order within a category.
pub fn derive_badges(evidence: &AcmgEvidence) -> Vec<Badge> {
    evidence
        .active()
        .map(|(_, code, entry)| Badge {
            label: badge_label(code, entry.note()),
            tooltip: entry.note().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::EvidenceEntry;
    use crate::variant::sample_variants;

    fn bundle(entries: &[(&str, u8, &str)]) -> AcmgEvidence {
        let mut ev = AcmgEvidence::empty();
        for (code, score, note) in entries {
            ev.set(code, EvidenceEntry::new(*score, *note).unwrap()).unwrap();
        }
        ev
    }

    #[test]
    fn falls_back_to_upper_cased_code() {
        let badges = derive_badges(&bundle(&[(
            "ps4",
            1,
            "some free-text note with no code prefix",
        )]));
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].label, "PS4");
        assert_eq!(badges[0].tooltip, "some free-text note with no code prefix");
    }

    #[test]
    fn note_prefix_overrides_code() {
        let note = "PM2: gnomAD 0.00110% is below threshold";
        let badges = derive_badges(&bundle(&[("pm2", 3, note)]));
        assert_eq!(badges[0].label, "PM2");
        assert_eq!(badges[0].tooltip, note);
    }

    #[test]
    fn strength_suffix_is_kept_as_written() {
        assert_eq!(
            badge_label(CriterionCode::Bp6, "BP6_stand-alone: ClinVar expert panel"),
            "BP6_stand-alone"
        );
        assert_eq!(
            badge_label(CriterionCode::Ps4, "PS4_supporting: rare"),
            "PS4_supporting"
        );
    }

    #[test]
    fn non_matching_prefixes_fall_back() {
        // lowercase, unknown suffix, missing colon, leading space
        assert_eq!(badge_label(CriterionCode::Pm2, "pm2: rare"), "PM2");
        assert_eq!(badge_label(CriterionCode::Pm2, "PM2_moderate: rare"), "PM2");
        assert_eq!(badge_label(CriterionCode::Pm2, "PM2 rare"), "PM2");
        assert_eq!(badge_label(CriterionCode::Pm2, " PM2: rare"), "PM2");
        assert_eq!(badge_label(CriterionCode::Pm2, ""), "PM2");
    }

    #[test]
    fn only_ascii_digits_form_a_label() {
        assert_eq!(badge_label(CriterionCode::Pm2, "PM\u{0662}: rare"), "PM2");
        assert_eq!(badge_label(CriterionCode::Pm2, "PM\u{FF12}: rare"), "PM2");
    }

    #[test]
    fn prefix_may_name_another_code() {
        assert_eq!(badge_label(CriterionCode::Pp5, "BP6: reputable source"), "BP6");
    }

    #[test]
    fn inactive_entries_never_produce_badges() {
        let badges = derive_badges(&bundle(&[
            ("pvs1", 0, "PVS1: null variant"),
            ("bs1", 0, "BS1: common"),
        ]));
        assert!(badges.is_empty());
    }

    #[test]
    fn empty_bundle_yields_no_badges() {
        assert!(derive_badges(&AcmgEvidence::empty()).is_empty());
    }

    #[test]
    fn order_is_category_then_insertion() {
        let badges = derive_badges(&bundle(&[
            ("bp7", 1, ""),
            ("bp4", 1, ""),
            ("pm2", 2, ""),
            ("pvs1", 5, ""),
        ]));
        let labels: Vec<&str> = badges.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["PVS1", "PM2", "BP7", "BP4"]);
    }

    #[test]
    fn sample_badges() {
        let sample = sample_variants();
        let badges = derive_badges(&sample.as_slice()[0].rationale);
        let labels: Vec<&str> = badges.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["PS4_supporting", "PM2", "BP4", "BP6_stand-alone", "BP7"]
        );
    }
}
