//! Variant records and the ordered collection they live in for a session.

use serde::Serialize;

use crate::criteria::CriterionCode;
use crate::evidence::{AcmgEvidence, EvidenceEntry};

/// One genomic variant under review. `hgvsc` is the key used for edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub chromosome: String,
    pub position: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub variant_type: String,
    pub consequence: String,
    /// Overall call, informally benign .. pathogenic; not enforced.
    pub acmg_classification: String,
    pub allele_freq: f64,
    pub hgvsg: String,
    pub hgvsc: String,
    pub hgvsp: String,
    pub aa_change: String,
    pub gene_name: String,
    pub pubmed_ids: Vec<String>,
    pub associated_diseases: Vec<String>,
    pub db_snpid: String,
    pub transcript: String,
    pub rationale: AcmgEvidence,
}

impl Variant {
    /// The `c.` part of `hgvsc` (text after the accession).
    pub fn coding_notation(&self) -> &str {
        short_notation(&self.hgvsc)
    }

    /// The `p.` part of `hgvsp`.
    pub fn protein_notation(&self) -> &str {
        short_notation(&self.hgvsp)
    }
}

/// Text after the first `:`; the whole string when there is nothing after it.
pub fn short_notation(hgvs: &str) -> &str {
    hgvs.split(':')
        .nth(1)
        .filter(|s| !s.is_empty())
        .unwrap_or(hgvs)
}

/// Ordered variants, in the row order of the most recent load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantCollection {
    variants: Vec<Variant>,
}

impl VariantCollection {
    pub fn new(variants: Vec<Variant>) -> Self {
        Self { variants }
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.variants.iter()
    }

    pub fn as_slice(&self) -> &[Variant] {
        &self.variants
    }

    /// First record whose `hgvsc` equals `key` exactly.
    pub fn find(&self, key: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.hgvsc == key)
    }

    /// Replace every record whose `hgvsc` equals `updated.hgvsc`.
    ///
    /// Returns the number of records replaced. When nothing matches the
    /// collection is left untouched and 0 is returned.
    pub fn replace_by_key(&mut self, updated: Variant) -> usize {
        let mut replaced = 0;
        for slot in self.variants.iter_mut().filter(|v| v.hgvsc == updated.hgvsc) {
            *slot = updated.clone();
            replaced += 1;
        }
        replaced
    }
}

impl<'a> IntoIterator for &'a VariantCollection {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

/// The built-in example the session starts from.
pub fn sample_variants() -> VariantCollection {
    use CriterionCode::*;

    let notes: [(CriterionCode, u8, &str); 28] = [
        (Pvs1, 0, "intron_variant is not a LoF consequence"),
        (Ps1, 0, ""),
        (Ps2, 0, ""),
        (Ps3, 0, ""),
        (
            Ps4,
            1,
            "PS4_supporting: No GWAS data found. TOPMed AF=0.00160% indicates rarity consistent with pathogenicity.",
        ),
        (Pm1, 0, ""),
        (
            Pm2,
            3,
            "PM2: gnomAD 0.00110% is below LOEUF-based threshold 0.02500%.",
        ),
        (Pm3, 0, ""),
        (Pm4, 0, ""),
        (Pm5, 0, ""),
        (Pm6, 0, ""),
        (Pp1, 0, ""),
        (Pp2, 0, ""),
        (Pp3, 0, ""),
        (Pp4, 0, ""),
        (Pp5, 0, ""),
        (Ba1, 0, ""),
        (Bs1, 0, ""),
        (Bs2, 0, ""),
        (Bs3, 0, ""),
        (Bs4, 0, ""),
        (Bp1, 0, ""),
        (Bp2, 0, ""),
        (Bp3, 0, ""),
        (
            Bp4,
            1,
            "BP4: 2 line(s) of computational evidence support a benign effect; supporting phylop 0.7 | supporting gerp 1.95",
        ),
        (Bp5, 0, ""),
        (
            Bp6,
            5,
            "BP6_stand-alone: Variant was found in ClinVar as likely benign with review status of reviewed by expert panel and given a weighted PP5 value of 5",
        ),
        (
            Bp7,
            1,
            "BP7: Variant has intronic associated consequence intron_variant with ABSplice score None",
        ),
    ];

    let mut rationale = AcmgEvidence::empty();
    for (code, score, note) in notes {
        let entry = EvidenceEntry::new(score, note).unwrap_or_default();
        rationale.insert(code, entry);
    }

    VariantCollection::new(vec![Variant {
        chromosome: "chr1".into(),
        position: 11169679,
        ref_allele: "G".into(),
        alt_allele: "T".into(),
        variant_type: "SNV".into(),
        consequence: "intron_variant".into(),
        acmg_classification: "benign".into(),
        allele_freq: 0.0016,
        hgvsg: "NC_000001.10:g.11169679G>T".into(),
        hgvsc: "NM_004958.3:c.7447 27C>A".into(),
        hgvsp: "n/a".into(),
        aa_change: "n/a".into(),
        gene_name: "MTOR".into(),
        pubmed_ids: Vec::new(),
        associated_diseases: vec![
            "overgrowth syndrome and/or cerebral malformations due to abnormalities in MTOR pathway genes"
                .into(),
        ],
        db_snpid: "rs369718641".into(),
        transcript: "NM_004958.3".into(),
        rationale,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(hgvsc: &str, gene: &str) -> Variant {
        Variant {
            hgvsc: hgvsc.into(),
            gene_name: gene.into(),
            ..Variant::default()
        }
    }

    #[test]
    fn replace_by_key_swaps_only_the_matching_record() {
        let mut coll = VariantCollection::new(vec![
            variant("NM_000001.1:c.1A>G", "AAA"),
            variant("NM_004958.3:c.7447 27C>A", "MTOR"),
            variant("NM_000003.1:c.3G>T", "CCC"),
        ]);
        let before = coll.clone();

        let mut edited = variant("NM_004958.3:c.7447 27C>A", "MTOR");
        edited.acmg_classification = "likely benign".into();
        assert_eq!(coll.replace_by_key(edited.clone()), 1);

        assert_eq!(coll.as_slice()[1], edited);
        assert_eq!(coll.as_slice()[0], before.as_slice()[0]);
        assert_eq!(coll.as_slice()[2], before.as_slice()[2]);
    }

    #[test]
    fn replace_by_key_without_match_is_a_no_op() {
        let mut coll = VariantCollection::new(vec![variant("NM_000001.1:c.1A>G", "AAA")]);
        let before = coll.clone();
        assert_eq!(coll.replace_by_key(variant("NM_999999.1:c.9del", "ZZZ")), 0);
        assert_eq!(coll, before);
    }

    #[test]
    fn replace_by_key_is_exact_match() {
        let mut coll = VariantCollection::new(vec![variant("NM_000001.1:c.1A>G", "AAA")]);
        assert_eq!(coll.replace_by_key(variant("nm_000001.1:c.1a>g", "X")), 0);
        assert_eq!(coll.replace_by_key(variant("NM_000001.1:c.1A>G ", "X")), 0);
    }

    #[test]
    fn short_notation_takes_text_after_colon() {
        assert_eq!(short_notation("NM_004958.3:c.7447 27C>A"), "c.7447 27C>A");
        assert_eq!(short_notation("n/a"), "n/a");
        assert_eq!(short_notation("NM_1:"), "NM_1:");
    }

    #[test]
    fn sample_has_one_mtor_record() {
        let sample = sample_variants();
        assert_eq!(sample.len(), 1);
        let v = &sample.as_slice()[0];
        assert_eq!(v.gene_name, "MTOR");
        assert_eq!(v.rationale.active().count(), 5);
        assert_eq!(v.rationale.get(CriterionCode::Bp6).score(), 5);
    }

    #[test]
    fn variant_json_uses_camel_case_fields() {
        let v = variant("NM_000001.1:c.1A>G", "AAA");
        let json = serde_json::to_value(&v).unwrap();
        assert!(json.get("geneName").is_some());
        assert!(json.get("dbSnpid").is_some());
        assert!(json["rationale"].get("pvs").is_some());
    }
}
