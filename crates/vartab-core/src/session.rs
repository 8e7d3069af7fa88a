//! The working collection for one editing session.
//!
//! A session starts from the built-in sample, is replaced wholesale by each
//! successful load, and has single records replaced by `hgvsc` when evidence
//! edits are saved. A failed load leaves the current collection in place.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::VartabError;
use crate::evidence::AcmgEvidence;
use crate::sort_key::chromosome_sort_key;
use crate::tsv;
use crate::variant::{Variant, VariantCollection, sample_variants};

/// Columns the table view can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Gene,
    Hgvsc,
    Hgvsp,
    Consequence,
    Classification,
    /// Karyotype order, then position.
    Position,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Gene,
        SortColumn::Hgvsc,
        SortColumn::Hgvsp,
        SortColumn::Consequence,
        SortColumn::Classification,
        SortColumn::Position,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Gene => "gene",
            SortColumn::Hgvsc => "hgvsc",
            SortColumn::Hgvsp => "hgvsp",
            SortColumn::Consequence => "consequence",
            SortColumn::Classification => "classification",
            SortColumn::Position => "position",
        }
    }

    fn compare(self, a: &Variant, b: &Variant) -> Ordering {
        match self {
            SortColumn::Gene => a.gene_name.cmp(&b.gene_name),
            SortColumn::Hgvsc => a.hgvsc.cmp(&b.hgvsc),
            SortColumn::Hgvsp => a.hgvsp.cmp(&b.hgvsp),
            SortColumn::Consequence => a.consequence.cmp(&b.consequence),
            SortColumn::Classification => a.acmg_classification.cmp(&b.acmg_classification),
            SortColumn::Position => chromosome_sort_key(&a.chromosome)
                .cmp(&chromosome_sort_key(&b.chromosome))
                .then(a.position.cmp(&b.position)),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        SortColumn::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = SortColumn::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown sort column '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// How to filter and order the table view.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// Case-insensitive substring of the gene name.
    pub gene: Option<String>,
    pub sort: Option<SortColumn>,
    pub descending: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    variants: VariantCollection,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session holding the built-in sample.
    pub fn new() -> Self {
        Self {
            variants: sample_variants(),
        }
    }

    pub fn with_variants(variants: VariantCollection) -> Self {
        Self { variants }
    }

    pub fn variants(&self) -> &VariantCollection {
        &self.variants
    }

    /// Replace the collection with the decoded contents of `text`.
    ///
    /// On error the current collection is kept. Returns the new row count.
    pub fn load(&mut self, text: &str) -> Result<usize, VartabError> {
        let decoded = tsv::decode(text)?;
        let rows = decoded.len();
        self.variants = decoded;
        info!(rows, "loaded variant table");
        Ok(rows)
    }

    /// Save an edited record over every record sharing its `hgvsc`.
    ///
    /// Returns the number of records replaced; 0 leaves the session unchanged.
    pub fn save(&mut self, updated: Variant) -> usize {
        let key = updated.hgvsc.clone();
        let replaced = self.variants.replace_by_key(updated);
        if replaced == 0 {
            warn!(hgvsc = %key, "no variant with this hgvsc; nothing saved");
        }
        replaced
    }

    /// Edit a copy of one record's evidence and save it back by value.
    ///
    /// Nothing is saved if `edit` fails. Returns `Ok(false)` when no record
    /// has the given `hgvsc`.
    pub fn edit_evidence<F>(&mut self, hgvsc: &str, edit: F) -> Result<bool, VartabError>
    where
        F: FnOnce(&mut AcmgEvidence) -> Result<(), VartabError>,
    {
        let Some(current) = self.variants.find(hgvsc) else {
            warn!(hgvsc, "no variant with this hgvsc; nothing to edit");
            return Ok(false);
        };
        let mut edited = current.clone();
        edit(&mut edited.rationale)?;
        Ok(self.save(edited) > 0)
    }

    /// TSV text of the current collection.
    pub fn export(&self) -> String {
        tsv::encode(&self.variants)
    }

    /// Filtered, sorted references into the collection.
    pub fn view(&self, opts: &ViewOptions) -> Vec<&Variant> {
        let needle = opts.gene.as_deref().map(str::to_lowercase);
        let mut rows: Vec<&Variant> = self
            .variants
            .iter()
            .filter(|v| match &needle {
                Some(n) => v.gene_name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();

        if let Some(col) = opts.sort {
            rows.sort_by(|a, b| {
                let ord = col.compare(a, b);
                if opts.descending { ord.reverse() } else { ord }
            });
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriterionCode;
    use crate::evidence::EvidenceEntry;

    const MTOR_KEY: &str = "NM_004958.3:c.7447 27C>A";

    fn variant(chrom: &str, pos: u64, gene: &str, hgvsc: &str) -> Variant {
        Variant {
            chromosome: chrom.into(),
            position: pos,
            gene_name: gene.into(),
            hgvsc: hgvsc.into(),
            acmg_classification: "uncertain significance".into(),
            ..Variant::default()
        }
    }

    fn three() -> Session {
        Session::with_variants(VariantCollection::new(vec![
            variant("chr10", 5, "PTEN", "NM_000314.8:c.1A>G"),
            variant("chr2", 9, "MSH2", "NM_000251.3:c.2A>G"),
            variant("chrX", 1, "DMD", "NM_004006.3:c.3A>G"),
        ]))
    }

    #[test]
    fn starts_with_sample() {
        let s = Session::new();
        assert_eq!(s.variants().len(), 1);
        assert!(s.variants().find(MTOR_KEY).is_some());
    }

    #[test]
    fn failed_load_keeps_previous_collection() {
        let mut s = Session::new();
        let before = s.variants().clone();
        assert!(matches!(s.load(""), Err(VartabError::EmptyInput)));
        assert_eq!(s.variants(), &before);
    }

    #[test]
    fn load_replaces_wholesale() {
        let mut s = Session::new();
        let text = tsv::encode(three().variants());
        assert_eq!(s.load(&text).unwrap(), 3);
        assert!(s.variants().find(MTOR_KEY).is_none());
        assert_eq!(s.variants().as_slice()[0].gene_name, "PTEN");
    }

    #[test]
    fn edit_evidence_saves_a_copy_by_key() {
        let mut s = Session::new();
        let saved = s
            .edit_evidence(MTOR_KEY, |ev| {
                ev.set_score("pp3", 1)?;
                ev.set_note("pp3", "PP3: REVEL 0.8")?;
                ev.remove("bp7")?;
                Ok(())
            })
            .unwrap();
        assert!(saved);
        let v = s.variants().find(MTOR_KEY).unwrap();
        assert_eq!(v.rationale.get(CriterionCode::Pp3), &EvidenceEntry::new(1, "PP3: REVEL 0.8").unwrap());
        assert_eq!(v.rationale.get(CriterionCode::Bp7).score(), 0);
    }

    #[test]
    fn failed_edit_saves_nothing() {
        let mut s = Session::new();
        let before = s.variants().clone();
        let err = s
            .edit_evidence(MTOR_KEY, |ev| {
                ev.set_score("pm2", 0)?;
                ev.set_score("pm7", 1)
            })
            .unwrap_err();
        assert!(matches!(err, VartabError::UnknownCriterion(_)));
        assert_eq!(s.variants(), &before);
    }

    #[test]
    fn edit_of_unknown_key_is_a_no_op() {
        let mut s = Session::new();
        let before = s.variants().clone();
        assert!(!s.edit_evidence("NM_0:c.0del", |ev| ev.set_score("pm2", 1)).unwrap());
        assert_eq!(s.variants(), &before);
    }

    #[test]
    fn export_round_trips_through_load() {
        let mut s = three();
        let text = s.export();
        s.load(&text).unwrap();
        assert_eq!(s.variants(), three().variants());
    }

    #[test]
    fn view_filters_gene_case_insensitively() {
        let s = three();
        let opts = ViewOptions {
            gene: Some("ms".into()),
            ..ViewOptions::default()
        };
        let rows = s.view(&opts);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gene_name, "MSH2");
    }

    #[test]
    fn view_sorts_by_position_in_karyotype_order() {
        let s = three();
        let opts = ViewOptions {
            sort: Some(SortColumn::Position),
            ..ViewOptions::default()
        };
        let genes: Vec<&str> = s.view(&opts).iter().map(|v| v.gene_name.as_str()).collect();
        assert_eq!(genes, vec!["MSH2", "PTEN", "DMD"]);
    }

    #[test]
    fn view_sorts_descending() {
        let s = three();
        let opts = ViewOptions {
            sort: Some(SortColumn::Gene),
            descending: true,
            ..ViewOptions::default()
        };
        let genes: Vec<&str> = s.view(&opts).iter().map(|v| v.gene_name.as_str()).collect();
        assert_eq!(genes, vec!["PTEN", "MSH2", "DMD"]);
    }

    #[test]
    fn unsorted_view_keeps_file_order() {
        let s = three();
        let genes: Vec<&str> = s
            .view(&ViewOptions::default())
            .iter()
            .map(|v| v.gene_name.as_str())
            .collect();
        assert_eq!(genes, vec!["PTEN", "MSH2", "DMD"]);
    }

    #[test]
    fn sort_column_parses_names() {
        assert_eq!("Gene".parse::<SortColumn>().unwrap(), SortColumn::Gene);
        assert_eq!("position".parse::<SortColumn>().unwrap(), SortColumn::Position);
        assert!("rsid".parse::<SortColumn>().is_err());
    }
}
