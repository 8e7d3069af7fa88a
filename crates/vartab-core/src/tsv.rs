//! Tab-separated variant files.
//!
//! One header row, then one row per variant. List fields are comma-joined and
//! the `rationale` column holds the evidence bundle as single-line JSON. No
//! quoting or escaping is applied: a tab or newline inside a value breaks the
//! row, and a comma inside a list element splits it on the way back in.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::VartabError;
use crate::evidence::AcmgEvidence;
use crate::variant::{Variant, VariantCollection, sample_variants};

/// Column names written by [`encode`], in order.
pub const FIELD_NAMES: [&str; 18] = [
    "chromosome",
    "position",
    "refAllele",
    "altAllele",
    "variantType",
    "consequence",
    "acmgClassification",
    "alleleFreq",
    "hgvsg",
    "hgvsc",
    "hgvsp",
    "aaChange",
    "geneName",
    "pubmedIds",
    "associatedDiseases",
    "dbSnpid",
    "transcript",
    "rationale",
];

/// Suggested filename when exporting the working collection.
pub const MODIFIED_FILENAME: &str = "variants-modified.tsv";

/// Suggested filename when exporting the built-in sample.
pub const TEMPLATE_FILENAME: &str = "variant-template.tsv";

/// Classification used when the column is missing or empty.
pub const UNKNOWN_CLASSIFICATION: &str = "unknown";

const LIST_SEP: char = ',';

// ── Encode ──

/// Render a collection as TSV text: header first, rows joined by `\n`.
pub fn encode(variants: &VariantCollection) -> String {
    let mut lines = Vec::with_capacity(variants.len() + 1);
    lines.push(FIELD_NAMES.join("\t"));
    for v in variants {
        lines.push(encode_row(v));
    }
    lines.join("\n")
}

/// The built-in sample as TSV, for users who need a starting file.
pub fn encode_template() -> String {
    encode(&sample_variants())
}

fn encode_row(v: &Variant) -> String {
    let fields: [String; 18] = [
        v.chromosome.clone(),
        v.position.to_string(),
        v.ref_allele.clone(),
        v.alt_allele.clone(),
        v.variant_type.clone(),
        v.consequence.clone(),
        v.acmg_classification.clone(),
        v.allele_freq.to_string(),
        v.hgvsg.clone(),
        v.hgvsc.clone(),
        v.hgvsp.clone(),
        v.aa_change.clone(),
        v.gene_name.clone(),
        join_list(&v.pubmed_ids),
        join_list(&v.associated_diseases),
        v.db_snpid.clone(),
        v.transcript.clone(),
        encode_rationale(&v.rationale),
    ];
    fields.join("\t")
}

fn join_list(items: &[String]) -> String {
    items.join(&LIST_SEP.to_string())
}

/// Single-line JSON for the `rationale` column.
pub fn encode_rationale(evidence: &AcmgEvidence) -> String {
    // Only string keys and plain values; serialization cannot fail.
    serde_json::to_string(evidence).unwrap_or_default()
}

// ── Decode ──

/// Parse TSV text into a collection.
///
/// Only a missing header is fatal. Short rows, unparseable numbers and a
/// malformed `rationale` all fall back to defaults, row by row.
pub fn decode(text: &str) -> Result<VariantCollection, VartabError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(VartabError::EmptyInput);
    }

    let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));
    let header: Vec<&str> = lines.next().ok_or(VartabError::EmptyInput)?.split('\t').collect();

    let mut variants = Vec::new();
    for (idx, line) in lines.enumerate() {
        // 1-based file line, header is line 1.
        let line_no = idx + 2;
        variants.push(decode_row(&header, line, line_no));
    }

    debug!(rows = variants.len(), columns = header.len(), "decoded variant table");
    Ok(VariantCollection::new(variants))
}

fn decode_row(header: &[&str], line: &str, line_no: usize) -> Variant {
    let values: Vec<&str> = line.split('\t').collect();

    // Later columns win when a header name repeats.
    let mut row: HashMap<&str, &str> = HashMap::with_capacity(header.len());
    for (i, name) in header.iter().enumerate() {
        if let Some(value) = values.get(i) {
            row.insert(*name, *value);
        }
    }
    let text = |name: &str| row.get(name).copied().unwrap_or("").to_string();

    let acmg_classification = match row.get("acmgClassification") {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_CLASSIFICATION.to_string(),
    };

    Variant {
        chromosome: text("chromosome"),
        position: parse_position(row.get("position").copied(), line_no),
        ref_allele: text("refAllele"),
        alt_allele: text("altAllele"),
        variant_type: text("variantType"),
        consequence: text("consequence"),
        acmg_classification,
        allele_freq: parse_allele_freq(row.get("alleleFreq").copied(), line_no),
        hgvsg: text("hgvsg"),
        hgvsc: text("hgvsc"),
        hgvsp: text("hgvsp"),
        aa_change: text("aaChange"),
        gene_name: text("geneName"),
        pubmed_ids: split_list(row.get("pubmedIds").copied()),
        associated_diseases: split_list(row.get("associatedDiseases").copied()),
        db_snpid: text("dbSnpid"),
        transcript: text("transcript"),
        rationale: decode_rationale(row.get("rationale").copied(), line_no),
    }
}

fn parse_position(raw: Option<&str>, line_no: usize) -> u64 {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return 0;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(line = line_no, value = raw, "position is not a non-negative integer, using 0");
        0
    })
}

fn parse_allele_freq(raw: Option<&str>, line_no: usize) -> f64 {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return 0.0;
    };
    match raw.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => f,
        _ => {
            warn!(line = line_no, value = raw, "alleleFreq is not a number, using 0");
            0.0
        }
    }
}

/// Comma-split with each element trimmed; empty input is an empty list.
fn split_list(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s.split(LIST_SEP).map(|v| v.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Parse the `rationale` column; anything unreadable becomes an empty bundle.
fn decode_rationale(raw: Option<&str>, line_no: usize) -> AcmgEvidence {
    let Some(raw) = raw else {
        return AcmgEvidence::empty();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(line = line_no, error = %e, "could not parse rationale JSON, using empty evidence");
        AcmgEvidence::empty()
    })
}
