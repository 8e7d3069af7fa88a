//! Vertical card display for variant records.
//!
//! Renders a single-row variant RecordBatch as a grouped, human-readable card
//! with type-aware formatting for scalars and lists, followed by the evidence
//! editor view of every catalog criterion.

use arrow::array::*;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use vartab_core::criteria;
use vartab_core::{AcmgEvidence, badge_label};

const MAX_LIST_ITEMS: usize = 10;

// ── Schema section groupings ──

const IDENTITY: &[&str] = &[
    "geneName",
    "transcript",
    "hgvsg",
    "hgvsc",
    "hgvsp",
    "aaChange",
    "dbSnpid",
];

const LOCUS: &[&str] = &[
    "chromosome",
    "position",
    "refAllele",
    "altAllele",
    "variantType",
];

const ANNOTATION: &[&str] = &["consequence", "acmgClassification", "alleleFreq"];

const LITERATURE: &[&str] = &["pubmedIds", "associatedDiseases"];

const CRITERIA: &[&str] = &["badges"];

// ── Public API ──

/// Print a single variant record as a vertical card grouped by schema section.
pub fn print_variant_card(batch: &RecordBatch) -> anyhow::Result<()> {
    let gene = get_utf8(batch, "geneName").unwrap_or_default();
    let hgvsc = get_utf8(batch, "hgvsc").unwrap_or_default();

    println!("=== {} {} ===", gene, hgvsc);
    println!();

    print_section(batch, "Identity", IDENTITY);
    print_section(batch, "Locus", LOCUS);
    print_section(batch, "Annotation", ANNOTATION);
    print_section(batch, "Literature", LITERATURE);
    print_section(batch, "Applied Criteria", CRITERIA);

    Ok(())
}

/// Print every catalog criterion grouped by editor section, with its score
/// and note. Absent criteria show as score 0.
pub fn print_evidence(evidence: &AcmgEvidence) {
    for (title, codes) in criteria::sections() {
        println!("{title}");
        for &code in codes {
            let entry = evidence.get(code);
            let marker = if entry.is_active() { "*" } else { " " };
            print!("  {marker} {:<6} {}", code.label(), entry.score());
            if entry.is_active() {
                print!("  [{}]", badge_label(code, entry.note()));
            }
            println!();
            if !entry.note().is_empty() {
                println!("      {}", entry.note());
            }
        }
        println!();
    }
}

// ── Section rendering ──

fn print_section(batch: &RecordBatch, header: &str, cols: &[&str]) {
    let schema = batch.schema();
    let has_data = cols.iter().any(|&col| {
        schema
            .index_of(col)
            .ok()
            .is_some_and(|i| !batch.column(i).is_null(0))
    });
    if !has_data {
        return;
    }

    println!("{header}");
    for &col_name in cols {
        let Ok(idx) = schema.index_of(col_name) else {
            continue;
        };
        let col = batch.column(idx);
        if col.is_null(0) {
            continue;
        }

        match schema.field(idx).data_type() {
            DataType::Utf8 => {
                if let Some(v) = col_str(col.as_ref(), 0)
                    && !v.is_empty()
                {
                    println!("  {:<20} {}", col_name, v);
                }
            }
            DataType::UInt64 => {
                if let Some(arr) = col.as_any().downcast_ref::<UInt64Array>() {
                    println!("  {:<20} {}", col_name, arr.value(0));
                }
            }
            DataType::Float64 => {
                if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
                    println!("  {:<20} {}", col_name, arr.value(0));
                }
            }
            DataType::List(inner) if inner.data_type() == &DataType::Utf8 => {
                print_list_utf8(col.as_ref(), col_name)
            }
            _ => println!("  {:<20} {:?}", col_name, col),
        }
    }
    println!();
}

// ── List<Utf8> ──

fn print_list_utf8(col: &dyn Array, col_name: &str) {
    let Some(list) = col.as_any().downcast_ref::<ListArray>() else {
        return;
    };
    let values = list.value(0);
    let Some(strings) = values.as_any().downcast_ref::<StringArray>() else {
        return;
    };
    let items: Vec<&str> = (0..strings.len())
        .filter(|&i| !strings.is_null(i))
        .map(|i| strings.value(i))
        .collect();
    if items.is_empty() {
        return;
    }
    let shown = items.len().min(MAX_LIST_ITEMS);
    println!("  {:<20} {}", col_name, items[..shown].join(", "));
    if items.len() > MAX_LIST_ITEMS {
        println!("  {:<20} ... and {} more", "", items.len() - MAX_LIST_ITEMS);
    }
}

// ── Helpers ──

fn get_utf8(batch: &RecordBatch, col_name: &str) -> Option<String> {
    let col = batch.column_by_name(col_name)?;
    col_str(col.as_ref(), 0).map(str::to_string)
}

/// Get a string value from a column that might be Utf8 or LargeUtf8.
fn col_str(col: &dyn Array, i: usize) -> Option<&str> {
    if col.is_null(i) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        return Some(arr.value(i));
    }
    if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        return Some(arr.value(i));
    }
    None
}
