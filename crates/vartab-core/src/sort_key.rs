//! Sort key normalisation for chromosome names.
//!
//! Converts chromosome labels (e.g., "chr1", "2", "chrX", "chrM",
//! "chr1_KI270706v1_random") into lexicographically-sortable strings so that
//! sorting by key recovers karyotype order instead of string order.
//!
//! # Naming conventions handled
//!
//! - Optional `chr` prefix, any case: chr1 and 1 sort together
//! - Autosomes by number: 2 before 10
//! - Sex chromosomes after autosomes: X then Y
//! - Mitochondrial last among the named ones: M and MT
//! - Anything else (contigs, patches) after, in plain string order

/// Normalise a chromosome name into a lexicographically-sortable string.
///
/// Input: "chr1", "10", "chrX", "chrM", "chrUn_gl000220"
/// Output: "0.001.", "0.010.", "1.000.", "3.000.", "4.000.UN_GL000220"
///
/// # Algorithm
///
/// 1. Strip a leading `chr` (case-insensitive), upper-case the rest
/// 2. Pick a rank group: 0 numeric, 1 X, 2 Y, 3 M/MT, 4 other
/// 3. For numeric names, zero-pad the leading digits to 3 places and keep
///    any trailing suffix (alt contigs) after the number
/// 4. Join as `group.number.suffix`
pub fn chromosome_sort_key(s: &str) -> String {
    let s = s.trim();
    let upper = s.to_ascii_uppercase();
    let name = upper.strip_prefix("CHR").unwrap_or(&upper);

    if name.is_empty() {
        return "4.000.".to_string();
    }

    // Extract leading digits.
    let digit_end = name
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(name.len());
    if digit_end > 0 {
        let number: u32 = name[..digit_end].parse().unwrap_or(0);
        return format!("0.{:03}.{}", number, &name[digit_end..]);
    }

    let group = match name {
        "X" => 1,
        "Y" => 2,
        "M" | "MT" => 3,
        _ => 4,
    };
    let suffix = if group == 4 { name } else { "" };
    format!("{}.000.{}", group, suffix)
}
