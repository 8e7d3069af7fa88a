//! The fixed ACMG criteria catalog.
//!
//! 28 criterion codes in 7 evidence categories. Codes are stored in the TSV
//! rationale field in lowercase (`pm2`), and shown upper-cased (`PM2`) when no
//! better label is available.

use std::fmt;
use std::str::FromStr;

use crate::error::VartabError;

/// Evidence category: direction (pathogenic/benign) plus strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Pvs,
    Ps,
    Pm,
    Pp,
    Ba,
    Bs,
    Bp,
}

impl Category {
    /// Categories in display and serialization order.
    pub const ALL: [Category; 7] = [
        Category::Pvs,
        Category::Ps,
        Category::Pm,
        Category::Pp,
        Category::Ba,
        Category::Bs,
        Category::Bp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pvs => "pvs",
            Category::Ps => "ps",
            Category::Pm => "pm",
            Category::Pp => "pp",
            Category::Ba => "ba",
            Category::Bs => "bs",
            Category::Bp => "bp",
        }
    }

    /// Section title used by the evidence editor.
    pub fn title(self) -> &'static str {
        match self {
            Category::Pvs => "Very Strong Evidence of Pathogenicity",
            Category::Ps => "Strong Evidence of Pathogenicity",
            Category::Pm => "Moderate Evidence of Pathogenicity",
            Category::Pp => "Supporting Evidence of Pathogenicity",
            Category::Ba => "Stand-Alone Evidence of Benign Impact",
            Category::Bs => "Strong Evidence of Benign Impact",
            Category::Bp => "Supporting Evidence of Benign Impact",
        }
    }

    /// Visual weight class (a background style token).
    pub fn weight_class(self) -> &'static str {
        match self {
            Category::Pvs => "bg-red-100",
            Category::Ps => "bg-orange-100",
            Category::Pm => "bg-yellow-100",
            Category::Pp => "bg-yellow-50",
            Category::Ba => "bg-green-100",
            Category::Bs => "bg-green-200",
            Category::Bp => "bg-green-50",
        }
    }

    /// The catalog codes belonging to this category, in catalog order.
    pub fn codes(self) -> &'static [CriterionCode] {
        use CriterionCode::*;
        match self {
            Category::Pvs => &[Pvs1],
            Category::Ps => &[Ps1, Ps2, Ps3, Ps4],
            Category::Pm => &[Pm1, Pm2, Pm3, Pm4, Pm5, Pm6],
            Category::Pp => &[Pp1, Pp2, Pp3, Pp4, Pp5],
            Category::Ba => &[Ba1],
            Category::Bs => &[Bs1, Bs2, Bs3, Bs4],
            Category::Bp => &[Bp1, Bp2, Bp3, Bp4, Bp5, Bp6, Bp7],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ACMG evidence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CriterionCode {
    Pvs1,
    Ps1,
    Ps2,
    Ps3,
    Ps4,
    Pm1,
    Pm2,
    Pm3,
    Pm4,
    Pm5,
    Pm6,
    Pp1,
    Pp2,
    Pp3,
    Pp4,
    Pp5,
    Ba1,
    Bs1,
    Bs2,
    Bs3,
    Bs4,
    Bp1,
    Bp2,
    Bp3,
    Bp4,
    Bp5,
    Bp6,
    Bp7,
}

impl CriterionCode {
    /// The whole catalog in catalog order.
    pub const ALL: [CriterionCode; 28] = {
        use CriterionCode::*;
        [
            Pvs1, Ps1, Ps2, Ps3, Ps4, Pm1, Pm2, Pm3, Pm4, Pm5, Pm6, Pp1, Pp2, Pp3, Pp4, Pp5, Ba1,
            Bs1, Bs2, Bs3, Bs4, Bp1, Bp2, Bp3, Bp4, Bp5, Bp6, Bp7,
        ]
    };

    pub fn as_str(self) -> &'static str {
        use CriterionCode::*;
        match self {
            Pvs1 => "pvs1",
            Ps1 => "ps1",
            Ps2 => "ps2",
            Ps3 => "ps3",
            Ps4 => "ps4",
            Pm1 => "pm1",
            Pm2 => "pm2",
            Pm3 => "pm3",
            Pm4 => "pm4",
            Pm5 => "pm5",
            Pm6 => "pm6",
            Pp1 => "pp1",
            Pp2 => "pp2",
            Pp3 => "pp3",
            Pp4 => "pp4",
            Pp5 => "pp5",
            Ba1 => "ba1",
            Bs1 => "bs1",
            Bs2 => "bs2",
            Bs3 => "bs3",
            Bs4 => "bs4",
            Bp1 => "bp1",
            Bp2 => "bp2",
            Bp3 => "bp3",
            Bp4 => "bp4",
            Bp5 => "bp5",
            Bp6 => "bp6",
            Bp7 => "bp7",
        }
    }

    pub fn category(self) -> Category {
        use CriterionCode::*;
        match self {
            Pvs1 => Category::Pvs,
            Ps1 | Ps2 | Ps3 | Ps4 => Category::Ps,
            Pm1 | Pm2 | Pm3 | Pm4 | Pm5 | Pm6 => Category::Pm,
            Pp1 | Pp2 | Pp3 | Pp4 | Pp5 => Category::Pp,
            Ba1 => Category::Ba,
            Bs1 | Bs2 | Bs3 | Bs4 => Category::Bs,
            Bp1 | Bp2 | Bp3 | Bp4 | Bp5 | Bp6 | Bp7 => Category::Bp,
        }
    }

    /// Upper-cased code, the fallback badge label.
    pub fn label(self) -> String {
        self.as_str().to_ascii_uppercase()
    }

    pub fn title(self) -> &'static str {
        self.category().title()
    }

    pub fn weight_class(self) -> &'static str {
        self.category().weight_class()
    }
}

impl fmt::Display for CriterionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriterionCode {
    type Err = VartabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CriterionCode::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| VartabError::UnknownCriterion(s.to_string()))
    }
}

/// Look up the category of a catalog code.
///
/// Codes are matched exactly as they appear in the rationale field (lowercase).
pub fn category_of(code: &str) -> Result<Category, VartabError> {
    code.parse::<CriterionCode>().map(CriterionCode::category)
}

/// Catalog grouped into editor sections: `(title, codes)` in catalog order.
pub fn sections() -> impl Iterator<Item = (&'static str, &'static [CriterionCode])> {
    Category::ALL.into_iter().map(|c| (c.title(), c.codes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_28_codes() {
        assert_eq!(CriterionCode::ALL.len(), 28);
        let total: usize = Category::ALL.iter().map(|c| c.codes().len()).sum();
        assert_eq!(total, 28);
    }

    #[test]
    fn category_sizes() {
        let sizes: Vec<usize> = Category::ALL.iter().map(|c| c.codes().len()).collect();
        assert_eq!(sizes, vec![1, 4, 6, 5, 1, 4, 7]);
    }

    #[test]
    fn every_code_belongs_to_its_listed_category() {
        for cat in Category::ALL {
            for code in cat.codes() {
                assert_eq!(code.category(), cat, "{code} listed under {cat}");
                assert!(code.as_str().starts_with(cat.as_str()));
            }
        }
    }

    #[test]
    fn category_of_known_codes() {
        assert_eq!(category_of("pvs1").unwrap(), Category::Pvs);
        assert_eq!(category_of("ps4").unwrap(), Category::Ps);
        assert_eq!(category_of("bp6").unwrap(), Category::Bp);
        assert_eq!(category_of("ba1").unwrap(), Category::Ba);
    }

    #[test]
    fn category_of_unknown_code_fails() {
        for bad in ["pm7", "bp8", "xx1", "", "PM2"] {
            match category_of(bad) {
                Err(VartabError::UnknownCriterion(code)) => assert_eq!(code, bad),
                other => panic!("expected UnknownCriterion for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn sections_follow_category_order() {
        let titles: Vec<&str> = sections().map(|(t, _)| t).collect();
        assert_eq!(titles.len(), 7);
        assert_eq!(titles[0], "Very Strong Evidence of Pathogenicity");
        assert_eq!(titles[6], "Supporting Evidence of Benign Impact");
    }

    #[test]
    fn display_data_is_looked_up_by_code() {
        assert_eq!(CriterionCode::Pm2.title(), "Moderate Evidence of Pathogenicity");
        assert_eq!(CriterionCode::Bs3.weight_class(), "bg-green-200");
        assert_eq!(CriterionCode::Pvs1.label(), "PVS1");
    }
}
