pub mod badge;
pub mod criteria;
mod error;
pub mod evidence;
pub mod schema;
pub mod session;
pub mod sort_key;
pub mod tsv;
pub mod variant;

pub use badge::{Badge, badge_label, derive_badges};
pub use criteria::{Category, CriterionCode, category_of};
pub use error::VartabError;
pub use evidence::{AcmgEvidence, Evidence, EvidenceEntry, default_entry};
pub use schema::table;
pub use session::{Session, SortColumn, ViewOptions};
pub use sort_key::chromosome_sort_key;
pub use tsv::{decode, encode};
pub use variant::{Variant, VariantCollection, sample_variants};
