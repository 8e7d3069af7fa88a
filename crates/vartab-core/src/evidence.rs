//! ACMG evidence bundle: per-category mappings from criterion code to a
//! `(score, note)` entry.
//!
//! Each category mapping keeps insertion order. Badge order and the JSON
//! encoding of the rationale field both follow it.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::criteria::{Category, CriterionCode};
use crate::error::VartabError;

/// Highest applied strength rating (stand-alone).
pub const MAX_SCORE: u8 = 5;

static DEFAULT_ENTRY: EvidenceEntry = EvidenceEntry {
    score: 0,
    note: String::new(),
};

/// The `(0, "")` entry that absent codes read as.
pub fn default_entry() -> EvidenceEntry {
    EvidenceEntry::default()
}

/// One criterion's evidence. Score 0 means "not applied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceEntry {
    score: u8,
    note: String,
}

impl EvidenceEntry {
    pub fn new(score: u8, note: impl Into<String>) -> Result<Self, VartabError> {
        if score > MAX_SCORE {
            return Err(VartabError::InvalidScore(score));
        }
        Ok(Self {
            score,
            note: note.into(),
        })
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn is_active(&self) -> bool {
        self.score > 0
    }
}

impl Serialize for EvidenceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.score)?;
        tup.serialize_element(&self.note)?;
        tup.end()
    }
}

impl EvidenceEntry {
    /// Read an entry from its JSON form, accepting the shapes hand-edited
    /// files tend to contain: integral floats (`3.0`), numeric strings, and a
    /// missing or `null` note. Returns `None` when no valid score can be read.
    fn from_json(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        let score = match items.first()? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }?;
        let note = match items.get(1) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(_) => return None,
        };
        EvidenceEntry::new(u8::try_from(score).ok()?, note).ok()
    }
}

/// Evidence for a single category, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    entries: Vec<(CriterionCode, EvidenceEntry)>,
}

impl Evidence {
    /// Entry for `code`, or `(0, "")` if the code is absent.
    pub fn get(&self, code: CriterionCode) -> &EvidenceEntry {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, e)| e)
            .unwrap_or(&DEFAULT_ENTRY)
    }

    pub fn contains(&self, code: CriterionCode) -> bool {
        self.entries.iter().any(|(c, _)| *c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CriterionCode, &EvidenceEntry)> {
        self.entries.iter().map(|(c, e)| (*c, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace; a replaced code keeps its position.
    fn insert(&mut self, code: CriterionCode, entry: EvidenceEntry) {
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((code, entry)),
        }
    }

    fn entry_mut(&mut self, code: CriterionCode) -> &mut EvidenceEntry {
        let idx = match self.entries.iter().position(|(c, _)| *c == code) {
            Some(i) => i,
            None => {
                self.entries.push((code, EvidenceEntry::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn remove(&mut self, code: CriterionCode) -> Option<EvidenceEntry> {
        let idx = self.entries.iter().position(|(c, _)| *c == code)?;
        Some(self.entries.remove(idx).1)
    }
}

impl Serialize for Evidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, entry) in &self.entries {
            map.serialize_entry(code.as_str(), entry)?;
        }
        map.end()
    }
}

/// The seven category mappings for one variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcmgEvidence {
    categories: [Evidence; 7],
}

impl AcmgEvidence {
    /// All seven categories present and empty.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn category(&self, category: Category) -> &Evidence {
        &self.categories[category as usize]
    }

    /// Entry for `code` in its own category, `(0, "")` when absent.
    pub fn get(&self, code: CriterionCode) -> &EvidenceEntry {
        self.category(code.category()).get(code)
    }

    /// Typed insert; the code is routed to its own category.
    pub fn insert(&mut self, code: CriterionCode, entry: EvidenceEntry) {
        self.categories[code.category() as usize].insert(code, entry);
    }

    /// Insert or replace the entry stored under a textual code.
    pub fn set(&mut self, code: &str, entry: EvidenceEntry) -> Result<(), VartabError> {
        let code: CriterionCode = code.parse()?;
        self.insert(code, entry);
        Ok(())
    }

    /// Change only the score, creating `(0, "")` first if the code is absent.
    pub fn set_score(&mut self, code: &str, score: u8) -> Result<(), VartabError> {
        let code: CriterionCode = code.parse()?;
        if score > MAX_SCORE {
            return Err(VartabError::InvalidScore(score));
        }
        self.categories[code.category() as usize].entry_mut(code).score = score;
        Ok(())
    }

    /// Change only the note, creating `(0, "")` first if the code is absent.
    pub fn set_note(&mut self, code: &str, note: impl Into<String>) -> Result<(), VartabError> {
        let code: CriterionCode = code.parse()?;
        self.categories[code.category() as usize].entry_mut(code).note = note.into();
        Ok(())
    }

    /// Delete a code from its category, returning what was stored.
    pub fn remove(&mut self, code: &str) -> Result<Option<EvidenceEntry>, VartabError> {
        let code: CriterionCode = code.parse()?;
        Ok(self.categories[code.category() as usize].remove(code))
    }

    /// Categories in fixed order with their mappings.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Evidence)> {
        Category::ALL.into_iter().map(move |c| (c, self.category(c)))
    }

    /// Entries with score > 0: category order, then insertion order.
    pub fn active(&self) -> impl Iterator<Item = (Category, CriterionCode, &EvidenceEntry)> {
        self.iter().flat_map(|(cat, ev)| {
            ev.iter()
                .filter(|(_, e)| e.is_active())
                .map(move |(code, e)| (cat, code, e))
        })
    }

    /// True when no category holds any entry.
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(Evidence::is_empty)
    }
}

impl Serialize for AcmgEvidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (cat, ev) in self.iter() {
            map.serialize_entry(cat.as_str(), ev)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AcmgEvidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawAcmgEvidence::deserialize(deserializer).map(AcmgEvidence::from)
    }
}

// ── Lenient wire form ──

/// Category mapping as read from JSON, keys and entries not yet validated.
#[derive(Default)]
struct RawEvidence(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawEvidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawEvidenceVisitor;

        impl<'de> Visitor<'de> for RawEvidenceVisitor {
            type Value = RawEvidence;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping criterion codes to [score, note]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, Value)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, entry)) = access.next_entry::<String, Value>()? {
                    // Repeated keys keep the first position and the last value.
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = entry,
                        None => entries.push((key, entry)),
                    }
                }
                Ok(RawEvidence(entries))
            }
        }

        deserializer.deserialize_map(RawEvidenceVisitor)
    }
}

#[derive(Deserialize)]
struct RawAcmgEvidence {
    #[serde(default)]
    pvs: RawEvidence,
    #[serde(default)]
    ps: RawEvidence,
    #[serde(default)]
    pm: RawEvidence,
    #[serde(default)]
    pp: RawEvidence,
    #[serde(default)]
    ba: RawEvidence,
    #[serde(default)]
    bs: RawEvidence,
    #[serde(default)]
    bp: RawEvidence,
}

impl From<RawAcmgEvidence> for AcmgEvidence {
    fn from(raw: RawAcmgEvidence) -> Self {
        let mut out = AcmgEvidence::empty();
        let groups = [
            (Category::Pvs, raw.pvs),
            (Category::Ps, raw.ps),
            (Category::Pm, raw.pm),
            (Category::Pp, raw.pp),
            (Category::Ba, raw.ba),
            (Category::Bs, raw.bs),
            (Category::Bp, raw.bp),
        ];
        for (cat, RawEvidence(entries)) in groups {
            for (key, value) in entries {
                match key.parse::<CriterionCode>() {
                    Ok(code) if code.category() == cat => match EvidenceEntry::from_json(&value) {
                        Some(entry) => out.categories[cat as usize].insert(code, entry),
                        None => {
                            warn!(code = %code, value = %value, "dropping criterion with unreadable [score, note]")
                        }
                    },
                    Ok(code) => {
                        warn!(code = %code, category = %cat, "dropping criterion filed under the wrong category")
                    }
                    Err(_) => warn!(code = %key, category = %cat, "dropping unknown criterion"),
                }
            }
        }
        out
    }
}
