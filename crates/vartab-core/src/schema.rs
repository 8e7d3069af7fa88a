/// Arrow schemas and batch builders for the variant table.
pub mod table {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float64Array, ListBuilder, StringArray, StringBuilder, UInt64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;

    use crate::badge::derive_badges;
    use crate::error::VartabError;
    use crate::tsv::encode_rationale;
    use crate::variant::Variant;

    /// Placeholder shown in place of an empty badge list.
    pub const NO_CRITERIA: &str = "No criteria";

    fn utf8_list() -> DataType {
        DataType::List(Arc::new(Field::new("item", DataType::Utf8, true)))
    }

    /// Every TSV column with its typed Arrow form, plus the derived `badges`.
    pub fn variant_table_schema() -> Schema {
        Schema::new(vec![
            Field::new("chromosome", DataType::Utf8, false),
            Field::new("position", DataType::UInt64, false),
            Field::new("refAllele", DataType::Utf8, false),
            Field::new("altAllele", DataType::Utf8, false),
            Field::new("variantType", DataType::Utf8, false),
            Field::new("consequence", DataType::Utf8, false),
            Field::new("acmgClassification", DataType::Utf8, false),
            Field::new("alleleFreq", DataType::Float64, false),
            Field::new("hgvsg", DataType::Utf8, false),
            Field::new("hgvsc", DataType::Utf8, false),
            Field::new("hgvsp", DataType::Utf8, false),
            Field::new("aaChange", DataType::Utf8, false),
            Field::new("geneName", DataType::Utf8, false),
            Field::new("pubmedIds", utf8_list(), false),
            Field::new("associatedDiseases", utf8_list(), false),
            Field::new("dbSnpid", DataType::Utf8, false),
            Field::new("transcript", DataType::Utf8, false),
            Field::new("rationale", DataType::Utf8, false),
            Field::new("badges", utf8_list(), false),
        ])
    }

    /// The columns the table view shows by default.
    pub fn summary_schema() -> Schema {
        Schema::new(vec![
            Field::new("Gene", DataType::Utf8, false),
            Field::new("c.", DataType::Utf8, false),
            Field::new("p.", DataType::Utf8, false),
            Field::new("Consequence", DataType::Utf8, false),
            Field::new("Classification", DataType::Utf8, false),
            Field::new("ACMG Rationale", DataType::Utf8, false),
        ])
    }

    /// Build a full-width batch, one row per variant in input order.
    pub fn to_record_batch<'a, I>(variants: I) -> Result<RecordBatch, VartabError>
    where
        I: IntoIterator<Item = &'a Variant>,
    {
        let rows: Vec<&Variant> = variants.into_iter().collect();
        let strings = |f: fn(&Variant) -> &str| -> ArrayRef {
            Arc::new(StringArray::from_iter_values(rows.iter().map(|v| f(v))))
        };
        let lists = |f: fn(&Variant) -> Vec<String>| -> ArrayRef {
            let mut builder = ListBuilder::new(StringBuilder::new());
            for v in &rows {
                for item in f(v) {
                    builder.values().append_value(item);
                }
                builder.append(true);
            }
            Arc::new(builder.finish())
        };

        let columns: Vec<ArrayRef> = vec![
            strings(|v| v.chromosome.as_str()),
            Arc::new(UInt64Array::from_iter_values(rows.iter().map(|v| v.position))),
            strings(|v| v.ref_allele.as_str()),
            strings(|v| v.alt_allele.as_str()),
            strings(|v| v.variant_type.as_str()),
            strings(|v| v.consequence.as_str()),
            strings(|v| v.acmg_classification.as_str()),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|v| v.allele_freq))),
            strings(|v| v.hgvsg.as_str()),
            strings(|v| v.hgvsc.as_str()),
            strings(|v| v.hgvsp.as_str()),
            strings(|v| v.aa_change.as_str()),
            strings(|v| v.gene_name.as_str()),
            lists(|v| v.pubmed_ids.clone()),
            lists(|v| v.associated_diseases.clone()),
            strings(|v| v.db_snpid.as_str()),
            strings(|v| v.transcript.as_str()),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|v| encode_rationale(&v.rationale)),
            )),
            lists(|v| {
                derive_badges(&v.rationale)
                    .into_iter()
                    .map(|b| b.label)
                    .collect()
            }),
        ];

        Ok(RecordBatch::try_new(Arc::new(variant_table_schema()), columns)?)
    }

    /// Build the compact table: gene, short notations, consequence,
    /// classification and space-separated badge labels.
    pub fn to_summary_batch<'a, I>(variants: I) -> Result<RecordBatch, VartabError>
    where
        I: IntoIterator<Item = &'a Variant>,
    {
        let rows: Vec<&Variant> = variants.into_iter().collect();
        let badges: Vec<String> = rows
            .iter()
            .map(|v| {
                let labels: Vec<String> = derive_badges(&v.rationale)
                    .into_iter()
                    .map(|b| b.label)
                    .collect();
                if labels.is_empty() {
                    NO_CRITERIA.to_string()
                } else {
                    labels.join(" ")
                }
            })
            .collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|v| v.gene_name.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|v| v.coding_notation()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|v| v.protein_notation()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|v| v.consequence.as_str()))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|v| v.acmg_classification.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(badges)),
        ];

        Ok(RecordBatch::try_new(Arc::new(summary_schema()), columns)?)
    }
}
