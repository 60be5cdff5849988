use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::GtexClient;
use crate::error::{GtexError, Result};
use crate::parse;

const PROTEIN_CODING: &str = "protein coding";

/// One gene as returned by the `reference/gene` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneRecord {
    pub gene_symbol: String,
    pub gencode_id: String,
    #[serde(default)]
    pub entrez_gene_id: Option<i64>,
    pub gene_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl GeneRecord {
    pub fn is_protein_coding(&self) -> bool {
        self.gene_type == PROTEIN_CODING
    }

    /// Whether this record answers the given identifier: exact Gencode ID,
    /// unversioned Gencode prefix, or case-insensitive symbol.
    fn matches(&self, query: &str) -> bool {
        if looks_like_gencode_id(query) {
            self.gencode_id == query
                || self
                    .gencode_id
                    .strip_prefix(query)
                    .is_some_and(|rest| rest.starts_with('.'))
        } else {
            self.gene_symbol.eq_ignore_ascii_case(query)
        }
    }
}

/// True for versioned and unversioned GENCODE (Ensembl) gene IDs,
/// e.g. `ENSG00000130234.10` or `ENSG00000130234`.
pub fn looks_like_gencode_id(id: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^ENSG\d+(\.\d+)?$").unwrap())
        .is_match(id)
}

/// A single gene resolved from a symbol, a versioned Gencode ID, or an
/// unversioned Gencode ID.
///
/// When a symbol is ambiguous the FIRST protein-coding match in API response
/// order wins; callers that need every match should use [`Genes`] and
/// inspect the full sequence. A query that matches nothing fails with
/// [`GtexError::NotFound`] at construction, so the accessors are infallible.
#[derive(Debug, Clone)]
pub struct Gene {
    query: String,
    record: GeneRecord,
}

impl Gene {
    pub fn fetch(client: &GtexClient, gene_id: &str) -> Result<Self> {
        let envelope = client.get_envelope(
            "reference/gene",
            &[("geneId", gene_id.to_string())],
        )?;
        let records: Vec<GeneRecord> = parse::records(&envelope)?;
        Self::resolve(gene_id, records)
    }

    /// Decode a previously saved response body and resolve `gene_id` in it.
    pub fn from_json(gene_id: &str, body: &str) -> Result<Self> {
        let envelope = parse::envelope(body)?;
        Self::resolve(gene_id, parse::records(&envelope)?)
    }

    fn resolve(query: &str, records: Vec<GeneRecord>) -> Result<Self> {
        let record = records
            .into_iter()
            .filter(GeneRecord::is_protein_coding)
            .find(|r| r.matches(query))
            .ok_or_else(|| GtexError::not_found(query))?;
        debug!(target: "gtex", "resolved {:?} to {}", query, record.gencode_id);
        Ok(Self {
            query: query.to_string(),
            record,
        })
    }

    /// The identifier this model was constructed with.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn gene_symbol(&self) -> &str {
        &self.record.gene_symbol
    }

    pub fn gencode_id(&self) -> &str {
        &self.record.gencode_id
    }

    pub fn entrez_gene_id(&self) -> Option<i64> {
        self.record.entrez_gene_id
    }

    pub fn description(&self) -> Option<&str> {
        self.record.description.as_deref()
    }

    pub fn record(&self) -> &GeneRecord {
        &self.record
    }
}

/// The full result sequence for a multi-identifier gene query.
///
/// Unlike [`Gene`] nothing is deduplicated or tie-broken here: the accessors
/// surface every protein-coding record the API returned, in response order.
#[derive(Debug, Clone)]
pub struct Genes {
    records: Vec<GeneRecord>,
}

impl Genes {
    pub fn fetch(client: &GtexClient, gene_ids: &[&str]) -> Result<Self> {
        let envelope = client.get_envelope(
            "reference/gene",
            &[("geneId", gene_ids.join(","))],
        )?;
        let records: Vec<GeneRecord> = parse::records(&envelope)?;
        info!(target: "gtex", "gene query returned {} records", records.len());
        Ok(Self { records })
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let envelope = parse::envelope(body)?;
        Ok(Self {
            records: parse::records(&envelope)?,
        })
    }

    /// Every record as returned, including non-protein-coding ones.
    pub fn records(&self) -> &[GeneRecord] {
        &self.records
    }

    fn protein_coding(&self) -> impl Iterator<Item = &GeneRecord> {
        self.records.iter().filter(|r| r.is_protein_coding())
    }

    pub fn gene_symbols(&self) -> Vec<&str> {
        self.protein_coding().map(|r| r.gene_symbol.as_str()).collect()
    }

    pub fn gencode_ids(&self) -> Vec<&str> {
        self.protein_coding().map(|r| r.gencode_id.as_str()).collect()
    }

    pub fn entrez_gene_ids(&self) -> Vec<Option<i64>> {
        self.protein_coding().map(|r| r.entrez_gene_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::looks_like_gencode_id;

    #[test]
    fn recognizes_gencode_ids() {
        assert!(looks_like_gencode_id("ENSG00000130234.10"));
        assert!(looks_like_gencode_id("ENSG00000130234"));
        assert!(!looks_like_gencode_id("ACE2"));
        assert!(!looks_like_gencode_id("ENST00000252519.8")); // transcript, not gene
        assert!(!looks_like_gencode_id("ENSG00000130234.10.extra"));
    }
}
