use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use tracing::info;

use crate::client::GtexClient;
use crate::error::Result;
use crate::parse::{self, Clusters};

/// Page size sent to the expression endpoints; large enough that a query
/// over every tissue and a realistic gene list fits in one page.
const PAGE_SIZE: &str = "10000";

/// Sentinel prefix the service uses in place of a Newick string when too few
/// genes or tissues were queried to cluster.
const NO_CLUSTER_DATA: &str = "Not enough data";

/// Demographic attribute for stratifying expression records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetAttribute {
    Sex,
    AgeBracket,
}

impl SubsetAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubsetAttribute::Sex => "sex",
            SubsetAttribute::AgeBracket => "ageBracket",
        }
    }
}

impl fmt::Display for SubsetAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One median-expression value for a (gene, tissue) pair, optionally tagged
/// with the demographic bucket it was computed over.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedianExpressionRecord {
    pub gencode_id: String,
    pub gene_symbol: String,
    pub tissue_site_detail_id: String,
    pub median: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub dataset_id: String,
    #[serde(default)]
    pub subset_group: Option<String>,
}

/// Snapshot of the `expression/medianGeneExpression` endpoint.
///
/// No statistics are computed here; records are only regrouped. Sorting,
/// top-N selection, and the like belong to the visualization layer.
#[derive(Debug, Clone)]
pub struct MedianExpression {
    records: Vec<MedianExpressionRecord>,
    clusters: Option<Clusters>,
}

impl MedianExpression {
    pub fn fetch(client: &GtexClient, gencode_ids: &[&str], tissue_ids: &[&str]) -> Result<Self> {
        let envelope = client.get_envelope(
            "expression/medianGeneExpression",
            &[
                ("datasetId", client.dataset_id().to_string()),
                ("gencodeId", gencode_ids.join(",")),
                ("tissueSiteDetailId", tissue_ids.join(",")),
                ("hcluster", "true".to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
            ],
        )?;
        let records: Vec<MedianExpressionRecord> = parse::records(&envelope)?;
        info!(target: "gtex", "fetched {} median expression records", records.len());
        Ok(Self {
            records,
            clusters: envelope.clusters,
        })
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let envelope = parse::envelope(body)?;
        Ok(Self {
            records: parse::records(&envelope)?,
            clusters: envelope.clusters,
        })
    }

    pub fn records(&self) -> &[MedianExpressionRecord] {
        &self.records
    }

    /// Regroup records into ordered unique gene symbols plus one median
    /// vector per tissue, medians in gene order.
    pub fn median_matrix(&self) -> (Vec<String>, BTreeMap<String, Vec<f64>>) {
        let mut genes: Vec<String> = Vec::new();
        let mut medians: BTreeMap<String, Vec<f64>> = BTreeMap::new();

        for record in &self.records {
            if !genes.contains(&record.gene_symbol) {
                genes.push(record.gene_symbol.clone());
            }
            medians
                .entry(record.tissue_site_detail_id.clone())
                .or_default()
                .push(record.median);
        }

        (genes, medians)
    }

    /// Gene dendrogram in Newick format, when the service computed one.
    pub fn genes_cluster(&self) -> Option<&str> {
        self.clusters
            .as_ref()
            .map(|c| c.gene.as_str())
            .filter(|s| !s.starts_with(NO_CLUSTER_DATA))
    }

    /// Tissue dendrogram in Newick format, when the service computed one.
    pub fn tissues_cluster(&self) -> Option<&str> {
        self.clusters
            .as_ref()
            .map(|c| c.tissue.as_str())
            .filter(|s| !s.starts_with(NO_CLUSTER_DATA))
    }
}

/// One gene's raw per-sample expression values within a tissue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneExpressionRecord {
    pub gencode_id: String,
    pub gene_symbol: String,
    pub tissue_site_detail_id: String,
    pub data: Vec<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub subset_group: Option<String>,
}

/// Snapshot of the `expression/geneExpression` endpoint: full per-sample
/// values, optionally stratified by a demographic attribute.
#[derive(Debug, Clone)]
pub struct GeneExpression {
    records: Vec<GeneExpressionRecord>,
}

impl GeneExpression {
    pub fn fetch(
        client: &GtexClient,
        gencode_ids: &[&str],
        tissue_ids: &[&str],
        subset: Option<SubsetAttribute>,
    ) -> Result<Self> {
        let mut params = vec![
            ("datasetId", client.dataset_id().to_string()),
            ("gencodeId", gencode_ids.join(",")),
        ];
        if !tissue_ids.is_empty() {
            params.push(("tissueSiteDetailId", tissue_ids.join(",")));
        }
        if let Some(attribute) = subset {
            params.push(("attributeSubset", attribute.as_str().to_string()));
        }

        let envelope = client.get_envelope("expression/geneExpression", &params)?;
        let records: Vec<GeneExpressionRecord> = parse::records(&envelope)?;
        info!(target: "gtex", "fetched {} expression records", records.len());
        Ok(Self { records })
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let envelope = parse::envelope(body)?;
        Ok(Self {
            records: parse::records(&envelope)?,
        })
    }

    pub fn records(&self) -> &[GeneExpressionRecord] {
        &self.records
    }
}

/// One entry of a tissue's top-expressed-gene ranking.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopExpressedGeneRecord {
    pub gencode_id: String,
    pub gene_symbol: String,
    pub tissue_site_detail_id: String,
    pub median: f64,
    #[serde(default)]
    pub unit: String,
}

/// Snapshot of the `expression/topExpressedGene` endpoint, ranked by median
/// descending.
#[derive(Debug, Clone)]
pub struct TopExpressedGenes {
    records: Vec<TopExpressedGeneRecord>,
}

impl TopExpressedGenes {
    /// Fetch the `limit` top expressed genes in one tissue. `filter_mt`
    /// drops mitochondrial genes, which otherwise dominate most rankings.
    pub fn fetch(
        client: &GtexClient,
        tissue_site_detail_id: &str,
        limit: usize,
        filter_mt: bool,
    ) -> Result<Self> {
        let envelope = client.get_envelope(
            "expression/topExpressedGene",
            &[
                ("datasetId", client.dataset_id().to_string()),
                ("tissueSiteDetailId", tissue_site_detail_id.to_string()),
                ("sortBy", "median".to_string()),
                ("sortDirection", "desc".to_string()),
                ("filterMtGene", filter_mt.to_string()),
                ("pageSize", limit.to_string()),
            ],
        )?;
        Ok(Self {
            records: parse::records(&envelope)?,
        })
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let envelope = parse::envelope(body)?;
        Ok(Self {
            records: parse::records(&envelope)?,
        })
    }

    pub fn records(&self) -> &[TopExpressedGeneRecord] {
        &self.records
    }

    /// Median expression of the given gene symbol or Gencode ID within the
    /// ranking, or `None` when the gene is not in it.
    pub fn median_of(&self, identifier: &str) -> Option<f64> {
        self.records
            .iter()
            .find(|r| r.gencode_id == identifier || r.gene_symbol == identifier)
            .map(|r| r.median)
    }

    /// Symbol -> median map over the ranking.
    pub fn by_symbol(&self) -> BTreeMap<&str, f64> {
        self.records
            .iter()
            .map(|r| (r.gene_symbol.as_str(), r.median))
            .collect()
    }
}
