use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::info;

use crate::client::GtexClient;
use crate::error::{GtexError, Result};
use crate::parse;

/// One tissue sampling site as returned by the `dataset/tissueSiteDetail`
/// endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TissueInfo {
    pub dataset_id: String,
    #[serde(default)]
    pub sampling_site: String,
    pub tissue_site: String,
    pub tissue_site_detail: String,
    pub tissue_site_detail_abbr: String,
    pub tissue_site_detail_id: String,
    #[serde(default)]
    pub uberon_id: String,
}

/// The fields a caller may project out of a tissue record.
///
/// Field names arrive as strings from downstream consumers, so unknown names
/// are rejected up front by `FromStr` instead of failing on a per-record key
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TissueField {
    DatasetId,
    SamplingSite,
    TissueSite,
    TissueSiteDetail,
    TissueSiteDetailAbbr,
    TissueSiteDetailId,
    UberonId,
}

impl TissueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TissueField::DatasetId => "datasetId",
            TissueField::SamplingSite => "samplingSite",
            TissueField::TissueSite => "tissueSite",
            TissueField::TissueSiteDetail => "tissueSiteDetail",
            TissueField::TissueSiteDetailAbbr => "tissueSiteDetailAbbr",
            TissueField::TissueSiteDetailId => "tissueSiteDetailId",
            TissueField::UberonId => "uberonId",
        }
    }
}

impl fmt::Display for TissueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TissueField {
    type Err = GtexError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "datasetId" => Ok(TissueField::DatasetId),
            "samplingSite" => Ok(TissueField::SamplingSite),
            "tissueSite" => Ok(TissueField::TissueSite),
            "tissueSiteDetail" => Ok(TissueField::TissueSiteDetail),
            "tissueSiteDetailAbbr" => Ok(TissueField::TissueSiteDetailAbbr),
            "tissueSiteDetailId" => Ok(TissueField::TissueSiteDetailId),
            "uberonId" => Ok(TissueField::UberonId),
            _ => Err(GtexError::KeyLookup {
                field: name.to_string(),
            }),
        }
    }
}

/// Optional server-side filters for the tissue catalog query.
#[derive(Debug, Clone, Default)]
pub struct TissueFilter {
    pub tissue_site: Option<String>,
    pub tissue_site_detail_abbr: Option<String>,
    pub tissue_site_detail_id: Option<String>,
}

/// Snapshot of the tissue catalog.
#[derive(Debug, Clone)]
pub struct TissuesInfo {
    records: Vec<TissueInfo>,
}

impl TissuesInfo {
    /// Fetch the full tissue catalog.
    pub fn fetch(client: &GtexClient) -> Result<Self> {
        Self::fetch_filtered(client, &TissueFilter::default())
    }

    /// Fetch the tissue catalog with server-side filters applied.
    pub fn fetch_filtered(client: &GtexClient, filter: &TissueFilter) -> Result<Self> {
        let mut params = vec![("datasetId", client.dataset_id().to_string())];
        if let Some(site) = &filter.tissue_site {
            params.push(("tissueSite", site.clone()));
        }
        if let Some(abbr) = &filter.tissue_site_detail_abbr {
            params.push(("tissueSiteDetailAbbr", abbr.clone()));
        }
        if let Some(id) = &filter.tissue_site_detail_id {
            params.push(("tissueSiteDetailId", id.clone()));
        }

        let envelope = client.get_envelope("dataset/tissueSiteDetail", &params)?;
        let records: Vec<TissueInfo> = parse::records(&envelope)?;
        info!(target: "gtex", "fetched {} tissue records", records.len());
        Ok(Self { records })
    }

    /// Decode a previously saved response body.
    pub fn from_json(body: &str) -> Result<Self> {
        let envelope = parse::envelope(body)?;
        Ok(Self {
            records: parse::records(&envelope)?,
        })
    }

    pub fn records(&self) -> &[TissueInfo] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Project one field out of every record, preserving response order.
    pub fn values(&self, field: TissueField) -> Vec<&str> {
        self.records
            .iter()
            .map(|t| match field {
                TissueField::DatasetId => t.dataset_id.as_str(),
                TissueField::SamplingSite => t.sampling_site.as_str(),
                TissueField::TissueSite => t.tissue_site.as_str(),
                TissueField::TissueSiteDetail => t.tissue_site_detail.as_str(),
                TissueField::TissueSiteDetailAbbr => t.tissue_site_detail_abbr.as_str(),
                TissueField::TissueSiteDetailId => t.tissue_site_detail_id.as_str(),
                TissueField::UberonId => t.uberon_id.as_str(),
            })
            .collect()
    }

    /// Dynamic-name variant of [`values`](Self::values).
    ///
    /// Fails with [`GtexError::KeyLookup`] when `field` is not part of the
    /// tissue record schema.
    pub fn get_tissues(&self, field: &str) -> Result<Vec<String>> {
        let field: TissueField = field.parse()?;
        Ok(self.values(field).into_iter().map(String::from).collect())
    }
}
