use tracing::debug;

use crate::error::Result;
use crate::parse::{self, Envelope};

/// Base URL of the public GTEx portal API.
pub const DEFAULT_BASE_URL: &str = "https://gtexportal.org/api/v2/";

/// Dataset release queried by default.
pub const DEFAULT_DATASET_ID: &str = "gtex_v8";

/// Reference genome used for all queries.
///
/// The GENCODE annotation version is tied to the genome build (v26 on
/// GRCh38, v19 on GRCh37), so the pair is a single enum rather than two
/// independently settable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceGenome {
    #[default]
    Grch38,
    Grch37,
}

impl ReferenceGenome {
    pub fn genome_build(&self) -> &'static str {
        match self {
            ReferenceGenome::Grch38 => "GRCh38/hg38",
            ReferenceGenome::Grch37 => "GRCh37/hg19",
        }
    }

    pub fn gencode_version(&self) -> &'static str {
        match self {
            ReferenceGenome::Grch38 => "v26",
            ReferenceGenome::Grch37 => "v19",
        }
    }
}

/// Blocking HTTP client for the GTEx API.
///
/// One instance can back any number of models; each model performs exactly
/// one GET during construction and owns its parsed response afterwards.
#[derive(Debug, Clone)]
pub struct GtexClient {
    base_url: String,
    dataset_id: String,
    genome: ReferenceGenome,
    client: reqwest::blocking::Client,
}

impl Default for GtexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GtexClient {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dataset_id: DEFAULT_DATASET_ID.to_string(),
            genome: ReferenceGenome::default(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Point the client at a different service root, e.g. a staging mirror.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_genome(mut self, genome: ReferenceGenome) -> Self {
        self.genome = genome;
        self
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Issue a GET against `path` and decode the `data` envelope.
    ///
    /// The genome build and GENCODE version are appended to every request;
    /// a non-success HTTP status surfaces as a transport error.
    pub(crate) fn get_envelope(&self, path: &str, params: &[(&str, String)]) -> Result<Envelope> {
        let url = format!("{}{}", self.base_url, path);

        let mut query: Vec<(&str, &str)> = params
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        query.push(("gencodeVersion", self.genome.gencode_version()));
        query.push(("genomeBuild", self.genome.genome_build()));

        debug!(target: "gtex", "GET {} {:?}", url, query);

        let body = self
            .client
            .get(&url)
            .query(&query)
            .send()?
            .error_for_status()?
            .text()?;

        parse::envelope(&body)
    }
}
