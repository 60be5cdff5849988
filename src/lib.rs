//! Programmatic access to the GTEx gene-expression REST API.
//!
//! Each model issues exactly one blocking GET when it is constructed and
//! holds an immutable snapshot of the decoded response afterwards. See
//! [`client::GtexClient`] for the transport and [`models`] for the typed
//! views over the returned records.

pub mod client;
pub mod error;
pub mod models;
pub mod parse;
pub mod visuals;

pub use client::{GtexClient, ReferenceGenome};
pub use error::{GtexError, Result};
pub use models::expression::{GeneExpression, MedianExpression, SubsetAttribute, TopExpressedGenes};
pub use models::genes::{Gene, Genes};
pub use models::tissues::{TissueField, TissueFilter, TissuesInfo};
