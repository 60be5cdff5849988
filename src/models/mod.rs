//! Typed views over GTEx API responses.
//!
//! Each model is an immutable snapshot: construction performs the network
//! call (or decodes a saved body via `from_json`), accessors never touch the
//! network again.

pub mod expression;
pub mod genes;
pub mod tissues;
