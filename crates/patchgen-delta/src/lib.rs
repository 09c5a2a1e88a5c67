//! Binary delta generation.
//!
//! Describes how to turn an original byte buffer into a final one as an
//! ordered list of COPY operations (reuse a span of the original) and
//! INSERT operations (literal bytes), and serializes that list to a compact
//! little-endian record stream.
//!
//! # Key Types
//!
//! - [`find_best_match`] -- exhaustive aligned search for the longest reusable span
//! - [`OperationBuilder`] -- scans the final buffer and emits [`Operation`]s
//! - [`DeltaWriter`] / [`DeltaReader`] -- wire format encoder and decoder
//! - [`DiffConfig`] -- span bound and COPY threshold
//! - [`ByteSource`] -- how inputs are loaded into memory
//!
//! # Invariants
//!
//! 1. Operations are stored in final-buffer order and tile it without gaps.
//! 2. Every COPY stays inside the original buffer, is longer than the
//!    threshold and no longer than `max_len`.
//! 3. The buffers are borrowed read-only for the whole run.

pub mod builder;
pub mod config;
pub mod error;
pub mod matcher;
pub mod operation;
pub mod pipeline;
pub mod reader;
pub mod source;
pub mod stats;
pub mod writer;

pub use builder::{build, OperationBuilder};
pub use config::{DiffConfig, ALIGNMENT, DEFAULT_MAX_LEN, MIN_MATCH};
pub use error::{DeltaError, DeltaResult};
pub use matcher::{find_best_match, Match};
pub use operation::{OpCode, Operation, OperationSequence, RECORD_HEADER_LEN};
pub use pipeline::generate_delta;
pub use reader::{decode, DeltaReader};
pub use source::{ByteSource, FileSource, MemorySource};
pub use stats::DiffStats;
pub use writer::{encode, write, DeltaWriter};
