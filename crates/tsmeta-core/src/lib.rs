//! # TSMeta Core Library
//!
//! A heuristic metadata extractor and cache for CASP TS model files: loosely
//! structured text files whose free-form header lines precede coordinate-like
//! data. The parser is deliberately best-effort, tolerating truncated and
//! garbled header keywords, and the extracted records are memoized per logical
//! model key for the lifetime of the process.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the stateless data model
//!   (`MetadataRecord`, the canonical key and alias tables), the heuristic TS
//!   header parser, and the trimmed summary renderer.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer holds the per-session
//!   metadata cache, filesystem discovery of candidate TS files, the host
//!   environment abstraction (path/handle resolution and interactive
//!   selection), and the engine error taxonomy.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute the complete
//!   operations (`parse`, `attach`, `show`) consumed by a host front-end.

pub mod core;
pub mod engine;
pub mod workflows;
