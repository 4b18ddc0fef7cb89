//! Port implementations for the SQLite database.
//!
//! This module contains the implementations of the reader and sink traits
//! defined in `gfa-core`, along with the helpers that seed and inspect the
//! tables.

mod reader;
mod seed;
mod sink;
