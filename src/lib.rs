//! # mdsite
//!
//! Content indexing and retrieval pipeline for markdown-authored sites.
//! Your filesystem is the data source: category folders hold markdown files
//! with YAML frontmatter, filename prefixes carry dates and ordering, and
//! everything else is derived.
//!
//! # Architecture: Build Once, Serve Tiered
//!
//! The build side scans content into JSON indices; the runtime side serves
//! content preferring those indices over re-parsing source files:
//!
//! ```text
//! 1. Scan      content/  →  content/index.json        (file lists per category)
//! 2. Generate  index     →  navigation-index.json     (menu items)
//!                           content-metadata.json     (lightweight records)
//! 3. Serve     indices   →  typed entities, on demand (tiered cache)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Cheap page views**: the runtime answers list and detail requests
//!   from pre-built JSON instead of parsing markdown per request.
//! - **Graceful degradation**: every missing index has a fallback tier —
//!   development runs work with no generation step at all, just slower.
//! - **Testability**: each stage is a function from explicit inputs to
//!   explicit outputs, exercised with plain temp directories.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks category folders, produces the content index |
//! | [`generate`] | Stage 2 — derives navigation/metadata JSON, atomic writes, cancellation |
//! | [`service`] | Stage 3 — tiered-cache retrieval services used by the client runtime |
//! | [`parser`] | one raw file → one structured `Document` |
//! | [`frontmatter`] | YAML metadata block extraction |
//! | [`markdown`] | pulldown-cmark wrapper: HTML, inline HTML, plain text, reading time |
//! | [`toc`] | heading extraction and hierarchy building |
//! | [`components`] | embedded `[[name key="value"]]` directive extraction |
//! | [`slug`] | slugs and the filename order/date conventions |
//! | [`fetch`] | async transport seam (`ContentFetcher`) + filesystem impl |
//! | [`config`] | `site.toml` loading and validation |
//! | [`types`] | entities, menu items, index shapes shared across stages |
//! | [`output`] | CLI output formatting — summaries of pipeline results |
//!
//! # Design Decisions
//!
//! ## Filename Conventions Over Databases
//!
//! Blog posts carry `YYYY-MM-DD-` date prefixes; ordered categories carry
//! `NN-` prefixes, both parsed by [`slug::order_and_slug_from_filename`].
//! The filesystem is the source of truth for ordering — no manifest to keep
//! in sync, and a directory listing reads in publish order.
//!
//! ## Per-File Fault Isolation
//!
//! One malformed file never takes down a category: extractors degrade to
//! defaults where safe, and the one hard per-file failure (an unparseable
//! frontmatter block) is logged and dropped by every consumer. Collection
//! endpoints always return a possibly-empty list, never an error.
//!
//! ## Publish-By-Swap Caches
//!
//! The runtime caches are immutable `Arc` snapshots behind per-category
//! locks: populated once under a gate, swapped into place, read lock-free
//! afterwards. Invalidation swaps the slot back to empty; it never mutates
//! a published snapshot in place.
//!
//! ## Anchors Agree Everywhere
//!
//! Heading anchor ids in rendered HTML and table-of-contents trees come
//! from the same slug-and-counter scheme, so a TOC link always lands on
//! its heading — including duplicate headings (`#intro`, `#intro-1`).

pub mod components;
pub mod config;
pub mod fetch;
pub mod frontmatter;
pub mod generate;
pub mod markdown;
pub mod output;
pub mod parser;
pub mod scan;
pub mod service;
pub mod slug;
pub mod toc;
pub mod types;
