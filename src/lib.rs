//! # org-parser
//!
//! A line-level lexer and AST toolkit for Org-style outline documents.
//!
//! The crate covers the two layers underneath a full document parser:
//!
//! - Line classification: a reconfigurable, ordered grammar of line rules
//!   (headlines, keyword directives, planning lines, timestamps, blocks,
//!   drawers, list items, tables, footnotes, horizontal rules, comments).
//!   Each input line maps to exactly one token; lines with no recognizable
//!   structure degrade to `blank` or `line` rather than erroring.
//! - Tree construction: an arena-backed node store with position spans that
//!   stay consistent as children are attached, including children that
//!   arrive out of document order.
//!
//! Sequencing classified lines into nested sections, blocks and lists is
//! the job of a document assembler built on top of these primitives; it is
//! intentionally not part of this crate.

pub mod org;
