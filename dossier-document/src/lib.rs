// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Build paginated report documents and write them out as XHTML.
//!
//! A [`Document`] is append-only: blocks are added to the current page, and
//! [`Document::new_page`] starts a fresh one. Layout is expressed with a small
//! vocabulary of [`Block`]s (headings, paragraphs, bullet lists and tables)
//! styled through [`TextStyle`].

mod document;
mod errors;
mod serialize;

pub use document::*;
pub use errors::*;
