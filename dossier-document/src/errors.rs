// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io;
use thiserror::Error;

/// An error that occurs while serializing a [`Document`](crate::Document).
///
/// Returned by [`Document::serialize`](crate::Document::serialize) and
/// [`Document::to_string`](crate::Document::to_string).
#[derive(Debug, Error)]
#[error("error serializing report document")]
pub struct SerializeError {
    #[from]
    inner: io::Error,
}
