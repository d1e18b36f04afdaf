// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod concurrency;
mod end_to_end;
mod fixtures;
