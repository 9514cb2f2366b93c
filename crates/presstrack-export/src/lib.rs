// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Export of past-records date groups as downloadable PDF tables.

pub mod error;
pub mod layout;
pub mod pdf;
pub mod request;

pub use error::{ExportError, Result};
pub use pdf::{ExportAdapter, ExportDocument, PdfExporter, PDF_CONTENT_TYPE};
pub use request::{ExportRequest, Orientation, PageFormat, PageSetup, Unit};
