// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! PDF rendering with the built-in Helvetica fonts.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Pt};
use tracing::instrument;

use crate::error::{ExportError, Result};
use crate::layout::{layout, PlacedText};
use crate::request::ExportRequest;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered document ready to download.
#[derive(Debug, Clone)]
pub struct ExportDocument {
	pub file_name: String,
	pub content_type: &'static str,
	pub bytes: Vec<u8>,
}

/// Renders a tabular snapshot into a downloadable document.
pub trait ExportAdapter: Send + Sync {
	fn export(&self, request: &ExportRequest) -> Result<ExportDocument>;
}

#[derive(Debug, Default, Clone)]
pub struct PdfExporter;

impl PdfExporter {
	pub fn new() -> Self {
		Self
	}
}

fn render_err(e: impl std::fmt::Display) -> ExportError {
	ExportError::Render(e.to_string())
}

fn place(layer: &PdfLayerReference, item: &PlacedText, page_height: f32, regular: &IndirectFontRef, bold: &IndirectFontRef) {
	let font = if item.bold { bold } else { regular };
	layer.use_text(
		item.text.clone(),
		item.size,
		Mm::from(Pt(item.x)),
		Mm::from(Pt(page_height - item.y)),
		font,
	);
}

impl ExportAdapter for PdfExporter {
	#[instrument(skip(self, request), fields(file_name = %request.file_name, rows = request.table.rows.len()))]
	fn export(&self, request: &ExportRequest) -> Result<ExportDocument> {
		if request.table.headers.is_empty() {
			return Err(ExportError::Empty(request.title.clone()));
		}

		let (width, height) = request.setup.dimensions_pt();
		let page_w = Mm::from(Pt(width));
		let page_h = Mm::from(Pt(height));

		let (doc, first_page, first_layer) = PdfDocument::new(request.title.as_str(), page_w, page_h, "Layer 1");
		let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;
		let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?;

		let pages = layout(request);
		for (i, page) in pages.iter().enumerate() {
			let layer = if i == 0 {
				doc.get_page(first_page).get_layer(first_layer)
			} else {
				let (p, l) = doc.add_page(page_w, page_h, "Layer 1");
				doc.get_page(p).get_layer(l)
			};
			for item in &page.items {
				place(&layer, item, height, &regular, &bold);
			}
		}

		let bytes = doc.save_to_bytes().map_err(render_err)?;
		tracing::debug!(pages = pages.len(), bytes = bytes.len(), "pdf rendered");
		Ok(ExportDocument {
			file_name: request.file_name.clone(),
			content_type: PDF_CONTENT_TYPE,
			bytes,
		})
	}
}
