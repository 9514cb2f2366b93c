// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use presstrack_ledger_core::{export_file_name, export_title, ExportTable};

const A4_SHORT_PT: f32 = 595.28;
const A4_LONG_PT: f32 = 841.89;
const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
	Portrait,
	Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
	Pt,
	Mm,
}

impl Unit {
	pub fn to_pt(&self, value: f32) -> f32 {
		match self {
			Unit::Pt => value,
			Unit::Mm => value * PT_PER_MM,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
	A4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
	pub orientation: Orientation,
	/// Unit of the request's coordinates.
	pub unit: Unit,
	pub format: PageFormat,
}

impl Default for PageSetup {
	/// Landscape A4 measured in points.
	fn default() -> Self {
		Self {
			orientation: Orientation::Landscape,
			unit: Unit::Pt,
			format: PageFormat::A4,
		}
	}
}

impl PageSetup {
	/// Page width and height in points.
	pub fn dimensions_pt(&self) -> (f32, f32) {
		let PageFormat::A4 = self.format;
		match self.orientation {
			Orientation::Portrait => (A4_SHORT_PT, A4_LONG_PT),
			Orientation::Landscape => (A4_LONG_PT, A4_SHORT_PT),
		}
	}
}

/// Everything the exporter needs to produce one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
	pub title: String,
	pub file_name: String,
	pub table: ExportTable,
	pub setup: PageSetup,
	pub font_size: f32,
	/// Title baseline from the top edge, in points.
	pub title_y: f32,
	/// Header row baseline from the top edge, in points.
	pub start_y: f32,
}

impl ExportRequest {
	/// Fixed setup of a past-records date group.
	pub fn past_records(date: &str, table: ExportTable) -> Self {
		Self {
			title: export_title(date),
			file_name: export_file_name(date),
			table,
			setup: PageSetup::default(),
			font_size: 10.0,
			title_y: 40.0,
			start_y: 60.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_past_records_setup() {
		let req = ExportRequest::past_records(
			"10/19/2026",
			ExportTable {
				headers: vec![],
				rows: vec![],
			},
		);
		assert_eq!(req.file_name, "past-records-10/19/2026.pdf");
		assert_eq!(req.setup.orientation, Orientation::Landscape);
		assert_eq!(req.setup.unit, Unit::Pt);
		let (w, h) = req.setup.dimensions_pt();
		assert!(w > h);
	}

	#[test]
	fn test_mm_conversion() {
		assert!((Unit::Mm.to_pt(25.4) - 72.0).abs() < 1e-3);
	}
}
