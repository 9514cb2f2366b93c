// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page layout of an exported table, in points from the top-left corner.

use crate::request::ExportRequest;

const MARGIN_PT: f32 = 40.0;
const LINE_HEIGHT_FACTOR: f32 = 1.6;
/// Rough Helvetica advance width as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;
const TITLE_SIZE_PT: f32 = 14.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
	pub text: String,
	pub x: f32,
	/// Baseline, measured down from the top edge.
	pub y: f32,
	pub size: f32,
	pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
	pub items: Vec<PlacedText>,
}

/// Lay the title and table out over as many pages as needed. The header row
/// is repeated at the top of every continuation page.
pub fn layout(request: &ExportRequest) -> Vec<PageLayout> {
	let (page_width, page_height) = request.setup.dimensions_pt();
	let columns = request.table.headers.len().max(1);
	let column_width = (page_width - 2.0 * MARGIN_PT) / columns as f32;
	let max_chars = ((column_width / (request.font_size * AVG_CHAR_WIDTH)) as usize).max(1);
	let line_height = request.font_size * LINE_HEIGHT_FACTOR;
	let bottom = page_height - MARGIN_PT;

	let row_items = |cells: &[String], y: f32, bold: bool| -> Vec<PlacedText> {
		cells
			.iter()
			.enumerate()
			.map(|(i, cell)| PlacedText {
				text: fit(cell, max_chars),
				x: MARGIN_PT + i as f32 * column_width,
				y,
				size: request.font_size,
				bold,
			})
			.collect()
	};

	let mut pages = Vec::new();
	let mut page = PageLayout::default();
	page.items.push(PlacedText {
		text: request.title.clone(),
		x: MARGIN_PT,
		y: request.title_y,
		size: TITLE_SIZE_PT,
		bold: true,
	});

	let mut y = request.start_y;
	page.items.extend(row_items(&request.table.headers, y, true));
	for row in &request.table.rows {
		y += line_height;
		if y > bottom {
			pages.push(std::mem::take(&mut page));
			y = MARGIN_PT;
			page.items.extend(row_items(&request.table.headers, y, true));
			y += line_height;
		}
		page.items.extend(row_items(row, y, false));
	}
	pages.push(page);
	pages
}

/// Shorten `text` to at most `max_chars` characters, marking the cut.
fn fit(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_string();
	}
	let keep = max_chars.saturating_sub(1);
	let mut out: String = text.chars().take(keep).collect();
	out.push('~');
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::request::PageSetup;
	use presstrack_ledger_core::ExportTable;
	use proptest::prelude::*;

	fn request(rows: usize) -> ExportRequest {
		ExportRequest::past_records(
			"10/19/2026",
			ExportTable {
				headers: vec!["S.No".to_string(), "Job No".to_string()],
				rows: (1..=rows).map(|i| vec![i.to_string(), format!("J{i}")]).collect(),
			},
		)
	}

	#[test]
	fn test_title_then_header_on_first_page() {
		let pages = layout(&request(1));
		assert_eq!(pages.len(), 1);
		let items = &pages[0].items;
		assert_eq!(items[0].text, "Past Records - 10/19/2026");
		assert_eq!(items[0].y, 40.0);
		assert_eq!(items[1].text, "S.No");
		assert_eq!(items[1].y, 60.0);
		assert!(items[1].bold);
		assert_eq!(items[3].text, "1");
		assert_eq!(items[3].size, 10.0);
	}

	#[test]
	fn test_long_tables_repeat_header() {
		let pages = layout(&request(200));
		assert!(pages.len() > 1);
		for page in &pages[1..] {
			assert_eq!(page.items[0].text, "S.No");
			assert!(page.items[0].bold);
		}
		let body: usize = pages
			.iter()
			.flat_map(|p| &p.items)
			.filter(|i| !i.bold)
			.count();
		assert_eq!(body, 200 * 2);
	}

	#[test]
	fn test_fit_truncates() {
		assert_eq!(fit("abcdef", 4), "abc~");
		assert_eq!(fit("abc", 4), "abc");
	}

	proptest! {
		#[test]
		fn prop_everything_on_page(rows in 0usize..300) {
			let req = request(rows);
			let (_, height) = PageSetup::default().dimensions_pt();
			for page in layout(&req) {
				for item in page.items {
					prop_assert!(item.y > 0.0 && item.y <= height - MARGIN_PT);
				}
			}
		}
	}
}
