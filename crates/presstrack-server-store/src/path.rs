// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use crate::error::{Result, StoreError};

/// Characters a path segment may not contain.
const FORBIDDEN: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// A slash-separated location in the record tree, e.g. `jobs/<key>`.
///
/// The root itself is not addressable; every path has at least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
	segments: Vec<String>,
}

impl StorePath {
	pub fn parse(raw: &str) -> Result<Self> {
		let trimmed = raw.trim_matches('/');
		if trimmed.is_empty() {
			return Err(StoreError::InvalidPath("path is empty".to_string()));
		}
		let segments = trimmed
			.split('/')
			.map(Self::check_segment)
			.collect::<Result<Vec<_>>>()?;
		Ok(Self { segments })
	}

	fn check_segment(segment: &str) -> Result<String> {
		if segment.is_empty() {
			return Err(StoreError::InvalidPath("empty segment".to_string()));
		}
		if segment.contains(FORBIDDEN) || segment.chars().any(char::is_control) {
			return Err(StoreError::InvalidPath(format!(
				"segment {segment:?} contains a forbidden character"
			)));
		}
		Ok(segment.to_string())
	}

	/// Append one child segment.
	pub fn child(&self, segment: &str) -> Result<Self> {
		let mut segments = self.segments.clone();
		segments.push(Self::check_segment(segment)?);
		Ok(Self { segments })
	}

	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	pub fn depth(&self) -> usize {
		self.segments.len()
	}

	pub fn last(&self) -> &str {
		self.segments.last().map(String::as_str).unwrap_or_default()
	}

	/// The record this path falls in: its first two segments, or `None` for
	/// a collection path.
	pub fn record(&self) -> Option<StorePath> {
		(self.segments.len() >= 2).then(|| StorePath {
			segments: self.segments[..2].to_vec(),
		})
	}

	/// Whether `self` equals `other` or lies underneath it.
	pub fn starts_with(&self, other: &StorePath) -> bool {
		self.segments.len() >= other.segments.len()
			&& self.segments[..other.segments.len()] == other.segments[..]
	}
}

impl fmt::Display for StorePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.segments.join("/"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_and_display() {
		let path = StorePath::parse("/jobs/abc/").unwrap();
		assert_eq!(path.depth(), 2);
		assert_eq!(path.to_string(), "jobs/abc");
		assert_eq!(path.last(), "abc");
	}

	#[test]
	fn test_rejects_bad_paths() {
		assert!(StorePath::parse("").is_err());
		assert!(StorePath::parse("/").is_err());
		assert!(StorePath::parse("jobs//x").is_err());
		assert!(StorePath::parse("jobs/a.b").is_err());
		assert!(StorePath::parse("jobs/$x").is_err());
		assert!(StorePath::parse("jobs").unwrap().child("a/b").is_err());
	}

	#[test]
	fn test_record_of_path() {
		let field = StorePath::parse("jobs/k1/good").unwrap();
		assert_eq!(field.record().unwrap().to_string(), "jobs/k1");
		assert!(StorePath::parse("jobs").unwrap().record().is_none());
	}

	#[test]
	fn test_starts_with() {
		let jobs = StorePath::parse("jobs").unwrap();
		let job = StorePath::parse("jobs/k1").unwrap();
		assert!(job.starts_with(&jobs));
		assert!(jobs.starts_with(&jobs));
		assert!(!jobs.starts_with(&job));
		assert!(!StorePath::parse("users/k1").unwrap().starts_with(&jobs));
	}
}
