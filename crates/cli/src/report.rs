use std::io::{self, Write};

use serde::Serialize;
use sieve_picker::{AcceptedEntity, MemberPicker, Validity};

/// Outcome of one picker session.
#[derive(Debug, Serialize)]
pub(crate) struct Report {
	pub(crate) query: String,
	pub(crate) state: &'static str,
	pub(crate) truncated: bool,
	pub(crate) hits: Vec<HitReport>,
	pub(crate) selection: SelectionReport,
}

#[derive(Debug, Serialize)]
pub(crate) struct HitReport {
	pub(crate) id: u64,
	pub(crate) kind: &'static str,
	pub(crate) display: String,
	pub(crate) container: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectionReport {
	pub(crate) valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) reason: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) accepted: Option<String>,
}

impl Report {
	pub(crate) fn from_picker(picker: &MemberPicker) -> Self {
		let hits = picker
			.sorted_results()
			.into_iter()
			.filter_map(|row| row.hit())
			.map(|hit| HitReport {
				id: hit.entity().id().0,
				kind: hit.kind().as_str(),
				display: hit.display().to_string(),
				container: hit.container().to_string(),
			})
			.collect();

		Self {
			query: picker.text().to_string(),
			state: picker.state().as_str(),
			truncated: picker.is_truncated(),
			hits,
			selection: SelectionReport::from_validity(&picker.validity()),
		}
	}

	pub(crate) fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
		for hit in &self.hits {
			if hit.container.is_empty() {
				writeln!(out, "{:<12} {}", hit.kind, hit.display)?;
			} else {
				writeln!(out, "{:<12} {}  ({})", hit.kind, hit.display, hit.container)?;
			}
		}
		if self.truncated {
			writeln!(out, "results truncated")?;
		}
		match (&self.selection.accepted, self.selection.reason) {
			(Some(accepted), _) => writeln!(out, "pick: {accepted}"),
			(None, Some(reason)) => writeln!(out, "pick: invalid: {reason}"),
			(None, None) => Ok(()),
		}
	}

	pub(crate) fn write_json(&self, out: &mut impl Write) -> io::Result<()> {
		serde_json::to_writer_pretty(&mut *out, self)?;
		writeln!(out)
	}
}

impl SelectionReport {
	fn from_validity(validity: &Validity) -> Self {
		match validity {
			Validity::Valid(accepted) => Self {
				valid: true,
				reason: None,
				accepted: Some(describe(accepted)),
			},
			Validity::Invalid(reason) => Self {
				valid: false,
				reason: Some(reason.message()),
				accepted: None,
			},
		}
	}
}

fn describe(accepted: &AcceptedEntity) -> String {
	match accepted {
		AcceptedEntity::File(file) => format!("file {}", file.name()),
		AcceptedEntity::Namespace { name, file: Some(file) } => format!("namespace {name} in {}", file.name()),
		AcceptedEntity::Namespace { name, file: None } => format!("namespace {name}"),
		AcceptedEntity::Member(entity) => format!("{} {}", entity.kind(), entity.name()),
	}
}
