use std::path::PathBuf;

use clap::Parser;
use sieve_picker::PickerConfig;
use sieve_search::{EntityKind, EntityRef, KindFilter};

/// Command line arguments. Flags override values from `--config`.
#[derive(Parser, Debug)]
#[command(name = "sieve")]
#[command(about = "Search an entity tree and validate the first hit as a pick")]
pub(crate) struct Args {
	/// Entity tree JSON file (array of root nodes)
	#[arg(long, value_name = "PATH")]
	pub(crate) tree: PathBuf,

	/// Picker configuration TOML file
	#[arg(short, long, value_name = "PATH")]
	pub(crate) config: Option<PathBuf>,

	/// Comma separated kinds the picker accepts; all kinds when omitted
	#[arg(long, value_name = "KINDS", value_delimiter = ',', value_parser = parse_kind)]
	pub(crate) kinds: Vec<EntityKind>,

	/// Compare case sensitively
	#[arg(long)]
	pub(crate) case_sensitive: bool,

	/// Match whole words only
	#[arg(long)]
	pub(crate) whole_word: bool,

	/// Match any query term instead of all terms
	#[arg(long)]
	pub(crate) any_term: bool,

	/// Also match decompiled bodies
	#[arg(long)]
	pub(crate) decompiled: bool,

	/// Stop after this many hits and report truncation
	#[arg(long, value_name = "N")]
	pub(crate) max_results: Option<usize>,

	/// Print a JSON report instead of text
	#[arg(long)]
	pub(crate) json: bool,

	/// Verbose logging
	#[arg(short, long)]
	pub(crate) verbose: bool,

	/// Query text
	pub(crate) query: String,
}

fn parse_kind(name: &str) -> Result<EntityKind, String> {
	EntityKind::from_name(name.trim()).ok_or_else(|| {
		let known: Vec<_> = EntityKind::ALL.iter().map(|kind| kind.as_str()).collect();
		format!("unknown kind '{name}' (expected one of: {})", known.join(", "))
	})
}

impl Args {
	/// Layers flag values over `config`. Switches only ever turn options on.
	pub(crate) fn apply(&self, config: &mut PickerConfig) {
		let search = &mut config.search;
		search.case_sensitive |= self.case_sensitive;
		search.match_whole_words |= self.whole_word;
		search.match_any_term |= self.any_term;
		search.search_decompiled_data |= self.decompiled;
		if let Some(max) = self.max_results {
			search.max_results = Some(max);
		}
	}

	pub(crate) fn filter(&self) -> KindFilter {
		if self.kinds.is_empty() {
			KindFilter::all()
		} else {
			KindFilter::only(self.kinds.iter().copied())
		}
	}
}

/// Returns true if some entity under `roots` has a kind `filter` could accept.
pub(crate) fn admits_any(filter: &KindFilter, roots: &[EntityRef]) -> bool {
	let mut stack: Vec<&EntityRef> = roots.iter().collect();
	while let Some(entity) = stack.pop() {
		if filter.admits_kind(entity.kind()) {
			return true;
		}
		stack.extend(entity.children());
	}
	false
}
