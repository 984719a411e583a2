//! Sieve command line host.
//!
//! Loads an entity tree, runs one debounced picker session over the query,
//! picks the first sorted hit and prints the results with the pick's validity.

mod cli;
mod report;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sieve_picker::{MemberPicker, PickerConfig, PickerDeps};
use sieve_search::{EntityBrowser, EntityTree, TreeSearcherProvider};

use crate::cli::{Args, admits_any};
use crate::report::Report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	setup_tracing(args.verbose);

	let mut config = match &args.config {
		Some(path) => PickerConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
		None => PickerConfig::default(),
	};
	args.apply(&mut config);
	config.validate().context("invalid picker options")?;

	let tree = EntityTree::load(&args.tree).with_context(|| format!("loading entity tree {}", args.tree.display()))?;
	tracing::info!(entities = tree.len(), query = %args.query, "sieve.start");

	let filter = args.filter();
	if !admits_any(&filter, &tree.roots()) {
		tracing::warn!(kinds = ?args.kinds, "sieve.kinds.unmatched");
	}

	let provider = TreeSearcherProvider::with_batch_size(config.search.batch_size);
	let deps = PickerDeps::new(Arc::new(tree), Arc::new(provider), filter);
	let mut picker = MemberPicker::new(config, deps);

	picker.on_query_changed(args.query.clone());
	picker.settle().await;
	if let Some(first) = picker.sorted_results().first().map(|row| row.id()) {
		picker.select_hit(Some(first));
	}

	let report = Report::from_picker(&picker);
	let mut stdout = std::io::stdout().lock();
	if args.json {
		report.write_json(&mut stdout)?;
	} else {
		report.write_text(&mut stdout)?;
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("SIEVE_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("sieve=debug,sieve_picker=debug,sieve_search=debug,warn")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}
