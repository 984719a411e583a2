use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// User query plus its matching options. Immutable for the lifetime of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
	pub text: String,
	pub case_sensitive: bool,
	pub match_whole_words: bool,
	pub match_any_term: bool,
}

impl SearchQuery {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			..Self::default()
		}
	}

	pub fn case_sensitive(mut self, yes: bool) -> Self {
		self.case_sensitive = yes;
		self
	}

	pub fn match_whole_words(mut self, yes: bool) -> Self {
		self.match_whole_words = yes;
		self
	}

	pub fn match_any_term(mut self, yes: bool) -> Self {
		self.match_any_term = yes;
		self
	}
}

/// Literal term matcher derived from a [`SearchQuery`].
///
/// The query text is split on whitespace into terms; a double-quoted phrase is
/// kept as one term. A candidate is described by several texts (name, display
/// text, decompiled body) and a term matches if it occurs in any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchComparer {
	terms: Vec<String>,
	case_sensitive: bool,
	whole_words: bool,
	any_term: bool,
}

impl SearchComparer {
	pub fn new(query: &SearchQuery) -> Self {
		let terms = split_terms(&query.text)
			.into_iter()
			.map(|term| if query.case_sensitive { term } else { term.to_lowercase() })
			.collect();
		Self {
			terms,
			case_sensitive: query.case_sensitive,
			whole_words: query.match_whole_words,
			any_term: query.match_any_term,
		}
	}

	/// Normalized terms, lowercased unless the query is case sensitive.
	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}

	/// Returns true if the candidate described by `texts` satisfies the query.
	/// An empty query matches nothing.
	pub fn is_match(&self, texts: &[&str]) -> bool {
		if self.terms.is_empty() {
			return false;
		}

		let haystacks: Vec<Cow<'_, str>> = texts
			.iter()
			.map(|text| if self.case_sensitive { Cow::Borrowed(*text) } else { Cow::Owned(text.to_lowercase()) })
			.collect();
		let term_hits = |term: &String| haystacks.iter().any(|hay| self.term_matches(hay, term));

		if self.any_term {
			self.terms.iter().any(term_hits)
		} else {
			self.terms.iter().all(term_hits)
		}
	}

	fn term_matches(&self, hay: &str, term: &str) -> bool {
		if !self.whole_words {
			return hay.contains(term);
		}

		let mut from = 0;
		while let Some(offset) = hay[from..].find(term) {
			let start = from + offset;
			let end = start + term.len();
			let before = hay[..start].chars().next_back();
			let after = hay[end..].chars().next();
			if !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char) {
				return true;
			}
			from = start + hay[start..].chars().next().map_or(1, char::len_utf8);
		}
		false
	}
}

fn is_word_char(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

fn split_terms(text: &str) -> Vec<String> {
	let mut terms = Vec::new();
	let mut current = String::new();
	let mut quoted = false;

	for ch in text.chars() {
		if ch == '"' {
			quoted = !quoted;
			flush_term(&mut terms, &mut current);
		} else if ch.is_whitespace() && !quoted {
			flush_term(&mut terms, &mut current);
		} else {
			current.push(ch);
		}
	}
	flush_term(&mut terms, &mut current);
	terms
}

fn flush_term(terms: &mut Vec<String>, current: &mut String) {
	if !current.is_empty() {
		terms.push(std::mem::take(current));
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn matches(query: SearchQuery, text: &str) -> bool {
		SearchComparer::new(&query).is_match(&[text])
	}

	#[test]
	fn terms_split_on_whitespace_and_keep_quoted_phrases() {
		let comparer = SearchComparer::new(&SearchQuery::new("  Foo \"Bar Baz\"  qux ").case_sensitive(true));
		assert_eq!(comparer.terms(), ["Foo", "Bar Baz", "qux"]);
	}

	#[test]
	fn empty_query_matches_nothing() {
		let comparer = SearchComparer::new(&SearchQuery::new("   "));
		assert!(comparer.is_empty());
		assert!(!comparer.is_match(&["anything"]));
	}

	#[test]
	fn substring_mode_is_case_insensitive_by_default() {
		let query = SearchQuery::new("Foo").match_any_term(true);
		assert!(matches(query.clone(), "Foo"));
		assert!(matches(query.clone(), "FooBar"));
		assert!(matches(query, "foo"));
	}

	#[test]
	fn whole_word_mode_rejects_partial_identifiers() {
		let query = SearchQuery::new("Foo").match_any_term(true).match_whole_words(true);
		assert!(matches(query.clone(), "Foo"));
		assert!(matches(query.clone(), "foo"));
		assert!(matches(query.clone(), "Demo.Foo.Bar"));
		assert!(!matches(query.clone(), "FooBar"));
		assert!(!matches(query, "_Foo"));
	}

	#[test]
	fn whole_word_mode_retries_after_a_rejected_occurrence() {
		let query = SearchQuery::new("ab").match_whole_words(true);
		assert!(matches(query, "abab ab"));
	}

	#[test]
	fn case_sensitive_mode_compares_exact_case() {
		let query = SearchQuery::new("Foo").case_sensitive(true);
		assert!(matches(query.clone(), "FooBar"));
		assert!(!matches(query, "foobar"));
	}

	#[test]
	fn all_terms_mode_requires_every_term() {
		let comparer = SearchComparer::new(&SearchQuery::new("widget draw"));
		assert!(comparer.is_match(&["Widget", "Demo.Widget.Draw"]));
		assert!(!comparer.is_match(&["Widget"]));

		let any = SearchComparer::new(&SearchQuery::new("widget draw").match_any_term(true));
		assert!(any.is_match(&["Widget"]));
	}
}
