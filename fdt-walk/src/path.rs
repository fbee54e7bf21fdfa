//! The path-matching engine.
//!
//! Decides, at each `(parent_path, name)` pair the walker visits, whether
//! any configured path of interest continues through this child — either
//! as an interior node to descend into, or as a leaf property to report.

use crate::sink::FdtSink;

/// A caller-supplied path of interest.
///
/// `path` is a slash-delimited byte string with no leading or trailing
/// slash and no unit-address (`@...`) suffix on any segment, e.g.
/// `b"cpus/cpu/reg"`. `sink` is invoked for every property the walker finds
/// at that exact path.
pub struct PathSpec<'a> {
	/// The slash-delimited path this entry is interested in.
	pub path: &'a [u8],
	/// The sink invoked when a property at `path` is found.
	pub sink: &'a dyn FdtSink,
}

/// The outcome of testing whether `name` continues a configured path past
/// `parent_path`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Match {
	/// `name` is an interior segment of the configured path; the walker
	/// should descend with a parent path extended to this length
	/// (including the trailing `/`).
	NodeMatch { new_parent_len: usize },
	/// `name` is the configured path's final segment; the sink should fire.
	PropMatch,
	/// This configured path is not continued by `name`.
	NoMatch,
}

/// Tests whether `candidate_path` (a single configured [`PathSpec::path`])
/// is continued by `name` given the walker's current `parent_path`.
///
/// Implements spec rules in order:
/// 1. If `parent_path` and `name` together would overrun `candidate_path`'s
///    length, no match.
/// 2. If `candidate_path` doesn't start with `parent_path`, no match.
/// 3. If the next `name.len()` bytes of `candidate_path` aren't `name`, no
///    match.
/// 4. Otherwise, if there's more of `candidate_path` left, it's a node
///    match; if not, it's an exact property match.
pub(crate) fn continuation(parent_path: &[u8], candidate_path: &[u8], name: &[u8]) -> Match {
	if parent_path.len() + name.len() > candidate_path.len() {
		return Match::NoMatch;
	}

	if &candidate_path[..parent_path.len()] != parent_path {
		return Match::NoMatch;
	}

	let name_region = &candidate_path[parent_path.len()..parent_path.len() + name.len()];
	if name_region != name {
		return Match::NoMatch;
	}

	if parent_path.len() + name.len() < candidate_path.len() {
		Match::NodeMatch { new_parent_len: parent_path.len() + name.len() + 1 }
	} else {
		Match::PropMatch
	}
}

/// Strips a node's unit-address suffix (the `@...` following the first
/// `@` byte, if any) — device-tree unit addresses distinguish siblings but
/// are not part of path equality for selection.
pub(crate) fn strip_unit_address(name: &[u8]) -> &[u8] {
	match name.iter().position(|&b| b == b'@') {
		Some(at) => &name[..at],
		None => name,
	}
}
