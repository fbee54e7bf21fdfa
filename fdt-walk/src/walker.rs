//! The recursive node walker.
//!
//! Two mutually recursive procedures sharing one cursor: [`Walker::walk`]
//! maintains the inherited `#address-cells`/`#size-cells` context and
//! dispatches matching properties to their sinks; [`Walker::walk_uninteresting`]
//! is a stripped-down variant that skips a subtree cheaply without tracking
//! context or firing sinks, since neither is observable once the subtree is
//! known not to contain anything of interest.

use crate::{
	FdtError, PathSpec,
	cursor::Cursor,
	path::{self, Match},
	strings::resolve_name,
	token::{Token, next_token},
};

/// Decodes the first big-endian `u32` cell of a `#address-cells` or
/// `#size-cells` property value.
///
/// A value shorter than 4 bytes is malformed in practice but not worth
/// failing the whole parse over; it leaves the current cell count
/// unchanged.
fn decode_cell_count(value: &[u8], current: u32) -> u32 {
	match value.first_chunk::<4>() {
		Some(chunk) => u32::from_be_bytes(*chunk),
		None => current,
	}
}

/// Walks a structure block, maintaining inherited cell context and
/// dispatching matched properties to their sinks.
///
/// `MAX_PATH_LEN` bounds the parent-path buffer carried on the walker
/// itself (no heap, so the buffer is a fixed-size array); it must be at
/// least as long as the longest configured [`PathSpec::path`] plus one
/// byte for the trailing separator. [`crate::parse_fdt`] picks a default
/// that comfortably covers ordinary device trees.
pub(crate) struct Walker<'blob, 'paths, const MAX_PATH_LEN: usize> {
	cursor: Cursor<'blob>,
	strings: &'blob [u8],
	paths: &'paths [PathSpec<'paths>],
	parent_buf: [u8; MAX_PATH_LEN],
	parent_len: usize,
	address_cells: u32,
	size_cells: u32,
}

impl<'blob, 'paths, const MAX_PATH_LEN: usize> Walker<'blob, 'paths, MAX_PATH_LEN> {
	/// Creates a walker positioned at the start of the structure block,
	/// with the default `address_cells = 2`, `size_cells = 1` context.
	pub(crate) fn new(
		cursor: Cursor<'blob>,
		strings: &'blob [u8],
		paths: &'paths [PathSpec<'paths>],
	) -> Self {
		Self {
			cursor,
			strings,
			paths,
			parent_buf: [0; MAX_PATH_LEN],
			parent_len: 0,
			address_cells: 2,
			size_cells: 1,
		}
	}

	/// Consumes the structure block's opening `BEGIN_NODE` and its (empty)
	/// root name, then walks the root node.
	pub(crate) fn run(&mut self) -> Result<(), FdtError> {
		let token = next_token(&mut self.cursor)?;
		if token != Token::BeginNode {
			return Err(FdtError::MalformedStructure { offset: self.cursor.offset() });
		}
		self.cursor.skip_node_name();
		self.walk()
	}

	/// The current parent path, as matched against configured paths.
	fn parent_path(&self) -> &[u8] {
		&self.parent_buf[..self.parent_len]
	}

	/// Finds the first configured path continued by `name` as an interior
	/// node, in declaration order.
	fn find_node_match(&self, name: &[u8]) -> Option<(&'paths [u8], usize)> {
		self.paths.iter().find_map(|spec| match path::continuation(self.parent_path(), spec.path, name) {
			Match::NodeMatch { new_parent_len } => Some((spec.path, new_parent_len)),
			Match::PropMatch | Match::NoMatch => None,
		})
	}

	/// Finds the first configured path matched exactly by `name` as a leaf
	/// property, in declaration order.
	fn find_prop_match(&self, name: &[u8]) -> Option<usize> {
		self.paths.iter().position(|spec| {
			path::continuation(self.parent_path(), spec.path, name) == Match::PropMatch
		})
	}

	/// Walks the node whose `BEGIN_NODE`'s name has just been consumed,
	/// dispatching matched properties and descending into matched children.
	pub(crate) fn walk(&mut self) -> Result<(), FdtError> {
		loop {
			match next_token(&mut self.cursor)? {
				Token::BeginNode => {
					let raw_name = self.cursor.read_node_name();
					let name = path::strip_unit_address(raw_name.to_bytes());

					match self.find_node_match(name) {
						Some((candidate_path, new_parent_len)) => {
							let saved_len = self.parent_len;
							let saved_address_cells = self.address_cells;
							let saved_size_cells = self.size_cells;

							self.parent_buf[..new_parent_len]
								.copy_from_slice(&candidate_path[..new_parent_len]);
							self.parent_len = new_parent_len;

							self.walk()?;

							self.parent_len = saved_len;
							self.address_cells = saved_address_cells;
							self.size_cells = saved_size_cells;
						}
						None => self.walk_uninteresting()?,
					}
				}
				Token::Prop => {
					let len = self.cursor.read_u32() as usize;
					let name_off = self.cursor.read_u32();
					let name = resolve_name(self.strings, name_off).to_bytes();
					let value = self.cursor.take_aligned(len);

					if name == b"#address-cells" {
						self.address_cells = decode_cell_count(value, self.address_cells);
					} else if name == b"#size-cells" {
						self.size_cells = decode_cell_count(value, self.size_cells);
					}

					if let Some(index) = self.find_prop_match(name) {
						let spec = &self.paths[index];
						spec.sink.prop(spec.path, name, value, self.address_cells, self.size_cells);
					}
				}
				Token::Nop => {}
				Token::EndNode | Token::End => return Ok(()),
			}
		}
	}

	/// Skips the node whose `BEGIN_NODE` and name have just been consumed,
	/// without tracking cell context or firing any sink.
	fn walk_uninteresting(&mut self) -> Result<(), FdtError> {
		loop {
			match next_token(&mut self.cursor)? {
				Token::BeginNode => {
					self.cursor.skip_node_name();
					self.walk_uninteresting()?;
				}
				Token::Prop => {
					let len = self.cursor.read_u32() as usize;
					let _name_off = self.cursor.read_u32();
					self.cursor.skip_prop_payload(len);
				}
				Token::Nop => {}
				Token::EndNode => return Ok(()),
				Token::End => return Err(FdtError::MalformedStructure { offset: self.cursor.offset() }),
			}
		}
	}
}
