//! The property-dispatch contract.

/// Receives a matched property's metadata and raw value.
///
/// A sink is a pure effect: it must not mutate anything about the
/// traversal (it has no means to, since it is only ever handed borrowed
/// data) and it must not fail the parse — if a sink needs to report an
/// error, it must buffer that error in its own state (e.g. behind a
/// `Cell`/`RefCell`) and let the caller inspect it after [`crate::parse_fdt`]
/// returns.
pub trait FdtSink {
	/// Called once for each property that matches one of the configured
	/// [`crate::PathSpec`] entries.
	///
	/// - `path` is the matched [`crate::PathSpec`]'s full path, unchanged.
	/// - `name` is the property's own name (the last path segment).
	/// - `value` is the property's raw byte value, borrowed from the blob.
	/// - `address_cells`/`size_cells` are the values inherited from the
	///   nearest ancestor that declared `#address-cells`/`#size-cells`
	///   (default `2`/`1` if never declared on the path from root).
	fn prop(&self, path: &[u8], name: &[u8], value: &[u8], address_cells: u32, size_cells: u32);
}

impl<F> FdtSink for F
where
	F: Fn(&[u8], &[u8], &[u8], u32, u32),
{
	fn prop(&self, path: &[u8], name: &[u8], value: &[u8], address_cells: u32, size_cells: u32) {
		self(path, name, value, address_cells, size_cells);
	}
}
