//! Single-pass, allocation-free flattened device tree (FDT/DTB) parser.
//!
//! Given a pointer to an in-memory FDT blob and a statically known set of
//! interesting property paths, [`parse_fdt`] walks the structure block
//! exactly once and delivers matching properties to caller-supplied sinks,
//! returning the reserved-memory map extracted from the blob's header
//! region.
//!
//! This crate performs no heap allocation and runs single-threaded to
//! completion on the calling thread, so it is suitable for use before a
//! boot-time allocator exists. The memory backing the blob, the decoding of
//! property values (callers receive raw byte spans plus inherited cell
//! counts), and any logging or panic machinery are all the caller's
//! concern — see [`FdtSink`] for the dispatch contract.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(doc, feature(doc_cfg, doc_auto_cfg))]

mod cursor;
mod error;
mod header;
mod path;
mod sink;
mod strings;
mod token;
mod walker;

pub use error::FdtError;
pub use header::{FdtHeader, ReservedMemoryEntry, ReservedMemoryIter};
pub use path::PathSpec;
pub use sink::FdtSink;

use cursor::Cursor;
use walker::Walker;

/// Expected value of [`FdtHeader`]'s `magic` field.
pub const MAGIC: u32 = 0xD00D_FEED;

/// The `last_comp_version` value current devicetree implementations
/// typically require. Not used by [`parse_fdt`] itself — callers pass
/// their own required floor — but provided as the common default.
pub const REQUIRED_LAST_COMP_VERSION: u32 = 16;

/// Parent-path buffer capacity used by [`parse_fdt`].
///
/// Covers any realistic device tree: path depths and segment lengths in
/// practice are tiny (spec's own design notes call path counts "typically
/// < 16" and performance-irrelevant). Callers with unusually long
/// configured paths should use [`parse_fdt_with_capacity`] instead.
pub const DEFAULT_MAX_PATH_LEN: usize = 256;

/// Parses the FDT blob at `fdt_base`, delivering every property matching a
/// configured path to its sink, and returns the blob's reserved-memory
/// sequence.
///
/// `required_last_comp_version` is the caller's required `last_comp_version`
/// value (commonly [`REQUIRED_LAST_COMP_VERSION`]). `paths` is the
/// statically known set of paths of interest; it may be empty, in which
/// case the header is still validated and the reserved-memory sequence is
/// still returned.
///
/// # Safety
/// `fdt_base` must point to a valid flattened device tree blob: at least 40
/// readable bytes at the header, and the full blob (`total_size` bytes, as
/// reported by the header once read) must remain valid, unmodified, and not
/// concurrently mutated by anything else for the duration of this call and
/// for as long as the returned [`ReservedMemoryIter`] and any data handed to
/// sinks remain in use.
pub unsafe fn parse_fdt<'a>(
	fdt_base: *const u8,
	required_last_comp_version: u32,
	paths: &[PathSpec<'_>],
) -> Result<ReservedMemoryIter<'a>, FdtError> {
	// SAFETY: forwarded from this function's own safety contract.
	unsafe { parse_fdt_with_capacity::<DEFAULT_MAX_PATH_LEN>(fdt_base, required_last_comp_version, paths) }
}

/// As [`parse_fdt`], but with an explicit parent-path buffer capacity.
///
/// `MAX_PATH_LEN` must be at least as long as the longest configured
/// [`PathSpec::path`] plus one byte (for the trailing `/` carried while
/// descending); a configured path that overruns it will panic rather than
/// silently truncate.
///
/// # Safety
/// Same contract as [`parse_fdt`].
pub unsafe fn parse_fdt_with_capacity<'a, const MAX_PATH_LEN: usize>(
	fdt_base: *const u8,
	required_last_comp_version: u32,
	paths: &[PathSpec<'_>],
) -> Result<ReservedMemoryIter<'a>, FdtError> {
	// SAFETY: caller guarantees `fdt_base` points to a valid blob for 'a.
	let header = unsafe { FdtHeader::from_ptr(fdt_base, required_last_comp_version)? };

	// SAFETY: `header` was just validated; the reserved-memory table it
	// describes is part of the same blob the caller vouched for.
	let reserved = unsafe { header.reserved_memory() }?;

	// SAFETY: `off_dt_struct`/`size_dt_struct` and `off_dt_strings`/
	// `size_dt_strings` are within the blob the caller vouched for; these
	// slices are the crate's only window into the structure and strings
	// blocks and are never written through.
	let (struct_slice, strings_slice) = unsafe {
		let struct_base = fdt_base.add(header.off_dt_struct() as usize);
		let struct_slice =
			core::slice::from_raw_parts(struct_base, header.size_dt_struct() as usize);

		let strings_base = fdt_base.add(header.off_dt_strings() as usize);
		let strings_slice =
			core::slice::from_raw_parts(strings_base, header.size_dt_strings() as usize);

		(struct_slice, strings_slice)
	};

	let mut walker = Walker::<MAX_PATH_LEN>::new(Cursor::new(struct_slice), strings_slice, paths);
	walker.run()?;

	Ok(reserved)
}
