//! Rendering of the usage text.

use std::io::Write;

use crate::registry::Registry;

/// Columns added after the longest long name.
pub const LONG_NAME_PADDING: usize = 4;
/// Columns added after the longest description.
pub const DESCRIPTION_PADDING: usize = 2;

const OPTIONS_TAG: &str = "[options]";
const MANDATORY_TAG: &str = "[mandatory]";

/// The column widths of the long-name and description fields for this registry.
pub fn column_widths(registry: &Registry) -> (usize, usize) {
    let mut long_width = 0;
    let mut description_width = 0;
    for attr in registry.iter() {
        long_width = std::cmp::max(long_width, attr.long_name().chars().count());
        description_width = std::cmp::max(description_width, attr.description().chars().count());
    }
    (
        long_width + LONG_NAME_PADDING,
        description_width + DESCRIPTION_PADDING,
    )
}

/// Write the usage text for `program` to `out`.
///
/// ```text
/// usage: demo.exe [options]
///   -h, --help        display the program help
///   -c, --config      configuration file            [mandatory]
/// ```
pub fn write_usage<W: Write>(
    out: &mut W,
    program: &str,
    registry: &Registry,
) -> std::io::Result<()> {
    let (long_width, description_width) = column_widths(registry);
    writeln!(out, "usage: {} {}", program, OPTIONS_TAG)?;
    for attr in registry.iter() {
        let tag = if attr.is_mandatory() { MANDATORY_TAG } else { "" };
        writeln!(
            out,
            "  -{}, --{:<long_width$} {:<description_width$} {}",
            attr.short_name(),
            attr.long_name(),
            attr.description(),
            tag,
        )?;
    }
    Ok(())
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
