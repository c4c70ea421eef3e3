//! Paths command handler.
//!
//! Displays the resolved output layout for diagnostics.

use sunosync_core::OutputLayout;

/// Print the layout in `key = value` format.
pub fn execute(layout: &OutputLayout) {
    println!("{layout}");
}
