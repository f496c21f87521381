//! Table formatting utilities using comfy-table.

use comfy_table::{Cell, Table};

/// Prints a table of packages with their versions and manifest locations.
pub fn print_package_table(rows: &[(String, String, String)]) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Package").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Version").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Path").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for (name, version, path) in rows {
        table.add_row(vec![
            Cell::new(name).fg(comfy_table::Color::White),
            Cell::new(version).fg(comfy_table::Color::Cyan),
            Cell::new(path).fg(comfy_table::Color::DarkGrey),
        ]);
    }

    println!("{}", table);
}
