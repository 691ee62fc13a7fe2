use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rowlink_match::{ColumnProfile, MatchOutcome};
use rowlink_model::MatchStatus;

pub fn print_match_summary(outcome: &MatchOutcome, output: &Path) {
    println!("Output: {}", output.display());
    println!("Optimal threshold: {:.2}", outcome.optimal_threshold);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Statistic"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, value) in outcome.summary.entries() {
        let value_cell = match label.parse::<MatchStatus>() {
            Ok(status) => Cell::new(value).fg(status_color(status)),
            Err(_) => Cell::new(value),
        };
        table.add_row(vec![Cell::new(label), value_cell]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(outcome.summary.total_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut weights = Table::new();
    weights.set_header(vec![header_cell("Column"), header_cell("Weight")]);
    apply_table_style(&mut weights);
    align_column(&mut weights, 1, CellAlignment::Right);
    for (column, weight) in outcome.weights.iter() {
        weights.add_row(vec![Cell::new(column), Cell::new(format!("{weight:.3}"))]);
    }
    println!("{weights}");
}

pub fn print_profile(profiles: &[ColumnProfile]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Uniqueness"),
        header_cell("Blank"),
        header_cell("Duplicate rows"),
        header_cell("Overlap"),
        header_cell("Rows per value"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for profile in profiles {
        let (overlap, rows_per_value) = match &profile.overlap {
            Some(overlap) => (
                Cell::new(format!("{:.2}%", overlap.percent)),
                overlap
                    .average_rows_to_compare
                    .map_or_else(|| dim_cell("-"), |rows| Cell::new(format!("{rows:.2}"))),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(&profile.column),
            Cell::new(format!("{:.2}%", profile.uniqueness * 100.0)),
            Cell::new(format!("{:.2}%", profile.blank_ratio * 100.0)),
            Cell::new(profile.duplicate_rows),
            overlap,
            rows_per_value,
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_color(status: MatchStatus) -> Color {
    match status {
        MatchStatus::Matched => Color::Green,
        MatchStatus::Review => Color::Yellow,
        MatchStatus::Ambiguous => Color::Magenta,
        MatchStatus::Unmatched => Color::DarkGrey,
        MatchStatus::Duplicates => Color::Red,
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
