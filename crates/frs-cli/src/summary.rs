use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use frs_cli::commands::{ShowResult, TableListing, VariableListing, YearListing};
use frs_common::any_to_string;
use frs_core::SaveSummary;

pub fn print_save_summary(summary: &SaveSummary) {
    println!("Year: {}", summary.year);
    if let Some(count) = summary.codebook_variables {
        println!("Codebook: {count} variables");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Level"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut total_rows = 0usize;
    for saved in &summary.tables {
        total_rows += saved.rows;
        table.add_row(vec![
            Cell::new(&saved.name).fg(Color::Cyan),
            Cell::new(saved.level),
            Cell::new(saved.rows),
            Cell::new(saved.columns),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn print_years(years: &[YearListing]) {
    if years.is_empty() {
        println!("No survey years saved.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Year"), header_cell("Tables")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for listing in years {
        table.add_row(vec![Cell::new(listing.year), Cell::new(listing.tables)]);
    }
    println!("{table}");
}

pub fn print_tables(year: i32, tables: &[TableListing]) {
    println!("Year: {year}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Level"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for listing in tables {
        table.add_row(vec![
            Cell::new(&listing.name).fg(Color::Cyan),
            Cell::new(listing.level),
            Cell::new(listing.rows),
            Cell::new(listing.columns),
        ]);
    }
    println!("{table}");
}

pub fn print_frame(result: &ShowResult, rows: usize) {
    let frame = &result.frame;
    if result.uprated {
        println!(
            "{} ({}), uprated from {} to {}",
            frame.name, frame.level, result.base_year, result.year
        );
    } else {
        println!("{} ({}), {}", frame.name, frame.level, result.year);
    }
    let mut table = Table::new();
    table.set_header(
        frame
            .data
            .get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    let shown = rows.min(frame.record_count());
    for row in 0..shown {
        let cells: Vec<Cell> = frame
            .data
            .get_columns()
            .iter()
            .map(|column| match column.get(row) {
                Ok(value) => Cell::new(any_to_string(value)),
                Err(_) => dim_cell("?"),
            })
            .collect();
        table.add_row(cells);
    }
    println!("{table}");
    if shown < frame.record_count() {
        println!("{shown} of {} rows shown", frame.record_count());
    }
}

pub fn print_variable(listing: &VariableListing) {
    println!("{}", listing.summary);
    let Some(metadata) = &listing.metadata else {
        return;
    };
    if metadata.codemap.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell("Label")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (code, label) in &metadata.codemap {
        table.add_row(vec![Cell::new(code), Cell::new(label)]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
