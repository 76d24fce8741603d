//! The export pipeline: discover tables, collect column metadata, build the
//! workbook, save it.
//!
//! Stages run strictly in sequence and every failure is fatal; errors
//! propagate to the top-level handler in `main.rs`.

use crate::adapters::ConnectionConfig;
use crate::adapters::mysql::MySqlAdapter;
use crate::config::ExportConfig;
use crate::output;
use dbsheet_core::Result;
use dbsheet_core::models::{COLUMN_HEADER, Table};
use dbsheet_core::xlsx::{Workbook, truncate_sheet_name};
use tracing::info;

/// Decides whether a table is exported.
///
/// An empty inclusion list exports everything; otherwise only exact name
/// matches pass.
pub fn should_include(include: &[String], table_name: &str) -> bool {
    include.is_empty() || include.iter().any(|name| name == table_name)
}

/// Runs the full export: Connect → Discover → Collect → Build → Save.
pub async fn run_export(config: &ExportConfig) -> Result<()> {
    info!("Starting schema export...");
    info!("Target: {}", config.display_url());
    info!("Output: {}", config.output_file.display());

    let adapter = MySqlAdapter::connect(config, &ConnectionConfig::default()).await?;

    let mut tables = adapter.list_tables(&config.database).await?;
    info!(
        "Found {} tables in schema '{}'",
        tables.len(),
        config.database
    );

    for table in &mut tables {
        if should_include(&config.tables, &table.name) {
            table.columns = adapter.collect_columns(&config.database, &table.name).await?;
        }
    }

    // All metadata is in memory; close the connection before building the
    // workbook. No queries happen past this point.
    adapter.close().await;

    let workbook = build_workbook(&tables);
    output::save_workbook(&workbook, &config.output_file).await?;

    info!("Workbook saved to {}", config.output_file.display());
    println!("Export completed successfully");
    println!("Output: {}", config.output_file.display());
    println!("Worksheets: {}", workbook.worksheet_count());

    Ok(())
}

/// Builds the workbook from collected metadata.
///
/// Each table with at least one column becomes a worksheet: a bold header
/// row, then one row per column in catalog order. Tables with no columns
/// (filtered out, or genuinely empty) are silently omitted.
pub fn build_workbook(tables: &[Table]) -> Workbook {
    let mut workbook = Workbook::new();

    for table in tables {
        if table.columns.is_empty() {
            continue;
        }

        let sheet_name = truncate_sheet_name(&table.name);
        let sheet = workbook.worksheet(&sheet_name);

        for (col, title) in COLUMN_HEADER.iter().enumerate() {
            sheet.write_string_bold(0, col as u32, title);
        }

        for (index, column) in table.columns.iter().enumerate() {
            for (col, value) in column.as_row().iter().enumerate() {
                sheet.write_string(index as u32 + 1, col as u32, value);
            }
        }
    }

    workbook
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbsheet_core::models::Column;

    fn string_list(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    fn column(name: &str) -> Column {
        Column {
            name: name.to_string(),
            default: "NULL".to_string(),
            nullable: "YES".to_string(),
            data_type: "text".to_string(),
            column_type: "text".to_string(),
            key: String::new(),
        }
    }

    #[test]
    fn test_should_include_empty_list_includes_everything() {
        assert!(should_include(&[], ""));
        assert!(should_include(&[], "users"));
    }

    #[test]
    fn test_should_include_exact_matches() {
        let include = string_list(&["foo", "bar"]);
        assert!(should_include(&include, "foo"));
        assert!(should_include(&include, "bar"));
    }

    #[test]
    fn test_should_include_rejects_prefix_matches() {
        let include = string_list(&["foo", "bar"]);
        assert!(!should_include(&include, "foot"));
        assert!(!should_include(&include, "fo"));
        assert!(!should_include(&include, ""));
    }

    #[test]
    fn test_build_workbook_skips_empty_tables() {
        let mut users = Table::new("users");
        users.columns.push(column("id"));
        let logs = Table::new("logs");

        let workbook = build_workbook(&[users, logs]);

        assert_eq!(workbook.worksheet_count(), 1);
        assert!(workbook.get_worksheet("users").is_some());
        assert!(workbook.get_worksheet("logs").is_none());
    }

    #[test]
    fn test_build_workbook_writes_bold_header_and_data_rows() {
        let mut users = Table::new("users");
        users.columns.push(Column {
            name: "id".to_string(),
            default: "NULL".to_string(),
            nullable: "NO".to_string(),
            data_type: "int".to_string(),
            column_type: "int".to_string(),
            key: "PRI".to_string(),
        });

        let workbook = build_workbook(&[users]);
        let sheet = workbook.get_worksheet("users").expect("users sheet");

        for (col, title) in COLUMN_HEADER.iter().enumerate() {
            assert_eq!(sheet.value(0, col as u32), Some(*title));
            assert!(sheet.is_bold(0, col as u32));
        }
        assert_eq!(sheet.value(1, 0), Some("id"));
        assert_eq!(sheet.value(1, 1), Some("NULL"));
        assert_eq!(sheet.value(1, 2), Some("NO"));
        assert_eq!(sheet.value(1, 3), Some("int"));
        assert_eq!(sheet.value(1, 4), Some("int"));
        assert_eq!(sheet.value(1, 5), Some("PRI"));
        assert!(!sheet.is_bold(1, 0));
    }

    #[test]
    fn test_build_workbook_truncates_long_table_names() {
        let long_name = "customer_order_line_item_history_archive";
        let mut table = Table::new(long_name);
        table.columns.push(column("id"));

        let workbook = build_workbook(&[table]);

        let expected: String = long_name.chars().take(31).collect();
        assert!(workbook.get_worksheet(&expected).is_some());
        assert!(workbook.get_worksheet(long_name).is_none());
    }

    #[test]
    fn test_build_workbook_truncation_collision_last_writer_wins() {
        let base = "a_very_long_shared_table_prefix"; // exactly 31 chars
        let mut first = Table::new(format!("{base}_one"));
        first.columns.push(column("first_col"));
        let mut second = Table::new(format!("{base}_two"));
        second.columns.push(column("second_col"));

        let workbook = build_workbook(&[first, second]);

        assert_eq!(workbook.worksheet_count(), 1);
        let sheet = workbook.get_worksheet(base).expect("collided sheet");
        assert_eq!(sheet.value(1, 0), Some("second_col"));
    }
}
