use colored::Colorize;

use crate::addressing::InterfaceSpec;
use crate::models::FleetSummary;

/// Preview of the loopbacks about to be created on one device
pub fn print_preview(host: &str, specs: &[InterfaceSpec]) {
    let rows: Vec<Vec<String>> = specs
        .iter()
        .map(|spec| vec![spec.name(), spec.address.clone(), spec.description.clone()])
        .collect();

    println!();
    println!(
        "{}",
        format!("Preview for {} (loopbacks to be created):", host).bold()
    );
    println!("{}", render_table(&["Interface", "IP Address", "Description"], &rows));
}

/// Raw RPC reply, shown when verbose response printing is on
pub fn print_response(raw: &str) {
    println!("{}", raw.trim());
}

/// Final fleet summary table plus a colored tally line
pub fn print_summary(summary: &FleetSummary) {
    let rows: Vec<Vec<String>> = summary
        .results
        .iter()
        .map(|result| {
            vec![
                result.device.clone(),
                result.status.clone(),
                result.interfaces_created.to_string(),
                result.error.clone().unwrap_or_default(),
            ]
        })
        .collect();

    println!();
    println!("{}", "==== SUMMARY REPORT ====".bold());
    println!(
        "{}",
        render_table(&["Device", "Status", "Interfaces Created", "Error"], &rows)
    );
    println!(
        "{} / {} / {}",
        format!("{} succeeded", summary.succeeded()).green(),
        format!("{} skipped", summary.skipped()).yellow(),
        format!("{} failed", summary.failed()).red(),
    );
}

/// Pipe-delimited table with width-aligned columns
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut table = String::new();
    push_row(&mut table, headers.iter().map(|h| h.to_string()), &widths);
    push_row(&mut table, widths.iter().map(|w| "-".repeat(*w)), &widths);
    for row in rows {
        push_row(&mut table, row.iter().cloned(), &widths);
    }
    // No trailing newline
    table.pop();
    table
}

fn push_row(table: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    table.push('|');
    for (cell, &width) in cells.zip(widths.iter()) {
        table.push_str(&format!(" {:<width$} |", cell, width = width));
    }
    table.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_aligns_columns_to_widest_cell() {
        let rows = vec![
            vec!["Loopback1".to_string(), "10.111.1.1/32".to_string()],
            vec!["Loopback20".to_string(), "10.111.20.1/32".to_string()],
        ];
        let table = render_table(&["Interface", "IP Address"], &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Interface  | IP Address     |");
        assert_eq!(lines[1], "| ---------- | -------------- |");
        assert_eq!(lines[2], "| Loopback1  | 10.111.1.1/32  |");
        assert_eq!(lines[3], "| Loopback20 | 10.111.20.1/32 |");
    }

    #[test]
    fn test_empty_table_still_renders_header() {
        let table = render_table(&["Device", "Status"], &[]);
        assert!(table.starts_with("| Device | Status |"));
        assert_eq!(table.lines().count(), 2);
    }
}
