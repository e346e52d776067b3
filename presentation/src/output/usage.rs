//! Parameter tables for toy usage

use colored::Colorize;
use toybox_application::UsagePrinter;
use toybox_domain::Requisite;

const NOT_SET: &str = "NOT SET";
const HEADERS: [&str; 5] = ["Required", "Key", "Type", "Default", "Description"];

/// One printed row
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row([String; 5]);

impl Row {
    fn of(requisite: &dyn Requisite) -> Self {
        Row([
            requisite.is_required().to_string(),
            requisite.key().to_string(),
            requisite.type_tag().to_string(),
            requisite
                .default_display()
                .unwrap_or_else(|| NOT_SET.to_string()),
            requisite.description().to_string(),
        ])
    }

    fn key_len(&self) -> usize {
        self.0[1].chars().count()
    }
}

/// Plain-text parameter table.
///
/// Required parameters come first, then optional ones; each group is sorted
/// by key length, longest first.
pub struct UsageTable;

impl UsageTable {
    pub fn header(toy: &str) -> String {
        format!("Toy: {toy} has following parameters:")
    }

    pub fn render(toy: &str, requisites: &[&dyn Requisite]) -> String {
        let group = |required: bool| {
            let mut rows: Vec<Row> = requisites
                .iter()
                .filter(|r| r.is_required() == required)
                .map(|r| Row::of(*r))
                .collect();
            rows.sort_by_key(|row| std::cmp::Reverse(row.key_len()));
            rows
        };
        let rows: Vec<Row> = group(true).into_iter().chain(group(false)).collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.0.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = vec![Self::header(toy), Self::line(&HEADERS, &widths)];
        lines.push(Self::separator(&widths));
        lines.extend(rows.iter().map(|row| Self::line(&row.0, &widths)));
        lines.join("\n")
    }

    fn line<S: AsRef<str>>(cells: &[S; 5], widths: &[usize; 5]) -> String {
        let cells: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
            .collect();
        format!("| {} |", cells.join(" | "))
    }

    fn separator(widths: &[usize; 5]) -> String {
        let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        format!("|-{}-|", dashes.join("-|-"))
    }
}

/// Prints usage tables and example configurations to stdout
pub struct ConsoleUsagePrinter;

impl UsagePrinter for ConsoleUsagePrinter {
    fn print_usage(&self, toy: &str, requisites: &[&dyn Requisite]) {
        let table = UsageTable::render(toy, requisites);
        let mut lines = table.lines();
        if let Some(header) = lines.next() {
            println!("{}", header.cyan().bold());
        }
        for line in lines {
            println!("{line}");
        }
    }

    fn print_examples(&self, toy: &str, examples: &[(String, String)]) {
        if examples.is_empty() {
            return;
        }
        println!("\n{}", format!("Example configuration of {toy}:").cyan().bold());
        for (key, value) in examples {
            println!("{}={}", key.yellow(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toybox_domain::{BoolParameter, IntParameter, StringListParameter, StringParameter};

    #[test]
    fn test_table_layout() {
        let dir = StringParameter::builder("rf.base_dir")
            .required()
            .description("Base directory")
            .build()
            .unwrap();
        let names = StringListParameter::builder("rf.old_names")
            .required()
            .description("Old names")
            .build()
            .unwrap();
        let overwrite = BoolParameter::builder("rf.overwrite")
            .default_value(false)
            .description("Overwrite")
            .build()
            .unwrap();
        let k = IntParameter::builder("rf.k").description("k").build().unwrap();

        let requisites: Vec<&dyn Requisite> = vec![&overwrite, &dir, &k, &names];
        let table = UsageTable::render("rename_files", &requisites);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Toy: rename_files has following parameters:");
        assert!(lines[1].starts_with("| Required | Key "));
        assert!(lines[2].starts_with("|----------|-"));
        assert!(lines[3].contains("rf.old_names"));
        assert!(lines[3].contains("String[]"));
        assert!(lines[4].contains("rf.base_dir"));
        assert!(lines[5].contains("rf.overwrite"));
        assert!(lines[5].contains("| false "));
        assert!(lines[6].contains("rf.k"));
        assert!(lines[6].contains(NOT_SET));
        assert_eq!(lines.len(), 7);

        let width = lines[1].chars().count();
        assert!(lines.iter().skip(1).all(|line| line.chars().count() == width));
    }

    #[test]
    fn test_empty_toy() {
        let table = UsageTable::render("empty", &[]);
        assert_eq!(table.lines().count(), 3);
    }
}
