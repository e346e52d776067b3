//! Console output for finished runs and the toy list

use colored::Colorize;
use toybox_application::PlayReport;

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Summary of one run: stages walked, outcome, teardown failures
    pub fn format_report(report: &PlayReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Toy: {}", report.toy)));
        output.push('\n');

        let stages: Vec<&str> = report.history.iter().map(|s| s.as_str()).collect();
        output.push_str(&format!(
            "{} {}\n",
            "Stages:".cyan().bold(),
            stages.join(" -> ")
        ));

        match &report.outcome {
            Ok(code) => output.push_str(&format!(
                "{} {}\n",
                "Outcome:".cyan().bold(),
                code.as_str().green()
            )),
            Err(e) => output.push_str(&format!(
                "{} {}\n",
                "Outcome:".cyan().bold(),
                e.to_string().red()
            )),
        }

        if !report.teardown_errors.is_empty() {
            output.push_str(&Self::section_header("Teardown errors"));
            for error in &report.teardown_errors {
                output.push_str(&format!("  * {}\n", error.to_string().yellow()));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_toy_list(names: &[&str]) -> String {
        let mut output = Self::section_header("Available toys");
        for name in names {
            output.push_str(&format!("  {}\n", name.yellow()));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}
