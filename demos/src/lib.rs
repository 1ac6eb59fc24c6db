//! Arvak Demo Helpers
//!
//! Console output shared by the demo binaries.

use arvak_rest::{Counts, SampleResult};
use console::style;

/// Width of the histogram bars, in characters.
const BAR_WIDTH: usize = 40;

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Render one histogram as text rows, most frequent first.
///
/// At most `limit` rows are produced; bars are scaled to the largest count.
pub fn histogram_rows(counts: &Counts, limit: usize) -> Vec<String> {
    let sorted = counts.sorted();
    let Some(&(_, max)) = sorted.first() else {
        return Vec::new();
    };
    let total = counts.total_shots().max(1);
    let width = sorted.iter().map(|(bits, _)| bits.len()).max().unwrap_or(0);

    sorted
        .iter()
        .take(limit)
        .map(|(bits, count)| {
            let bar = if max == 0 {
                0
            } else {
                (*count as usize * BAR_WIDTH).div_ceil(max as usize)
            };
            format!(
                "{bits:>width$} {:>8} ({:>5.1}%) {}",
                count,
                *count as f64 * 100.0 / total as f64,
                "█".repeat(bar)
            )
        })
        .collect()
}

/// Print every circuit result of a batch.
pub fn print_sample_result(names: &[String], result: &SampleResult, limit: usize) {
    for (index, execution) in result.results().iter().enumerate() {
        let name = names.get(index).map_or("<unnamed>", String::as_str);
        print_section(&format!("{name} [{}]", execution.register));
        print_result("Shots", execution.counts.total_shots());
        print_result("Outcomes", execution.counts.len());
        for row in histogram_rows(&execution.counts, limit) {
            println!("  {row}");
        }
    }
}
