use std::time::Duration;

use colored::Colorize;

use crate::core::types::ProbeResult;

pub fn format_line(result: &ProbeResult) -> String {
    if result.found {
        format!("{} {}: {}", "[FOUND]".green(), result.platform, result.url)
    } else {
        format!("{}   {}: {}", "[NOT]".red(), result.platform, result.url)
    }
}

pub fn format_summary(results: &[ProbeResult], elapsed: Duration) -> String {
    let found = results.iter().filter(|r| r.found).count();
    format!(
        "Finished in {:.2}s | {}/{} accounts found",
        elapsed.as_secs_f64(),
        found,
        results.len()
    )
}

pub fn print_report(results: &[ProbeResult], elapsed: Duration) {
    for r in results {
        println!("{}", format_line(r));
    }
    println!();
    println!("{}", format_summary(results, elapsed).bold());
}
