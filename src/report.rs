use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::lookup::{Advisory, Finding};
use crate::models::Ecosystem;

/// Render the aggregated scan report as terminal text.
///
/// Findings are sorted by package name then version so the output does not
/// depend on the order concurrent checks finished in.
pub fn render(ecosystem: Ecosystem, findings: &[Finding]) -> String {
    let mut findings: Vec<&Finding> = findings.iter().collect();
    findings.sort_by(|a, b| a.dependency().cmp(b.dependency()));

    let total = findings.len();
    let vulnerable: Vec<&Finding> = findings
        .iter()
        .copied()
        .filter(|f| matches!(f, Finding::Vulnerable(..)))
        .collect();
    let failed: Vec<&Finding> = findings
        .iter()
        .copied()
        .filter(|f| matches!(f, Finding::Failed(..)))
        .collect();
    let advisory_count: usize = vulnerable
        .iter()
        .map(|f| match f {
            Finding::Vulnerable(_, advisories) => advisories.len(),
            _ => 0,
        })
        .sum();

    let mut out = String::new();
    out.push_str(&format!(
        "\n {} v{}\n",
        "cve-hunter".bold(),
        env!("CARGO_PKG_VERSION")
    ));
    out.push_str(&format!(" Ecosystem: {}\n\n", ecosystem));

    out.push_str(" ┌────────────────────────────────────────────────────┐\n");
    out.push_str(&format!(" │  {:<49} │\n", "SUMMARY".bold()));
    out.push_str(&format!(
        " │  {:<49} │\n",
        format!("Dependencies checked : {:>4}", total)
    ));
    out.push_str(&format!(
        " │  {:<49} │\n",
        format!("Clean                : {:>4}", total - vulnerable.len() - failed.len())
    ));
    out.push_str(&format!(
        " │  {:<49} │\n",
        format!(
            "Vulnerable           : {:>4}  ({} advisories)",
            vulnerable.len(),
            advisory_count
        )
    ));
    out.push_str(&format!(
        " │  {:<49} │\n",
        format!("Lookup failed        : {:>4}", failed.len())
    ));
    out.push_str(" └────────────────────────────────────────────────────┘\n\n");

    if !vulnerable.is_empty() {
        out.push_str(&format!(
            " {} Dependencies with known vulnerabilities:\n\n",
            "[VULN]".red().bold()
        ));
        out.push_str(&advisory_table(&vulnerable).to_string());
        out.push_str("\n\n");
    }

    if !failed.is_empty() {
        out.push_str(&format!(
            " {} Dependencies that could not be checked:\n\n",
            "[FAIL]".yellow().bold()
        ));
        for finding in &failed {
            if let Finding::Failed(dep, reason) = finding {
                out.push_str(&format!("  {} {}: {}\n", "✗".yellow(), dep, reason));
            }
        }
        out.push('\n');
    }

    if vulnerable.is_empty() && failed.is_empty() {
        out.push_str(&format!(" {} No known vulnerabilities found.\n", "✓".green()));
    }

    out
}

fn advisory_table(findings: &[&Finding]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Package").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Advisory").add_attribute(Attribute::Bold),
            Cell::new("Aliases").add_attribute(Attribute::Bold),
            Cell::new("Severity").add_attribute(Attribute::Bold),
            Cell::new("Summary").add_attribute(Attribute::Bold),
        ]);

    for finding in findings {
        let Finding::Vulnerable(dep, advisories) = finding else {
            continue;
        };
        for advisory in advisories {
            table.add_row(vec![
                Cell::new(&dep.name),
                Cell::new(&dep.version),
                Cell::new(&advisory.id),
                Cell::new(advisory.aliases.join(", ")),
                severity_cell(advisory),
                Cell::new(advisory.summary.as_deref().unwrap_or("-")),
            ]);
        }
    }

    table
}

fn severity_cell(advisory: &Advisory) -> Cell {
    let label = advisory.severity.as_deref().unwrap_or("unknown");
    let color = match label.to_ascii_uppercase().as_str() {
        "CRITICAL" | "HIGH" => Color::Red,
        "MODERATE" | "MEDIUM" => Color::Yellow,
        "LOW" => Color::Green,
        _ => Color::DarkGrey,
    };
    Cell::new(label).fg(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dependency;

    fn advisory(id: &str) -> Advisory {
        Advisory {
            id: id.to_string(),
            aliases: vec!["CVE-2023-30861".to_string()],
            summary: Some("session cookie disclosure".to_string()),
            severity: Some("HIGH".to_string()),
        }
    }

    #[test]
    fn test_clean_report() {
        let findings = vec![
            Finding::Clean(Dependency::new("requests", "2.31.0")),
            Finding::Clean(Dependency::new("flask", "2.3.2")),
        ];
        let out = render(Ecosystem::PyPI, &findings);
        assert!(out.contains("Dependencies checked :    2"));
        assert!(out.contains("No known vulnerabilities found."));
    }

    #[test]
    fn test_vulnerable_and_failed_are_listed() {
        let findings = vec![
            Finding::Vulnerable(Dependency::new("flask", "1.0"), vec![advisory("GHSA-m2qf-hxjv-5gpq")]),
            Finding::Failed(Dependency::new("left-pad", "1.3.0"), "timed out".to_string()),
            Finding::Clean(Dependency::new("requests", "2.31.0")),
        ];
        let out = render(Ecosystem::PyPI, &findings);
        assert!(out.contains("Dependencies checked :    3"));
        assert!(out.contains("GHSA-m2qf-hxjv-5gpq"));
        assert!(out.contains("CVE-2023-30861"));
        assert!(out.contains("left-pad@1.3.0: timed out"));
        assert!(!out.contains("No known vulnerabilities found."));
    }

    #[test]
    fn test_order_does_not_depend_on_input_order() {
        let a = Finding::Failed(Dependency::new("a", "1"), "x".to_string());
        let b = Finding::Failed(Dependency::new("b", "1"), "x".to_string());
        let first = render(Ecosystem::Npm, &[a.clone(), b.clone()]);
        let second = render(Ecosystem::Npm, &[b, a]);
        assert_eq!(first, second);
    }
}
