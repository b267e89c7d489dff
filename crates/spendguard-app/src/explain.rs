//! The `explain` use case: look up reason check/code documentation.

use spendguard_types::explain::{self, Explanation};
use std::fmt::Write;

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier, with everything that would have matched.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up a reason by check ID (`policy.daily_budget`) or code (`daily_budget_exceeded`).
pub fn run_explain(identifier: &str) -> ExplainOutput {
    explain::lookup_explanation(identifier)
        .map(ExplainOutput::Found)
        .unwrap_or_else(|| ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        })
}

fn heading(out: &mut String, text: &str, underline: char) {
    let rule: String = std::iter::repeat_n(underline, text.chars().count()).collect();
    let _ = writeln!(out, "{text}\n{rule}");
}

fn fenced(out: &mut String, label: &str, body: &str) {
    let _ = writeln!(out, "{label}:\n```text\n{body}\n```");
}

/// Terminal rendering: title, description, remediation, then before/after documents.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();
    heading(&mut out, exp.title, '=');
    let _ = writeln!(out, "\n{}\n", exp.description);
    heading(&mut out, "Remediation", '-');
    let _ = writeln!(out, "{}\n", exp.remediation);
    heading(&mut out, "Examples", '-');
    out.push('\n');
    fenced(&mut out, "Before (reason fires)", exp.examples.before);
    out.push('\n');
    fenced(&mut out, "After (passes)", exp.examples.after);
    out
}

pub fn format_not_found(
    identifier: &str,
    check_ids: &[&'static str],
    codes: &[&'static str],
) -> String {
    let mut out = format!("Unknown check_id or code: {identifier}\n");
    for (label, ids) in [("check_ids", check_ids), ("codes", codes)] {
        let _ = writeln!(out, "\nAvailable {label}:");
        for id in ids {
            let _ = writeln!(out, "  - {id}");
        }
    }
    out
}
