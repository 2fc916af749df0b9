//! Plain-text report for a finished research run.

use console::style;
use research::{CompanyInfo, ResearchState};
use std::fmt::Write;

/// Render companies then the recommendation.
pub fn render_report(state: &ResearchState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", style(format!("Results for: {}", state.query)).bold());
    let _ = writeln!(out, "{}", "=".repeat(60));

    if state.companies.is_empty() {
        let _ = writeln!(out, "\nNo companies could be researched.");
    }

    for (i, company) in state.companies.iter().enumerate() {
        render_company(&mut out, i + 1, company);
    }

    if let Some(analysis) = &state.analysis {
        let _ = writeln!(out, "\n{}", style("Developer Recommendations").bold().cyan());
        let _ = writeln!(out, "{}", "-".repeat(40));
        let _ = writeln!(out, "{}", analysis.trim());
    }

    out
}

fn render_company(out: &mut String, index: usize, company: &CompanyInfo) {
    let _ = writeln!(out, "\n{}. {}", index, style(&company.name).bold().green());

    if !company.website.is_empty() {
        let _ = writeln!(out, "   Website: {}", company.website);
    }
    let _ = writeln!(out, "   Pricing: {}", company.pricing_label());
    let _ = writeln!(out, "   Open Source: {}", company.is_open_source.label());
    let _ = writeln!(out, "   API: {}", company.api_available.label());

    list(out, "Tech Stack", &company.tech_stack);
    list(out, "Languages", &company.language_support);
    list(out, "Integrations", &company.integration_capabilities);

    if let Some(rating) = &company.developer_experience_rating {
        let _ = writeln!(out, "   Developer Experience: {}", rating);
    }
    if !company.description.is_empty() {
        let _ = writeln!(out, "   Description: {}", company.description);
    }
}

/// Show at most five entries of a list; nothing for an empty one.
fn list(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let shown: Vec<&str> = items.iter().take(5).map(String::as_str).collect();
    let _ = writeln!(out, "   {}: {}", label, shown.join(", "));
}
