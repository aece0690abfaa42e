//! Console tables.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};

use intentbench_core::{ComparativeReport, ModelCatalog, ModelSummary, PromptLibrary};

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn secs(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}s", v))
}

/// Colour a rate cell: green at 80% and above, red below 50%.
fn rate_cell(rate: f64) -> Cell {
    let cell = Cell::new(pct(rate));
    if rate >= 0.8 {
        cell.fg(Color::Green)
    } else if rate < 0.5 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

pub fn print_catalog(catalog: &ModelCatalog) {
    let mut table = table();
    table.set_header(vec![
        "Key",
        "Model",
        "Temperature",
        "Top-p",
        "Timeout",
        "Retries",
        "Description",
    ]);
    for profile in catalog.iter() {
        table.add_row(vec![
            Cell::new(&profile.key),
            Cell::new(&profile.name),
            Cell::new(profile.temperature),
            Cell::new(profile.top_p),
            Cell::new(format!("{}s", profile.timeout_secs)),
            Cell::new(profile.max_retries),
            Cell::new(&profile.description),
        ]);
    }
    println!("{}", table);
}

pub fn print_prompts(prompts: &PromptLibrary) {
    let mut table = table();
    table.set_header(vec!["Variant", "Description", "Best for"]);
    for variant in prompts.iter() {
        table.add_row(vec![&variant.name, &variant.description, &variant.best_for]);
    }
    println!("{}", table);
}

pub fn print_summary(summary: &ModelSummary) {
    println!(
        "\n{} / {} ({} cases)",
        summary.model_name, summary.prompt_variant, summary.total_cases
    );

    let mut headline = table();
    headline.set_header(vec!["Metric", "Value"]);
    headline.add_row(vec![Cell::new("Success rate"), rate_cell(summary.success_rate)]);
    headline.add_row(vec![Cell::new("JSON validity"), rate_cell(summary.json_validity_rate)]);
    headline.add_row(vec![
        Cell::new("Intent accuracy"),
        rate_cell(summary.intent_accuracy_rate),
    ]);
    headline.add_row(vec![
        Cell::new("Entity accuracy"),
        Cell::new(summary.mean_entity_accuracy.map_or_else(|| "-".to_string(), pct)),
    ]);
    if let Some(timing) = summary.timing {
        headline.add_row(vec![
            Cell::new("Inference time (mean / median / min / max)"),
            Cell::new(format!(
                "{:.2}s / {:.2}s / {:.2}s / {:.2}s",
                timing.mean, timing.median, timing.min, timing.max
            )),
        ]);
    }
    if let Some(confidence) = summary.confidence {
        headline.add_row(vec![
            Cell::new("Confidence (mean)"),
            Cell::new(format!("{:.2}", confidence.mean)),
        ]);
    }
    println!("{}", headline);

    let mut groups = table();
    groups.set_header(vec!["Group", "Value", "Cases", "Intent accuracy"]);
    for (label, stats) in [
        ("Language", &summary.by_language),
        ("Difficulty", &summary.by_difficulty),
        ("Category", &summary.by_category),
    ] {
        for (name, group) in stats {
            groups.add_row(vec![
                Cell::new(label),
                Cell::new(name),
                Cell::new(group.total),
                rate_cell(group.accuracy),
            ]);
        }
    }
    println!("{}", groups);

    if !summary.failure_kinds.is_empty() {
        let mut failures = table();
        failures.set_header(vec!["Failure", "Cases"]);
        for (kind, count) in &summary.failure_kinds {
            failures.add_row(vec![Cell::new(kind).fg(Color::Red), Cell::new(count)]);
        }
        println!("{}", failures);
    }
}

pub fn print_report(report: &ComparativeReport) {
    println!(
        "\nComparative analysis of {} runs",
        report.summary.models_analyzed
    );

    let mut overall = table();
    overall.set_header(vec!["Rank", "Run", "Score", "Intent", "JSON"]);
    for (i, rank) in report.rankings.overall.iter().enumerate() {
        overall.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&rank.key),
            Cell::new(pct(rank.score)),
            rate_cell(rank.intent_accuracy_rate),
            rate_cell(rank.json_validity_rate),
        ]);
    }
    println!("{}", overall);

    let mut matrix = table();
    matrix.set_header(vec![
        "Run",
        "Success",
        "JSON",
        "Intent",
        "Mean time",
        "Mean confidence",
    ]);
    for row in &report.performance_matrix {
        matrix.add_row(vec![
            Cell::new(&row.key),
            rate_cell(row.success_rate),
            rate_cell(row.json_validity_rate),
            rate_cell(row.intent_accuracy_rate),
            Cell::new(secs(row.mean_time_secs)),
            Cell::new(
                row.mean_confidence
                    .map_or_else(|| "-".to_string(), |c| format!("{:.2}", c)),
            ),
        ]);
    }
    println!("{}", matrix);

    if !report.language_analysis.is_empty() {
        let mut languages = table();
        languages.set_header(vec!["Language", "Best run", "Best", "Average"]);
        for (language, analysis) in &report.language_analysis {
            languages.add_row(vec![
                Cell::new(language),
                Cell::new(&analysis.best),
                rate_cell(analysis.best_accuracy),
                Cell::new(pct(analysis.average_accuracy)),
            ]);
        }
        println!("{}", languages);
    }

    println!("\nRecommendations:");
    for line in &report.recommendations {
        println!("  - {}", line);
    }
}
