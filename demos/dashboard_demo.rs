use anyhow::Result;
use branch_insights_engine::*;
use std::collections::BTreeSet;

fn print_rows(title: &str, rows: &[AggregateRow]) {
    println!("\n{}", title);
    println!("  {:<16} {:>14} {:>14} {:>14}", "", "Income", "Expense", "Profit");
    for row in rows {
        println!(
            "  {:<16} {:>14} {:>14} {:>14}",
            row.label(),
            format_currency(row.income()),
            format_currency(row.expense()),
            format_currency(row.profit())
        );
    }
}

fn export_detail_csv(records: &[Record], filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename)?;
    writer.write_record(["Period", "Branch", "Category", "Income", "Expense", "Profit"])?;
    for record in records {
        writer.write_record([
            record.period.label(),
            record.branch.clone(),
            record.category.clone(),
            format!("{:.2}", record.income),
            format!("{:.2}", record.expense),
            format!("{:.2}", record.profit()),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let config = DashboardConfig::default();
    println!("💼 {} - Financial Dashboard\n", config.organization_name);

    let generator = SampleDataGenerator::new(config)?;
    let records = generator.records()?;

    // The dashboard starts with everything selected.
    let selection = FilterSelection::all_from(&records);
    let report = build_report(&records, &selection)?;

    println!("📊 Indicators");
    println!("  Total income:  {}", format_currency(report.totals.total_income));
    println!("  Total expense: {}", format_currency(report.totals.total_expense));
    println!(
        "  Net profit:    {} ({})",
        format_currency(report.totals.total_profit),
        format_percent(report.margin_percent)
    );

    print_rows("📈 Monthly evolution", &report.by_period);
    print_rows("🏪 Branches", &report.by_branch);

    println!("\n🧾 Expenses by category");
    for share in &report.expense_by_category {
        println!(
            "  {:<16} {:>14} {:>8}",
            share.category,
            format_currency(share.expense),
            format_percent(share.share_percent)
        );
    }

    println!("\n🤖 Recommendation\n{}", report.recommendation);

    let csv_path = std::env::temp_dir().join("dashboard_detail.csv");
    export_detail_csv(&report.detail, &csv_path.to_string_lossy())?;
    println!("\n📋 {} detail rows written to {}", report.detail.len(), csv_path.display());

    // Deselecting every month is a valid choice; the engine reports it instead of guessing.
    let nothing = FilterSelection {
        periods: BTreeSet::new(),
        branches: selection.branches.clone(),
    };
    match build_report(&records, &nothing) {
        Ok(_) => println!("\nUnexpected report for an empty selection"),
        Err(e) => println!("\n⚠️  Empty selection: {}", e),
    }

    Ok(())
}
