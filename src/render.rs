use analytics::report::{format_currency, format_display_date};
use analytics::{EventsSummary, OverviewSummary, RevenueSummary};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use core_types::{AnalyticsViewModel, DateRange, Section};

pub fn print_header(range: &DateRange) {
    println!(
        "Organizer Dashboard ({} - {})",
        format_display_date(range.start()),
        format_display_date(range.end())
    );
}

pub fn print_section(model: &AnalyticsViewModel, section: Section) {
    println!();
    println!("== {} ==", section);
    match section {
        Section::Overview => print_overview(&OverviewSummary::from_section(&model.overview)),
        Section::Events => print_events(&EventsSummary::from_section(&model.events)),
        Section::Revenue => print_revenue(&RevenueSummary::from_section(&model.revenue)),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn right(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn print_overview(summary: &OverviewSummary) {
    let mut table = new_table(vec!["Metric", "Value"]);
    table
        .add_row(vec![Cell::new("Total Events"), right(summary.total_events)])
        .add_row(vec![Cell::new("Approved Events"), right(summary.approved_events)])
        .add_row(vec![Cell::new("Completed Events"), right(summary.completed_events)])
        .add_row(vec![Cell::new("Pending Events"), right(summary.pending_events)])
        .add_row(vec![Cell::new("Total Revenue"), right(format_currency(summary.total_revenue))]);
    println!("{table}");
}

fn print_events(summary: &EventsSummary) {
    let mut totals = new_table(vec!["Metric", "Value"]);
    totals
        .add_row(vec![Cell::new("Total Events"), right(summary.total_events)])
        .add_row(vec![Cell::new("Tickets Sold"), right(summary.total_tickets_sold)])
        .add_row(vec![Cell::new("Avg Tickets / Event"), right(summary.avg_tickets_per_event)])
        .add_row(vec![Cell::new("Total Revenue"), right(format_currency(summary.total_revenue))]);
    println!("{totals}");

    for (title, rows) in [("Status", &summary.by_status), ("Category", &summary.by_category)] {
        if rows.is_empty() {
            println!("No event data available by {}.", title.to_lowercase());
            continue;
        }
        let mut table = new_table(vec![title, "Events"]);
        for row in rows {
            table.add_row(vec![Cell::new(&row.label), right(row.count)]);
        }
        println!("{table}");
    }
}

fn print_revenue(summary: &RevenueSummary) {
    if summary.by_period.is_empty() {
        println!("No revenue data available.");
    } else {
        let mut table = new_table(vec!["Period", "Your Revenue", "Platform Revenue", "Total", "Transactions"]);
        for row in &summary.by_period {
            table.add_row(vec![
                Cell::new(&row.period),
                right(format_currency(row.organizer_revenue)),
                right(format_currency(row.admin_revenue)),
                right(format_currency(row.total_revenue)),
                right(row.transaction_count),
            ]);
        }
        println!("{table}");
        println!("Your revenue in range: {}", format_currency(summary.organizer_total()));
    }

    if !summary.top_events.is_empty() {
        let mut table = new_table(vec!["Top Event", "Revenue", "Transactions"]);
        for row in &summary.top_events {
            table.add_row(vec![
                Cell::new(&row.event_name),
                right(format_currency(row.total_revenue)),
                right(row.transaction_count),
            ]);
        }
        println!("{table}");
    }
}
