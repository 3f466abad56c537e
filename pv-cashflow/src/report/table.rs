use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use pv_model::{SimulationResult, YearlyRecord};

use crate::report::summary::{AnnualBreakdown, EnergySummary, InvestmentAssessment};

/// Rows shown unless the full ledger is requested.
pub const DEFAULT_LEDGER_ROWS: usize = 10;

/// Rounds to whole units and groups thousands with commas.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn amount_cell(value: f64) -> Cell {
    Cell::new(format_amount(value)).set_alignment(CellAlignment::Right)
}

fn signed_cell(value: f64) -> Cell {
    amount_cell(value).fg(if value >= 0.0 { Color::Green } else { Color::Red })
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

/// The yearly ledger, first [`DEFAULT_LEDGER_ROWS`] years unless `all`.
pub fn ledger_table(records: &[YearlyRecord], all: bool) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Year",
        "Generation",
        "Self-consumed",
        "Grid",
        "Feed-in",
        "Price",
        "Income",
        "Expenses",
        "Replacement",
        "Cashflow",
        "Cumulative",
        "NPV",
    ]);

    let rows = if all { records.len() } else { DEFAULT_LEDGER_ROWS };
    for record in records.iter().take(rows) {
        table.add_row(vec![
            Cell::new(record.year),
            amount_cell(record.generation),
            amount_cell(record.self_consumed),
            amount_cell(record.grid_purchase),
            amount_cell(record.feed_in),
            Cell::new(format!("{:.2}", record.electricity_price))
                .set_alignment(CellAlignment::Right),
            amount_cell(record.total_income()),
            amount_cell(record.total_expenses()),
            if record.has_replacement() {
                Cell::new(&record.replacement_item).fg(Color::DarkYellow)
            } else {
                Cell::new("-").add_attribute(Attribute::Dim)
            },
            signed_cell(record.annual_cashflow),
            signed_cell(record.cumulative_cashflow),
            signed_cell(record.npv),
        ]);
    }
    table
}

/// Headline figures with their guideline verdicts and energy totals.
pub fn summary_table(result: &SimulationResult, energy: &EnergySummary) -> Table {
    let assessment = InvestmentAssessment::of(result);
    let verdict = |ok: bool| {
        if ok {
            Cell::new("good").fg(Color::Green)
        } else {
            Cell::new("weak").fg(Color::DarkYellow)
        }
    };

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value", ""]);
    table.add_row(vec![
        Cell::new("Net initial cost"),
        amount_cell(result.net_initial_cost),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Payback period"),
        Cell::new(if result.is_recovered() {
            format!("{:.1} years", result.payback_period)
        } else {
            format!("not within {} years", result.horizon())
        })
        .set_alignment(CellAlignment::Right),
        verdict(assessment.quick_payback),
    ]);
    table.add_row(vec![
        Cell::new("Total cashflow"),
        signed_cell(result.total_cashflow),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("NPV"),
        signed_cell(result.npv),
        verdict(assessment.positive_npv),
    ]);
    table.add_row(vec![
        Cell::new("IRR"),
        Cell::new(format!("{:.1} %", result.irr)).set_alignment(CellAlignment::Right),
        verdict(assessment.attractive_irr),
    ]);
    table.add_row(vec![
        Cell::new("Generation"),
        Cell::new(format!("{} kWh", format_amount(energy.total_generation)))
            .set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Self-consumed"),
        Cell::new(format!(
            "{} kWh ({:.1} %)",
            format_amount(energy.total_self_consumed),
            energy.self_consumption_share
        ))
        .set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Feed-in"),
        Cell::new(format!("{} kWh", format_amount(energy.total_feed_in)))
            .set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Grid purchase"),
        Cell::new(format!("{} kWh", format_amount(energy.total_grid_purchase)))
            .set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table
}

fn block_cell(blocks: f64) -> Cell {
    Cell::new(format!("{blocks:.2}")).set_alignment(CellAlignment::Right)
}

/// Income and expense items of one year, in blocks of 10,000.
pub fn breakdown_table(breakdown: &AnnualBreakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec![format!("Year {}", breakdown.year), "x10,000".to_string()]);
    for (name, blocks) in &breakdown.income {
        table.add_row(vec![Cell::new(name), block_cell(*blocks).fg(Color::Green)]);
    }
    table.add_row(vec![
        Cell::new("Total income").add_attribute(Attribute::Bold),
        block_cell(breakdown.total_income),
    ]);
    for (name, blocks) in &breakdown.expenses {
        table.add_row(vec![Cell::new(name), block_cell(*blocks).fg(Color::Red)]);
    }
    table.add_row(vec![
        Cell::new("Total expenses").add_attribute(Attribute::Bold),
        block_cell(breakdown.total_expenses),
    ]);
    table.add_row(vec![
        Cell::new("Net cashflow").add_attribute(Attribute::Bold),
        block_cell(breakdown.net_cashflow).fg(if breakdown.net_cashflow >= 0.0 {
            Color::Green
        } else {
            Color::Red
        }),
    ]);
    table
}
