//! Declarative description of the dashboard, derived from `ViewState` on every
//! update. Presentation layers (the terminal UI, the `snapshot` command) only
//! ever draw a `Dashboard`; they never look at the state directly.

pub mod format;

use serde::Serialize;

use crate::engine::pipeline::project;
use crate::engine::types::{LoadStatus, MarketRecord, SortDirection, SortField, ViewState};

pub const HEADING: &str = "Cryptocurrency Dashboard";
pub const SEARCH_PLACEHOLDER: &str = "Search for a cryptocurrency...";
pub const COLUMNS: [&str; 7] = [
    "Image",
    "Name",
    "Symbol",
    "Current Price (USD)",
    "Total Volume",
    "Market Cap",
    "24h % Change",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub heading: &'static str,
    pub search: SearchInput,
    pub buttons: [SortButton; 2],
    pub status: LoadStatus,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchInput {
    pub placeholder: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortButton {
    pub field: SortField,
    pub label: &'static str,
    // direction applied by the last click, None before the first
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: [&'static str; 7],
    pub rows: Vec<Row>,
}

/// One rendered record. `key` is the record id, never its position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub key: String,
    pub image_url: String,
    pub name: String,
    pub symbol: String,
    pub current_price: String,
    pub total_volume: String,
    pub market_cap: String,
    pub change_24h: String,
}

impl Row {
    pub fn from_record(record: &MarketRecord) -> Self {
        Self {
            key: record.id.clone(),
            image_url: record.image_url.clone(),
            name: record.name.clone(),
            symbol: record.symbol.clone(),
            current_price: format::price(record.current_price),
            total_volume: format::plain(record.total_volume),
            market_cap: format::grouped_usd(record.market_cap),
            change_24h: format::percentage(record.price_change_percentage_24h),
        }
    }

    // Cells in column order, the image column carrying the thumbnail URL
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.image_url,
            &self.name,
            &self.symbol,
            &self.current_price,
            &self.total_volume,
            &self.market_cap,
            &self.change_24h,
        ]
    }
}

pub fn sort_label(field: SortField) -> &'static str {
    match field {
        SortField::MarketCap => "Sort by Market Cap",
        SortField::Change => "Sort by 24h % Change",
    }
}

impl Dashboard {
    pub fn from_state(state: &ViewState) -> Self {
        let rows = project(state).into_iter().map(Row::from_record).collect();
        let button = |field| SortButton {
            field,
            label: sort_label(field),
            direction: state.sort_state(field),
        };

        Self {
            heading: HEADING,
            search: SearchInput {
                placeholder: SEARCH_PLACEHOLDER,
                value: state.search_term.clone(),
            },
            buttons: [button(SortField::MarketCap), button(SortField::Change)],
            status: state.status.clone(),
            table: Table { columns: COLUMNS, rows },
        }
    }

    /// Plain-text rendering used by the `snapshot` command.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.table.columns.iter().map(|c| c.len()).collect();
        for row in &self.table.rows {
            for (w, cell) in widths.iter_mut().zip(row.cells()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        out.push_str(self.heading);
        out.push('\n');
        if !self.search.value.is_empty() {
            out.push_str(&format!("Search: {}\n", self.search.value));
        }
        if let LoadStatus::Failed { reason } = &self.status {
            out.push_str(&format!("Error fetching data: {reason}\n"));
        }
        out.push('\n');
        out.push_str(&text_line(self.table.columns, &widths));
        out.push('\n');
        out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 3 * (widths.len() - 1)));
        out.push('\n');
        for row in &self.table.rows {
            out.push_str(&text_line(row.cells(), &widths));
            out.push('\n');
        }
        out
    }
}

fn text_line(cells: [&str; 7], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
