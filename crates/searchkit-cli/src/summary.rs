use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::Value;

use searchkit_state::{Action, AggregationFilter, QueryState};

use crate::commands::{RunOutcome, selected_filters};

/// Most fields shown in the details column.
const MAX_DETAILS: usize = 4;

pub fn print_summary(outcome: &RunOutcome) {
    let query = &outcome.state.query;
    let results = &outcome.state.results;

    if let Some(location) = &outcome.location {
        println!("Location: {location}");
    }
    println!("Query: {}", describe_query(query));
    let filters = selected_filters(query);
    if !filters.is_empty() {
        println!("Filters: {}", filters.join(", "));
    }

    if let Some(error) = &results.error {
        eprintln!("Search failed ({}): {}", error.kind, error.message);
        return;
    }

    println!("{}", results_table(outcome));
    println!(
        "Showing {} of {} result(s)",
        results.data.hits.len(),
        results.data.total
    );
    if let Some(table) = facets_table(outcome) {
        println!();
        println!("Facets:");
        println!("{table}");
    }
}

pub fn results_table(outcome: &RunOutcome) -> Table {
    let query = &outcome.state.query;
    let page = query.page.unwrap_or(1) as usize;
    let size = query.size.map_or(outcome.state.results.data.hits.len(), |s| s as usize);
    let offset = page.saturating_sub(1).saturating_mul(size);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell(&capitalize(&outcome.title_field)),
        header_cell("Details"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for (index, hit) in outcome.state.results.data.hits.iter().enumerate() {
        let title = hit
            .get(&outcome.title_field)
            .map_or_else(|| "-".to_string(), display_value);
        table.add_row(vec![
            dim_cell(offset + index + 1),
            Cell::new(title).add_attribute(Attribute::Bold),
            Cell::new(details(hit, &outcome.title_field)),
        ]);
    }
    table
}

/// Facet buckets, with the selected top-level filters marked.
pub fn facets_table(outcome: &RunOutcome) -> Option<Table> {
    let aggregations = &outcome.state.results.data.aggregations;
    if aggregations.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Facet"),
        header_cell("Value"),
        header_cell("Count"),
        header_cell("Selected"),
    ]);
    apply_facet_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);

    for (facet, aggregation) in aggregations {
        let buckets = aggregation
            .get("buckets")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for bucket in buckets {
            let key = bucket.get("key").map_or_else(String::new, display_value);
            let count = bucket.get("doc_count").and_then(Value::as_u64).unwrap_or(0);
            let selected = is_selected(&outcome.state.query, facet, &key);
            table.add_row(vec![
                Cell::new(facet).fg(Color::Blue),
                Cell::new(&key),
                Cell::new(count),
                selected_cell(selected),
            ]);
        }
    }
    Some(table)
}

/// One line per action: position, type and a short payload.
pub fn render_trace(actions: &[Action]) -> String {
    actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let payload = trace_payload(action);
            if payload.is_empty() {
                format!("{}. {}", index + 1, action.kind())
            } else {
                format!("{}. {} {payload}", index + 1, action.kind())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn trace_payload(action: &Action) -> String {
    match action {
        Action::ResultsFetchSuccess(response) => {
            format!("total={} hits={}", response.total, response.hits.len())
        }
        Action::SuggestionFetchSuccess(suggestions) => format!("count={}", suggestions.len()),
        _ => serde_json::to_value(action)
            .ok()
            .and_then(|value| value.get("payload").map(Value::to_string))
            .unwrap_or_default(),
    }
}

fn describe_query(query: &QueryState) -> String {
    let mut parts = Vec::new();
    if query.query_string.is_empty() {
        parts.push("(all)".to_string());
    } else {
        parts.push(format!("{:?}", query.query_string));
    }
    if let Some(sort_by) = &query.sort_by {
        let order = query.sort_order.map_or("", |order| order.as_str());
        parts.push(format!("sort={sort_by} {order}").trim_end().to_string());
    } else if let Some(order) = query.sort_order {
        parts.push(format!("order={order}"));
    }
    if let Some(page) = query.page {
        parts.push(format!("page={page}"));
    }
    if let Some(size) = query.size {
        parts.push(format!("size={size}"));
    }
    if let Some(layout) = query.layout {
        parts.push(format!("layout={layout}"));
    }
    parts.join(" ")
}

fn is_selected(query: &QueryState, facet: &str, key: &str) -> bool {
    query.has_filter(&AggregationFilter::new(facet, key))
}

fn details(hit: &Value, title_field: &str) -> String {
    let Some(fields) = hit.as_object() else {
        return display_value(hit);
    };
    let shown: Vec<String> = fields
        .iter()
        .filter(|(key, value)| key.as_str() != title_field && !value.is_object())
        .take(MAX_DETAILS)
        .map(|(key, value)| format!("{key}={}", display_value(value)))
        .collect();
    if shown.is_empty() {
        "-".to_string()
    } else {
        shown.join(", ")
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join("|"),
        other => other.to_string(),
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_facet_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn selected_cell(selected: bool) -> Cell {
    if selected {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
