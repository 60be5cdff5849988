//! Terminal rendering over model records.
//!
//! This layer is a thin consumer of the models: all sorting, scaling, and
//! summarizing of expression values happens here, never in the models
//! themselves.

use std::collections::BTreeMap;
use std::error::Error;
use std::io::Write;

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::client::GtexClient;
use crate::error::Result as GtexResult;
use crate::models::expression::{GeneExpression, MedianExpression, SubsetAttribute};
use crate::models::genes::Genes;

/// Rendering knobs shared by the chart functions.
///
/// `width` bounds the rendered output in terminal columns, `sort_by` names
/// the demographic attribute used to group summary rows, and `transpose`
/// swaps the table axes (tissues as rows), the terminal stand-in for rotated
/// axis labels.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u16,
    pub sort_by: Option<SubsetAttribute>,
    pub transpose: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 100,
            sort_by: None,
            transpose: false,
        }
    }
}

/// Render the genes × tissues median matrix as a table.
pub fn median_table(expression: &MedianExpression, options: &RenderOptions) -> String {
    let (genes, medians) = expression.median_matrix();
    let mut table = new_table(options);

    if options.transpose {
        let mut header = vec![bold("tissue")];
        header.extend(genes.iter().map(|g| bold(g)));
        table.set_header(header);
        for (tissue, values) in &medians {
            let mut row = vec![Cell::new(tissue)];
            row.extend(values.iter().map(|v| Cell::new(format_value(*v))));
            table.add_row(row);
        }
    } else {
        let mut header = vec![bold("gene")];
        header.extend(medians.keys().map(|t| bold(t)));
        table.set_header(header);
        for (i, gene) in genes.iter().enumerate() {
            let mut row = vec![Cell::new(gene)];
            for values in medians.values() {
                row.push(Cell::new(
                    values.get(i).map(|v| format_value(*v)).unwrap_or_default(),
                ));
            }
            table.add_row(row);
        }
    }

    table.to_string()
}

/// Render one bar per record, scaled to the widest median.
pub fn median_bars(expression: &MedianExpression, options: &RenderOptions) -> String {
    let records = expression.records();
    let max = records.iter().map(|r| r.median).fold(0.0_f64, f64::max);

    let label_width = records
        .iter()
        .map(|r| r.gene_symbol.len() + r.tissue_site_detail_id.len() + 3)
        .max()
        .unwrap_or(0);
    let bar_width = (options.width as usize).saturating_sub(label_width + 12).max(10);

    let mut out = String::new();
    for record in records {
        let label = format!("{} @ {}", record.gene_symbol, record.tissue_site_detail_id);
        let bar = bar(record.median, max, bar_width);
        out.push_str(&format!(
            "{label:<label_width$} {bar} {}\n",
            format_value(record.median)
        ));
    }
    out
}

/// Render the median matrix with value-graded cell colors.
pub fn heatmap(expression: &MedianExpression, options: &RenderOptions) -> String {
    let (genes, medians) = expression.median_matrix();
    let max = medians
        .values()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max);

    let mut table = new_table(options);
    let mut header = vec![bold("gene")];
    header.extend(medians.keys().map(|t| bold(t)));
    table.set_header(header);

    for (i, gene) in genes.iter().enumerate() {
        let mut row = vec![Cell::new(gene)];
        for values in medians.values() {
            match values.get(i) {
                Some(v) => row.push(Cell::new(format_value(*v)).fg(grade(*v, max))),
                None => row.push(Cell::new("")),
            }
        }
        table.add_row(row);
    }

    table.to_string()
}

/// Render a Newick cluster string as an indented tree.
///
/// Branch lengths are dropped; only the nesting and the leaf names are kept.
pub fn cluster_tree(newick: &str) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    let mut label = String::new();

    let mut emit = |label: &mut String, depth: usize, out: &mut String| {
        let name = label.split(':').next().unwrap_or("").trim();
        if !name.is_empty() {
            out.push_str(&"  ".repeat(depth));
            out.push_str(name);
            out.push('\n');
        }
        label.clear();
    };

    for c in newick.chars() {
        match c {
            '(' => {
                out.push_str(&"  ".repeat(depth));
                out.push_str("+\n");
                depth += 1;
            }
            ')' => {
                emit(&mut label, depth, &mut out);
                depth = depth.saturating_sub(1);
            }
            ',' => emit(&mut label, depth, &mut out),
            ';' => emit(&mut label, depth, &mut out),
            _ => label.push(c),
        }
    }
    emit(&mut label, depth, &mut out);
    out
}

/// Per-record summary of raw expression values.
#[derive(Debug, Clone, PartialEq)]
pub struct TissueSummary {
    pub tissue_site_detail_id: String,
    pub median: f64,
    pub samples: usize,
    pub subset_group: Option<String>,
}

/// Summarize raw per-sample expression into (tissue, median, n, group) rows,
/// ordered by tissue, then subset group, then median.
pub fn expression_summary(expression: &GeneExpression) -> Vec<TissueSummary> {
    let mut rows: Vec<TissueSummary> = expression
        .records()
        .iter()
        .map(|r| TissueSummary {
            tissue_site_detail_id: r.tissue_site_detail_id.clone(),
            median: median(&r.data),
            samples: r.data.len(),
            subset_group: r.subset_group.clone(),
        })
        .collect();

    rows.sort_by(|a, b| {
        (&a.tissue_site_detail_id, &a.subset_group)
            .cmp(&(&b.tissue_site_detail_id, &b.subset_group))
            .then(a.median.total_cmp(&b.median))
    });
    rows
}

/// Write the median matrix as CSV: one row per gene, one column per tissue.
pub fn export_csv<W: Write>(
    expression: &MedianExpression,
    writer: W,
) -> Result<(), Box<dyn Error>> {
    let (genes, medians) = expression.median_matrix();
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["gene".to_string()];
    header.extend(medians.keys().cloned());
    wtr.write_record(&header)?;

    for (i, gene) in genes.iter().enumerate() {
        let mut row = vec![gene.clone()];
        for values in medians.values() {
            row.push(values.get(i).map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render the summary rows as a table.
pub fn summary_table(rows: &[TissueSummary], options: &RenderOptions) -> String {
    let mut table = new_table(options);
    table.set_header(vec![
        bold("tissue"),
        bold("median"),
        bold("n"),
        bold("group"),
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.tissue_site_detail_id),
            Cell::new(format_value(row.median)),
            Cell::new(row.samples),
            Cell::new(row.subset_group.as_deref().unwrap_or("-")),
        ]);
    }
    table.to_string()
}

/// One-call convenience: resolve `gene_ids`, fetch their median expression
/// across `tissue_ids`, and render the matrix table followed by a bar chart.
pub fn median_expression_report(
    client: &GtexClient,
    gene_ids: &[&str],
    tissue_ids: &[&str],
    options: &RenderOptions,
) -> GtexResult<String> {
    let genes = Genes::fetch(client, gene_ids)?;
    let expression = MedianExpression::fetch(client, &genes.gencode_ids(), tissue_ids)?;

    let mut out = median_table(&expression, options);
    out.push('\n');
    out.push_str(&median_bars(&expression, options));
    Ok(out)
}

/// One-call convenience: per-tissue summaries of raw expression, optionally
/// stratified by `options.sort_by`.
pub fn expression_summary_report(
    client: &GtexClient,
    gene_ids: &[&str],
    tissue_ids: &[&str],
    options: &RenderOptions,
) -> GtexResult<String> {
    let genes = Genes::fetch(client, gene_ids)?;
    let expression =
        GeneExpression::fetch(client, &genes.gencode_ids(), tissue_ids, options.sort_by)?;
    Ok(summary_table(&expression_summary(&expression), options))
}

/// Median of a sample vector; zero when no samples were returned.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn new_table(options: &RenderOptions) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(options.width);
    table
}

fn bold(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

fn grade(value: f64, max: f64) -> Color {
    if max <= 0.0 {
        return Color::Reset;
    }
    match value / max {
        x if x < 0.2 => Color::Blue,
        x if x < 0.4 => Color::Cyan,
        x if x < 0.6 => Color::Green,
        x if x < 0.8 => Color::Yellow,
        _ => Color::Red,
    }
}

fn format_value(value: f64) -> String {
    format!("{value:.3}")
}
