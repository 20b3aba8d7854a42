use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use matchlens::api::FieldDiff;
use matchlens::diff::{render_markup, DiffKind, DiffSegment};
use matchlens::explain::{ChartView, MatchSummary, WaterfallRow};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    Table,
    Json,
}

fn weight_color(value: f64) -> Color {
    if value < 0.0 {
        Color::Red
    } else {
        Color::Green
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn right_align(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_summary(summary: &MatchSummary) {
    println!(
        "\nMatch weight {:.4} corresponding to match probability {:.2}%",
        summary.match_weight,
        summary.match_probability * 100.0
    );
}

pub fn print_waterfall(rows: &[WaterfallRow]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Label"),
        Cell::new("Gamma"),
        Cell::new("TF"),
        Cell::new("m/u"),
        Cell::new("log2(m/u)").fg(Color::Cyan),
    ]);

    for r in rows {
        table.add_row(vec![
            Cell::new(r.sort_order),
            Cell::new(&r.column_name).add_attribute(Attribute::Bold),
            Cell::new(&r.label),
            Cell::new(optional(r.comparison_vector_value)),
            Cell::new(optional(r.is_tf_adjustment)),
            Cell::new(format!("{:.4}", r.bayes_factor)),
            Cell::new(format!("{:.4}", r.log2_bayes_factor)).fg(weight_color(r.log2_bayes_factor)),
        ]);
    }
    right_align(&mut table, 5..=6);
    println!("\n{}", table);
}

pub fn print_chart(chart: &ChartView) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Weight"),
        Cell::new("From"),
        Cell::new("To"),
        Cell::new("Probability"),
    ]);

    for bar in &chart.bars {
        let weight = if bar.show_label {
            format!("{:.2}", bar.row.log2_bayes_factor)
        } else {
            String::new()
        };
        table.add_row(vec![
            Cell::new(&bar.row.column_name).add_attribute(Attribute::Bold),
            Cell::new(weight).fg(weight_color(bar.row.log2_bayes_factor)),
            Cell::new(format!("{:.4}", bar.point.previous_cumulative)),
            Cell::new(format!("{:.4}", bar.point.cumulative)),
            Cell::new(format!("{:.4}", bar.point.probability)),
        ]);
    }
    right_align(&mut table, 1..=4);
    println!("\n{}", table);
    println!("y-domain: [{:.4}, {:.4}]", chart.y_min, chart.y_max);
}

pub fn print_record_comparison(diffs: &[FieldDiff]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Left Record"),
        Cell::new("Right Record"),
        Cell::new("Diff"),
    ]);

    for d in diffs {
        let changed = d.left != d.right;
        let diff_cell = Cell::new(render_markup(&d.segments));
        table.add_row(vec![
            Cell::new(&d.column).add_attribute(Attribute::Bold),
            Cell::new(&d.left),
            Cell::new(&d.right),
            if changed {
                diff_cell.fg(Color::Yellow)
            } else {
                diff_cell
            },
        ]);
    }
    println!("\n{}", table);
}

pub fn print_segments(segments: &[DiffSegment]) {
    println!("{}", render_markup(segments));

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Kind", "Text"]);
    for seg in segments {
        let kind = Cell::new(seg.kind);
        let kind = match seg.kind {
            DiffKind::Delete => kind.fg(Color::Red).add_attribute(Attribute::CrossedOut),
            DiffKind::Insert => kind.fg(Color::Green),
            DiffKind::Equal => kind,
        };
        table.add_row(vec![kind, Cell::new(format!("{:?}", seg.text))]);
    }
    println!("{}", table);
}
