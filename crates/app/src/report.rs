//! Plain-text rendering of chart series and tables.

use engine::{
    BudgetRow, BudgetSettings, CategoryGroup, GroupItem, MoneyCents, RowTotals,
    views::{ChartSeries, PersonNames, TOTAL_LABEL, TableRow},
};

const BAR_WIDTH: usize = 24;

/// Creates a simple ASCII-based horizontal bar.
///
/// Returns a string like `████████░░░░░░░░` representing the ratio.
pub fn ascii_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }

    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn crowns(value: f64) -> String {
    format!("{} kr", MoneyCents::from_major(value).major_rounded())
}

fn whole(amount: MoneyCents) -> String {
    format!("{} kr", amount.major_rounded())
}

pub fn render_chart(title: &str, chart: &ChartSeries) -> String {
    let mut out = format!("{title}\n");
    if chart.labels.is_empty() {
        out.push_str("  (nothing to show)\n");
        return out;
    }

    let max = chart
        .datasets
        .iter()
        .flat_map(|dataset| dataset.values.iter().copied())
        .fold(0.0_f64, f64::max);
    let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for (idx, label) in chart.labels.iter().enumerate() {
        for (series, dataset) in chart.datasets.iter().enumerate() {
            let value = dataset.values.get(idx).copied().unwrap_or_default();
            let shown = if series == 0 { label.as_str() } else { "" };
            out.push_str(&format!(
                "  {shown:<label_width$}  {} {:>12}  {}\n",
                ascii_bar(value, max, BAR_WIDTH),
                crowns(value),
                dataset.label
            ));
        }
    }
    out
}

pub fn render_items(label: &str, items: &[GroupItem], names: &PersonNames) -> String {
    let mut out = format!("{label}\n");
    out.push_str(&format!(
        "  {:<32} {:>12} {:>12} {:>12}\n",
        "", names.a, names.b, TOTAL_LABEL
    ));
    for item in items {
        out.push_str(&format!(
            "  {:<32} {:>12} {:>12} {:>12}\n",
            item.title,
            whole(item.amounts.a),
            whole(item.amounts.b),
            whole(item.amounts.total())
        ));
    }
    out
}

pub fn render_table(rows: &[TableRow], totals: &RowTotals, names: &PersonNames) -> String {
    let mut out = format!(
        "  {:<4} {:<30} {:>12} {:>12} {:>12}\n",
        "#", "", names.a, names.b, TOTAL_LABEL
    );
    for row in rows {
        match row {
            TableRow::Header { label, icon, .. } => {
                out.push_str(&format!("[{icon}] {label}\n"));
            }
            TableRow::Data { index, row } => out.push_str(&data_line(*index, row)),
        }
    }
    out.push_str(&format!(
        "  {:<4} {:<30} {:>12} {:>12} {:>12}\n",
        "",
        TOTAL_LABEL,
        whole(totals.amounts.a),
        whole(totals.amounts.b),
        whole(totals.total())
    ));
    out
}

fn data_line(index: usize, row: &BudgetRow) -> String {
    let title = if row.temporary {
        format!("{} (temporary)", row.title)
    } else {
        row.title.clone()
    };
    format!(
        "  {:<4} {:<30} {:>12} {:>12} {:>12}\n",
        index,
        title,
        whole(row.amounts.a),
        whole(row.amounts.b),
        whole(row.total())
    )
}

pub fn render_categories(groups: &[CategoryGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("[{}] {}\n", group.group.icon(), group.label));
        for category in &group.items {
            out.push_str(&format!("  {:<32} {}\n", category.key(), category.label()));
        }
    }
    out
}

pub fn render_settings(settings: &BudgetSettings) -> String {
    let flag = |value: bool| if value { "on" } else { "off" };
    format!(
        "cost view:            {}\n\
         cost temporary:       {}\n\
         cost amortization:    {}\n\
         cost savings:         {}\n\
         total temporary:      {}\n\
         total amortization:   {}\n\
         total savings:        {}\n",
        settings.cost.view,
        flag(settings.cost.filter.include_temporary),
        flag(settings.cost.filter.include_amortization_as_expense),
        flag(settings.cost.filter.include_savings_as_expense),
        flag(settings.total.include_temporary),
        flag(settings.total.include_amortization_as_expense),
        flag(settings.total.include_savings_as_expense),
    )
}
