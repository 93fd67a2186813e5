//! Chart series and table rows built from aggregation output.
//!
//! Pure mapping: values are converted to crowns here and colors are
//! assigned by position.

use serde::{Deserialize, Serialize};

use crate::{
    BudgetRow, CategorySlice, CostBreakdown, IncomeSummary, NetComparison, NetSummary, Person,
    PersonAmounts, TopGroup,
};

/// Label of the combined column.
pub const TOTAL_LABEL: &str = "Total";

/// Person A, person B and total.
pub const PERSON_COLORS: [&str; 3] = ["#005cbbcc", "#ba005ccc", "#666666cc"];

pub const INCOME_COLORS: [&str; 3] = ["#acc643", "#2fbb0c", "#177514"];

/// Donut slice colors, reused from the start when exhausted.
pub const SLICE_PALETTE: [&str; 25] = [
    "#0b6af9", "#22c55e", "#f59e0b", "#ef4444", "#8b5cf6", "#14b8a6", "#e11d48", "#a855f7",
    "#06b6d4", "#475569", "#f97316", "#84cc16", "#10b981", "#6366f1", "#f43f5e", "#3b82f6",
    "#06b6d4", "#8b5cf6", "#a3e635", "#f59e0b", "#ef4444", "#22c55e", "#14b8a6", "#eab308",
    "#60a5fa",
];

/// Display names of the two household members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonNames {
    pub a: String,
    pub b: String,
}

impl Default for PersonNames {
    fn default() -> Self {
        Self {
            a: "Person A".to_string(),
            b: "Person B".to_string(),
        }
    }
}

impl PersonNames {
    pub fn name(&self, person: Person) -> &str {
        match person {
            Person::A => &self.a,
            Person::B => &self.b,
        }
    }

    fn with_total(&self) -> Vec<String> {
        vec![self.a.clone(), self.b.clone(), TOTAL_LABEL.to_string()]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    /// One color per value, or a single color for the whole series.
    pub colors: Vec<String>,
}

/// Labels plus parallel value series.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

fn triple(amounts: &PersonAmounts) -> Vec<f64> {
    vec![
        amounts.a.to_major(),
        amounts.b.to_major(),
        amounts.total().to_major(),
    ]
}

fn colors(palette: &[&str]) -> Vec<String> {
    palette.iter().map(ToString::to_string).collect()
}

pub fn cost_chart(breakdown: &CostBreakdown, names: &PersonNames) -> ChartSeries {
    let buckets = match breakdown {
        CostBreakdown::Total(amounts) => {
            return ChartSeries {
                labels: names.with_total(),
                datasets: vec![Dataset {
                    label: "Costs".to_string(),
                    values: triple(amounts),
                    colors: colors(&PERSON_COLORS),
                }],
            };
        }
        CostBreakdown::Grouped(grouped) => &grouped.buckets,
        CostBreakdown::Detailed(detailed) => &detailed.buckets,
    };

    let series = |person: Person, color: &str| Dataset {
        label: names.name(person).to_string(),
        values: buckets
            .iter()
            .map(|bucket| bucket.amounts.get(person).to_major())
            .collect(),
        colors: vec![color.to_string()],
    };
    ChartSeries {
        labels: buckets.iter().map(|bucket| bucket.label.clone()).collect(),
        datasets: vec![
            series(Person::A, PERSON_COLORS[0]),
            series(Person::B, PERSON_COLORS[1]),
        ],
    }
}

/// Net per person and combined; the series with temporary entries is only
/// present when enabled.
pub fn net_chart(comparison: &NetComparison, names: &PersonNames) -> ChartSeries {
    let dataset = |label: &str, summary: &NetSummary| Dataset {
        label: label.to_string(),
        values: triple(&summary.net()),
        colors: colors(&PERSON_COLORS),
    };
    let mut datasets = vec![dataset("Without temporary", &comparison.base)];
    if comparison.show_temporary {
        datasets.push(dataset("With temporary", &comparison.with_temporary));
    }
    ChartSeries {
        labels: names.with_total(),
        datasets,
    }
}

pub fn income_chart(summary: &IncomeSummary, names: &PersonNames) -> ChartSeries {
    ChartSeries {
        labels: names.with_total(),
        datasets: vec![
            Dataset {
                label: "Ordinary".to_string(),
                values: triple(&summary.ordinary),
                colors: colors(&INCOME_COLORS),
            },
            Dataset {
                label: "Including temporary".to_string(),
                values: triple(&summary.all),
                colors: colors(&INCOME_COLORS),
            },
        ],
    }
}

pub fn slice_chart(title: &str, slices: &[CategorySlice]) -> ChartSeries {
    ChartSeries {
        labels: slices.iter().map(|slice| slice.label.clone()).collect(),
        datasets: vec![Dataset {
            label: title.to_string(),
            values: slices.iter().map(|slice| slice.amount.to_major()).collect(),
            colors: SLICE_PALETTE
                .iter()
                .cycle()
                .take(slices.len())
                .map(ToString::to_string)
                .collect(),
        }],
    }
}

/// A table line: either a group header or a data row.
///
/// `index` is the row's position in the slice the table was built from,
/// which is the position `EntryStore::reorder_rows` expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TableRow {
    Header {
        group: TopGroup,
        label: &'static str,
        icon: &'static str,
    },
    Data { index: usize, row: BudgetRow },
}

/// Interleaves group headers with their rows.
///
/// Expense groups come in their fixed order, followed by any other group
/// present. Rows keep their relative order within a group.
pub fn table_rows(rows: &[BudgetRow]) -> Vec<TableRow> {
    let mut order: Vec<TopGroup> = TopGroup::EXPENSE_ORDER
        .into_iter()
        .filter(|group| rows.iter().any(|row| row.category.top_group() == *group))
        .collect();
    for row in rows {
        let group = row.category.top_group();
        if !order.contains(&group) {
            order.push(group);
        }
    }

    let mut out = Vec::with_capacity(rows.len() + order.len());
    for group in order {
        out.push(TableRow::Header {
            group,
            label: group.label(),
            icon: group.icon(),
        });
        out.extend(
            rows.iter()
                .enumerate()
                .filter(|(_, row)| row.category.top_group() == group)
                .map(|(index, row)| TableRow::Data {
                    index,
                    row: row.clone(),
                }),
        );
    }
    out
}

/// Rows in their given order, without group headers.
pub fn flat_rows(rows: &[BudgetRow]) -> Vec<TableRow> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| TableRow::Data {
            index,
            row: row.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Category, CostSettings, CostView, EntryFilter, EntryKind, MoneyCents, aggregate,
        aggregate::tests::{cost, income, temporary},
        merge_rows,
    };

    #[test]
    fn total_cost_chart_has_three_bars() {
        let entries = vec![
            cost("Rent", Person::A, 800_000, Category::Rent),
            cost("Rent", Person::B, 700_000, Category::Rent),
        ];
        let settings = CostSettings {
            view: CostView::Total,
            filter: EntryFilter::default(),
        };
        let chart = cost_chart(
            &aggregate::aggregate_costs(&entries, &settings),
            &PersonNames::default(),
        );
        assert_eq!(chart.labels, ["Person A", "Person B", TOTAL_LABEL]);
        assert_eq!(chart.datasets[0].values, [8000.0, 7000.0, 15000.0]);
    }

    #[test]
    fn grouped_cost_chart_has_a_series_per_person() {
        let entries = vec![
            cost("Rent", Person::A, 800_000, Category::Rent),
            cost("Food", Person::B, 300_000, Category::Groceries),
        ];
        let chart = cost_chart(
            &aggregate::aggregate_costs(&entries, &CostSettings::default()),
            &PersonNames::default(),
        );
        assert_eq!(chart.labels, ["Housing & utilities", "Food & household"]);
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].values, [8000.0, 0.0]);
        assert_eq!(chart.datasets[1].values, [0.0, 3000.0]);
    }

    #[test]
    fn net_chart_adds_temporary_series_when_shown() {
        let entries = vec![
            income("Salary", Person::A, 1_000_000),
            temporary(income("Bonus", Person::A, 200_000)),
        ];
        let hidden = net_chart(
            &aggregate::compare_net(&entries, &EntryFilter::default()),
            &PersonNames::default(),
        );
        assert_eq!(hidden.datasets.len(), 1);

        let shown = net_chart(
            &aggregate::compare_net(&entries, &EntryFilter::default().with_temporary(true)),
            &PersonNames::default(),
        );
        assert_eq!(shown.datasets.len(), 2);
        assert_eq!(shown.datasets[1].values[0], 12000.0);
    }

    #[test]
    fn slice_colors_cycle_through_palette() {
        let slices: Vec<CategorySlice> = (0..30)
            .map(|i| CategorySlice {
                label: format!("s{i}"),
                amount: MoneyCents::new(100),
            })
            .collect();
        let chart = slice_chart("Costs per category", &slices);
        let colors = &chart.datasets[0].colors;
        assert_eq!(colors.len(), 30);
        assert_eq!(colors[25], SLICE_PALETTE[0]);
    }

    #[test]
    fn table_interleaves_headers_in_fixed_order() {
        let entries = vec![
            cost("Cinema", Person::A, 1, Category::Entertainment),
            cost("Rent", Person::A, 1, Category::Rent),
            cost("Power", Person::B, 1, Category::Electricity),
            cost("Bus", Person::B, 1, Category::PublicTransport),
        ];
        let table = table_rows(&merge_rows(&entries, EntryKind::Cost));
        let shape: Vec<String> = table
            .iter()
            .map(|row| match row {
                TableRow::Header { label, .. } => format!("# {label}"),
                TableRow::Data { row, .. } => row.title.clone(),
            })
            .collect();
        assert_eq!(
            shape,
            [
                "# Housing & utilities",
                "Power",
                "Rent",
                "# Transport",
                "Bus",
                "# Other",
                "Cinema",
            ]
        );
    }

    #[test]
    fn table_rows_keep_their_merge_position() {
        let entries = vec![
            cost("Cinema", Person::A, 1, Category::Entertainment),
            cost("Rent", Person::A, 1, Category::Rent),
            cost("Power", Person::B, 1, Category::Electricity),
        ];
        let rows = merge_rows(&entries, EntryKind::Cost);
        let positions: Vec<(String, usize)> = table_rows(&rows)
            .into_iter()
            .filter_map(|line| match line {
                TableRow::Data { index, row } => Some((row.title, index)),
                TableRow::Header { .. } => None,
            })
            .collect();
        assert_eq!(
            positions,
            [
                ("Power".to_string(), 1),
                ("Rent".to_string(), 2),
                ("Cinema".to_string(), 0),
            ]
        );
        for (title, index) in &positions {
            assert_eq!(&rows[*index].title, title);
        }
    }

    #[test]
    fn flat_rows_have_no_headers() {
        let entries = vec![
            income("Salary", Person::A, 1),
            income("Child benefit", Person::B, 1),
        ];
        let rows = merge_rows(&entries, EntryKind::Income);
        let flat = flat_rows(&rows);
        assert_eq!(flat.len(), 2);
        assert!(flat.iter().enumerate().all(|(pos, line)| matches!(
            line,
            TableRow::Data { index, .. } if *index == pos
        )));
    }

    #[test]
    fn income_rows_follow_expense_groups() {
        let entries = vec![
            income("Salary", Person::A, 1),
            cost("Rent", Person::A, 1, Category::Rent),
        ];
        let mut rows = merge_rows(&entries, EntryKind::Cost);
        rows.extend(merge_rows(&entries, EntryKind::Income));
        let headers: Vec<TopGroup> = table_rows(&rows)
            .iter()
            .filter_map(|row| match row {
                TableRow::Header { group, .. } => Some(*group),
                TableRow::Data { .. } => None,
            })
            .collect();
        assert_eq!(headers, [TopGroup::Housing, TopGroup::Income]);
    }
}
