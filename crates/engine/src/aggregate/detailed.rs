use serde::Serialize;

use super::{Bucket, BucketKey, GroupItem, PersonAmounts, TitleBuckets, counts_as_cost, sort_items};
use crate::{
    Entry, EntryFilter, MoneyCents, Person,
    util::{compare_titles, normalize_title},
};

/// Per-person title amounts below this move to the "Other" bucket.
pub const DETAIL_THRESHOLD: MoneyCents = MoneyCents::new(30_000);

/// Cost per title, with small per-person amounts rolled up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailedCosts {
    pub buckets: Vec<Bucket>,
    /// Titles whose amounts were moved, with only the moved part.
    pub others: Vec<GroupItem>,
    pub others_label: String,
}

impl Default for DetailedCosts {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
            others: Vec::new(),
            others_label: others_label(),
        }
    }
}

fn others_label() -> String {
    format!("Other (< {} kr)", DETAIL_THRESHOLD.major_rounded())
}

/// Sums costs per normalized title and person.
///
/// Each person's amount is checked on its own: a positive amount below
/// [`DETAIL_THRESHOLD`] leaves the title and is added to the "Other"
/// bucket for that person, while the other person's amount stays.
pub fn detailed_costs(entries: &[Entry], filter: &EntryFilter) -> DetailedCosts {
    let mut titles = TitleBuckets::default();
    for entry in entries.iter().filter(|entry| counts_as_cost(entry, filter)) {
        titles.add(entry);
    }

    let mut others_sum = PersonAmounts::ZERO;
    let mut others = Vec::new();
    for (_, item) in titles.iter_mut() {
        let mut moved = PersonAmounts::ZERO;
        for person in Person::BOTH {
            let amount = item.amounts.get(person);
            if amount.is_positive() && amount < DETAIL_THRESHOLD {
                moved.set(person, amount);
                item.amounts.set(person, MoneyCents::ZERO);
            }
        }
        if !moved.is_zero() {
            others_sum += moved;
            others.push(GroupItem {
                title: item.title.clone(),
                amounts: moved,
            });
        }
    }
    sort_items(&mut others);

    let mut visible: Vec<GroupItem> = titles
        .into_items()
        .map(|(_, item)| item)
        .filter(|item| item.amounts.total().is_positive())
        .collect();
    visible.sort_by(|left, right| {
        right
            .amounts
            .total()
            .cmp(&left.amounts.total())
            .then_with(|| compare_titles(&left.title, &right.title))
    });

    let mut buckets: Vec<Bucket> = visible
        .into_iter()
        .map(|item| Bucket {
            key: BucketKey::Title(normalize_title(&item.title)),
            label: item.title,
            amounts: item.amounts,
        })
        .collect();

    let others_label = others_label();
    if others_sum.total().is_positive() {
        buckets.push(Bucket {
            key: BucketKey::Other,
            label: others_label.clone(),
            amounts: others_sum,
        });
    }

    DetailedCosts {
        buckets,
        others,
        others_label,
    }
}
