use std::collections::BTreeMap;

use serde::Serialize;

use super::{Bucket, BucketKey, GroupItem, PersonAmounts, TitleBuckets, counts_as_cost};
use crate::{Entry, EntryFilter, MoneyCents, TopGroup};

/// Groups with a combined total below this are folded into `Other`.
pub const GROUP_THRESHOLD: MoneyCents = MoneyCents::new(50_000);

/// Items behind one emitted group bar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupDrillDown {
    pub group: TopGroup,
    pub label: String,
    pub items: Vec<GroupItem>,
}

/// Cost per top-group, largest first with `Other` last.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupedCosts {
    pub buckets: Vec<Bucket>,
    pub groups: Vec<GroupDrillDown>,
}

impl GroupedCosts {
    pub fn items_for(&self, label: &str) -> Option<&[GroupItem]> {
        self.groups
            .iter()
            .find(|group| group.label == label && !group.items.is_empty())
            .map(|group| group.items.as_slice())
    }

    pub fn total(&self) -> PersonAmounts {
        self.buckets
            .iter()
            .fold(PersonAmounts::ZERO, |acc, bucket| acc + bucket.amounts)
    }
}

/// Sums costs per top-group and person.
///
/// Every group other than `Other` whose combined total is below
/// [`GROUP_THRESHOLD`] is merged, titles included, into `Other`. `Other`
/// is never dissolved and is only emitted when its total is positive.
/// Equal totals keep the [`TopGroup`] declaration order.
pub fn grouped_costs(entries: &[Entry], filter: &EntryFilter) -> GroupedCosts {
    let mut by_group: BTreeMap<TopGroup, TitleBuckets> = BTreeMap::new();
    for entry in entries.iter().filter(|entry| counts_as_cost(entry, filter)) {
        by_group
            .entry(entry.category.top_group())
            .or_default()
            .add(entry);
    }

    let mut other = by_group.remove(&TopGroup::Other).unwrap_or_default();
    let mut kept = Vec::new();
    for (group, titles) in by_group {
        if titles.sum().total() < GROUP_THRESHOLD {
            other.absorb(titles);
        } else {
            kept.push((group, titles));
        }
    }
    kept.sort_by(|(_, left), (_, right)| right.sum().total().cmp(&left.sum().total()));

    let other_total = other.sum();
    if other_total.total().is_positive() {
        kept.push((TopGroup::Other, other));
    }

    let mut grouped = GroupedCosts::default();
    for (group, titles) in kept {
        grouped.buckets.push(Bucket {
            key: BucketKey::Group(group),
            label: group.label().to_string(),
            amounts: titles.sum(),
        });
        grouped.groups.push(GroupDrillDown {
            group,
            label: group.label().to_string(),
            items: titles.sorted_items(),
        });
    }
    grouped
}
