//! Static category taxonomy.
//!
//! Every leaf [`Category`] belongs to exactly one [`TopGroup`]. Keys are
//! dot paths (`group.leaf`) and are what gets persisted; the mapping is
//! fixed at compile time so re-aggregating the same entries always lands
//! them in the same groups.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{EngineError, EntryKind};

/// Highest-level grouping of categories.
///
/// The declaration order is the display order of expense groups and the
/// deterministic tie-break used by the grouped cost view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopGroup {
    Housing,
    Food,
    Transport,
    Finance,
    Savings,
    Family,
    Other,
    Income,
}

impl TopGroup {
    pub const ALL: [TopGroup; 8] = [
        TopGroup::Housing,
        TopGroup::Food,
        TopGroup::Transport,
        TopGroup::Finance,
        TopGroup::Savings,
        TopGroup::Family,
        TopGroup::Other,
        TopGroup::Income,
    ];

    /// Stable order of the cost groups in tables and category pickers.
    pub const EXPENSE_ORDER: [TopGroup; 7] = [
        TopGroup::Housing,
        TopGroup::Food,
        TopGroup::Transport,
        TopGroup::Finance,
        TopGroup::Savings,
        TopGroup::Family,
        TopGroup::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Finance => "finance",
            Self::Savings => "savings",
            Self::Family => "family",
            Self::Other => "other",
            Self::Income => "income",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Housing => "Housing & utilities",
            Self::Food => "Food & household",
            Self::Transport => "Transport",
            Self::Finance => "Finance",
            Self::Savings => "Savings",
            Self::Family => "Family & personal",
            Self::Other => "Other",
            Self::Income => "Income",
        }
    }

    /// Material icon name shown next to the group header.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Housing => "home",
            Self::Food => "dining",
            Self::Transport => "directions_car",
            Self::Finance => "account_balance",
            Self::Savings => "savings",
            Self::Family => "family_group",
            Self::Other => GENERIC_ICON,
            Self::Income => "payments",
        }
    }

    /// Leaf categories of this group in declaration order.
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(move |category| category.top_group() == self)
    }
}

impl fmt::Display for TopGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Icon used for anything that cannot be placed in a known group.
pub const GENERIC_ICON: &str = "category";

/// Declares the leaf categories together with their key, label and group so
/// the three lookups can never drift apart.
macro_rules! taxonomy {
    ($($variant:ident => ($key:literal, $label:literal, $group:ident)),+ $(,)?) => {
        /// Leaf category attached to an entry.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Category {
            $($variant,)+
        }

        impl Category {
            pub const ALL: &'static [Category] = &[$(Category::$variant,)+];

            /// Persisted dot-path key.
            pub fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            /// Human readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// The top-group this leaf belongs to.
            pub fn top_group(self) -> TopGroup {
                match self {
                    $(Self::$variant => TopGroup::$group,)+
                }
            }
        }

        impl FromStr for Category {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($key => Ok(Self::$variant),)+
                    other => Err(EngineError::InvalidCategory(format!(
                        "unknown category: {other}"
                    ))),
                }
            }
        }
    };
}

taxonomy! {
    Rent => ("housing.rent", "Rent & fees", Housing),
    Electricity => ("housing.electricity", "Electricity", Housing),
    WaterSewer => ("housing.water_sewer", "Water & sewer", Housing),
    Heating => ("housing.heating", "Heating", Housing),
    HomeMaintenance => ("housing.maintenance", "Home maintenance", Housing),
    Furniture => ("housing.furniture", "Furniture & appliances", Housing),
    Garden => ("housing.garden", "Garden & outdoor", Housing),

    Groceries => ("food.groceries", "Groceries", Food),
    DiningOut => ("food.dining_out", "Dining out", Food),
    Household => ("food.household", "Household supplies", Food),

    Fuel => ("transport.fuel", "Fuel", Transport),
    VehicleMaintenance => ("transport.vehicle_maintenance", "Vehicle service", Transport),
    VehicleTaxTollsParking => ("transport.tax_tolls_parking", "Tax, tolls & parking", Transport),
    PublicTransport => ("transport.public", "Public transport", Transport),

    LoanInterest => ("finance.loan_interest", "Loan interest", Finance),
    LoanAmortization => ("finance.loan_amortization", "Loan amortization", Finance),
    Insurance => ("finance.insurance", "Insurance", Finance),
    BankFees => ("finance.bank_fees", "Bank fees", Finance),
    It => ("finance.it", "IT", Finance),
    Subscriptions => ("finance.subscriptions", "Subscriptions", Finance),

    SavingsGeneral => ("savings.general", "Savings", Savings),
    SavingsBuffer => ("savings.buffer", "Buffer", Savings),
    SavingsPension => ("savings.pension", "Pension", Savings),
    SavingsChildren => ("savings.children", "Children's savings", Savings),

    Children => ("family.children", "Children", Family),
    Pets => ("family.pets", "Pets", Family),
    Clothing => ("family.clothing", "Clothing", Family),
    Healthcare => ("family.healthcare", "Healthcare", Family),
    Pharmacy => ("family.pharmacy", "Pharmacy", Family),
    Dental => ("family.dental", "Dental care", Family),
    Beauty => ("family.beauty", "Beauty", Family),
    SportsGym => ("family.sports_gym", "Sports & gym", Family),

    Entertainment => ("other.entertainment", "Entertainment", Other),
    Hobbies => ("other.hobbies", "Hobbies", Other),
    Travel => ("other.travel", "Travel & holiday", Other),
    GiftsCharity => ("other.gifts_charity", "Gifts & charity", Other),
    Other => ("other.other", "Other", Other),

    IncomeGeneral => ("income.general", "Income", Income),
    Salary => ("income.salary", "Salary", Income),
    Benefits => ("income.benefits", "Benefits", Income),
    IncomeOther => ("income.other", "Other income", Income),
}

impl Category {
    /// Whether this leaf counts as loan amortization, which cost views can
    /// exclude.
    pub fn is_amortization(self) -> bool {
        self == Self::LoanAmortization
    }

    /// Whether this leaf sits under the savings group.
    pub fn is_savings(self) -> bool {
        self.top_group() == TopGroup::Savings
    }

    pub fn icon(self) -> &'static str {
        self.top_group().icon()
    }

    /// Default pick for a new entry of the given kind.
    pub fn default_for(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Income => Self::IncomeGeneral,
            EntryKind::Cost => Self::Rent,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

/// A labelled set of categories, used to build category pickers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryGroup {
    pub group: TopGroup,
    pub label: &'static str,
    pub items: Vec<Category>,
}

/// Categories selectable for an entry of `kind`, grouped by top-group.
///
/// Cost categories follow [`TopGroup::EXPENSE_ORDER`]; income categories sit
/// under the single income group.
pub fn category_groups(kind: EntryKind) -> Vec<CategoryGroup> {
    let groups: &[TopGroup] = match kind {
        EntryKind::Income => &[TopGroup::Income],
        EntryKind::Cost => &TopGroup::EXPENSE_ORDER,
    };
    groups
        .iter()
        .map(|&group| CategoryGroup {
            group,
            label: group.label(),
            items: group.categories().collect(),
        })
        .filter(|group| !group.items.is_empty())
        .collect()
}
