use engine::{
    BudgetSettings, DonutMode, DonutOptions, EntryKind, EntryPatch, EntryStore, JsonFileStorage,
    NewEntry, PersonAmounts, RowDraft, aggregate_costs, category_groups, category_slices,
    compare_net, find_row, income_summary, merge_rows, row_totals,
    views::{self, PersonNames},
};

use crate::{
    cli::{AddArgs, ChartArg, Command, FlagArg, SaveRowArgs, SettingsCommand, UpdateArgs},
    error::{AppError, Result},
    report,
};

pub struct Context {
    pub store: EntryStore,
    pub storage: JsonFileStorage,
    pub names: PersonNames,
}

pub async fn run(ctx: &Context, command: Command) -> Result<String> {
    match command {
        Command::Add(args) => add(ctx, args).await,
        Command::Update(args) => update(ctx, args).await,
        Command::Remove { id } => {
            ctx.store.remove(&id).await?;
            Ok(format!("removed {id}\n"))
        }
        Command::List { kind } => Ok(list(ctx, kind.into())),
        Command::SaveRow(args) => save_row(ctx, args).await,
        Command::DeleteRow { kind, title } => {
            let rows = merge_rows(ctx.store.snapshot().entries(), kind.into());
            let row = find_row(&rows, &title)
                .ok_or_else(|| AppError::Usage(format!("no row titled '{title}'")))?;
            ctx.store.delete_row(row).await?;
            Ok(format!("deleted row '{}'\n", row.title))
        }
        Command::Reorder { kind, from, to } => {
            let kind = kind.into();
            let rows = merge_rows(ctx.store.snapshot().entries(), kind);
            ctx.store.reorder_rows(&rows, from, to).await?;
            Ok(list(ctx, kind))
        }
        Command::Costs { view, drill } => {
            let mut settings = BudgetSettings::load(&ctx.storage)?.cost;
            if let Some(view) = view {
                settings.view = view.into();
            }
            let snapshot = ctx.store.snapshot();
            let breakdown = aggregate_costs(snapshot.entries(), &settings);
            match drill {
                Some(label) => match breakdown.items_for(&label) {
                    Some(items) => Ok(report::render_items(&label, items, &ctx.names)),
                    None => Err(AppError::Usage(format!("no items behind '{label}'"))),
                },
                None => Ok(report::render_chart(
                    &format!("Costs ({})", settings.view),
                    &views::cost_chart(&breakdown, &ctx.names),
                )),
            }
        }
        Command::Net => {
            let filter = BudgetSettings::load(&ctx.storage)?.total;
            let comparison = compare_net(ctx.store.snapshot().entries(), &filter);
            Ok(report::render_chart(
                "Result",
                &views::net_chart(&comparison, &ctx.names),
            ))
        }
        Command::Income => {
            let summary = income_summary(ctx.store.snapshot().entries());
            Ok(report::render_chart(
                "Income",
                &views::income_chart(&summary, &ctx.names),
            ))
        }
        Command::Categories { kind } => Ok(report::render_categories(&category_groups(
            kind.into(),
        ))),
        Command::Donut {
            preset,
            exclude_temporary,
        } => {
            let include_temporary = !exclude_temporary;
            let (title, options) = match preset {
                Some(preset) => (
                    "Costs per group",
                    engine::GroupPreset::from(preset).options(include_temporary),
                ),
                None => (
                    "Costs per category",
                    DonutOptions {
                        mode: DonutMode::Detailed,
                        include_temporary,
                        ..DonutOptions::default()
                    },
                ),
            };
            let slices = category_slices(ctx.store.snapshot().entries(), &options);
            Ok(report::render_chart(
                title,
                &views::slice_chart(title, &slices),
            ))
        }
        Command::Settings { command } => settings(ctx, command),
    }
}

async fn add(ctx: &Context, args: AddArgs) -> Result<String> {
    let kind: EntryKind = args.kind.into();
    let new_entry = NewEntry {
        kind,
        title: args.title,
        amount: args.amount,
        person: args.person.into(),
        category: args
            .category
            .unwrap_or_else(|| engine::Category::default_for(kind)),
        temporary: args.temporary.then_some(true),
        sort: args.sort,
    };
    let id = ctx.store.add(&new_entry).await?;
    Ok(format!("{id}\n"))
}

async fn update(ctx: &Context, args: UpdateArgs) -> Result<String> {
    let patch = EntryPatch {
        kind: args.kind.map(Into::into),
        title: args.title,
        amount: args.amount,
        person: args.person.map(Into::into),
        category: args.category,
        temporary: args.temporary,
        sort: args.sort,
    };
    ctx.store.update(&args.id, &patch).await?;
    Ok(format!("updated {}\n", args.id))
}

async fn save_row(ctx: &Context, args: SaveRowArgs) -> Result<String> {
    let kind: EntryKind = args.kind.into();
    let rows = merge_rows(ctx.store.snapshot().entries(), kind);
    let existing = find_row(&rows, &args.title);

    let category = args
        .category
        .or(existing.map(|row| row.category))
        .unwrap_or_else(|| engine::Category::default_for(kind));
    let draft = RowDraft {
        title: args.rename.unwrap_or(args.title),
        category,
        amounts: PersonAmounts::new(args.amount_a, args.amount_b),
        temporary: args.temporary,
    };
    ctx.store.save_row(kind, &draft, existing).await?;
    Ok(format!("saved row '{}'\n", draft.title))
}

/// The `#` column is the row's index in sort order, as `reorder` takes it.
fn list(ctx: &Context, kind: EntryKind) -> String {
    let rows = merge_rows(ctx.store.snapshot().entries(), kind);
    let table = match kind {
        EntryKind::Cost => views::table_rows(&rows),
        EntryKind::Income => views::flat_rows(&rows),
    };
    report::render_table(&table, &row_totals(&rows), &ctx.names)
}

fn settings(ctx: &Context, command: SettingsCommand) -> Result<String> {
    let mut settings = BudgetSettings::load(&ctx.storage)?;
    match command {
        SettingsCommand::Show => return Ok(report::render_settings(&settings)),
        SettingsCommand::View { view } => settings.cost.view = view.into(),
        SettingsCommand::Toggle { chart, flag, value } => {
            let filter = match chart {
                ChartArg::Cost => &mut settings.cost.filter,
                ChartArg::Total => &mut settings.total,
            };
            let slot = match flag {
                FlagArg::Temporary => &mut filter.include_temporary,
                FlagArg::Amortization => &mut filter.include_amortization_as_expense,
                FlagArg::Savings => &mut filter.include_savings_as_expense,
            };
            *slot = value.unwrap_or(!*slot);
        }
    }
    settings.save(&ctx.storage)?;
    tracing::info!("saved view preferences");
    Ok(report::render_settings(&settings))
}

#[cfg(test)]
mod tests {
    use engine::{Category, MoneyCents, Person};
    use migration::{Migrator, MigratorTrait};

    use super::*;
    use crate::cli::KindArg;

    async fn context() -> Context {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let store = EntryStore::builder().database(db).build().await.unwrap();
        Context {
            store,
            storage: JsonFileStorage::new(std::env::temp_dir().join("hemkassa-commands-tests")),
            names: PersonNames::default(),
        }
    }

    async fn seed(ctx: &Context, title: &str, category: Category, sort: i64) {
        ctx.store
            .add(&NewEntry {
                kind: EntryKind::Cost,
                title: title.to_string(),
                amount: MoneyCents::from_crowns(100),
                person: Person::A,
                category,
                temporary: None,
                sort: Some(sort),
            })
            .await
            .unwrap();
    }

    fn listed_index(output: &str, title: &str) -> usize {
        output
            .lines()
            .find_map(|line| {
                let mut parts = line.split_whitespace();
                let index = parts.next()?;
                (parts.next()? == title).then(|| index.parse().ok())?
            })
            .unwrap()
    }

    fn titles_in_sort_order(ctx: &Context) -> Vec<String> {
        merge_rows(ctx.store.snapshot().entries(), EntryKind::Cost)
            .into_iter()
            .map(|row| row.title)
            .collect()
    }

    #[tokio::test]
    async fn reorder_moves_the_row_numbered_in_the_list() {
        let ctx = context().await;
        seed(&ctx, "Cinema", Category::Entertainment, 100).await;
        seed(&ctx, "Rent", Category::Rent, 200).await;
        seed(&ctx, "Power", Category::Electricity, 300).await;

        let listed = run(&ctx, Command::List { kind: KindArg::Cost })
            .await
            .unwrap();
        let rent = listed_index(&listed, "Rent");
        assert_eq!(rent, 1);
        assert_eq!(listed_index(&listed, "Cinema"), 0);

        let relisted = run(
            &ctx,
            Command::Reorder {
                kind: KindArg::Cost,
                from: rent,
                to: 2,
            },
        )
        .await
        .unwrap();

        assert_eq!(titles_in_sort_order(&ctx), ["Cinema", "Power", "Rent"]);
        assert_eq!(listed_index(&relisted, "Rent"), 2);
        assert_eq!(listed_index(&relisted, "Power"), 1);
    }

    #[tokio::test]
    async fn income_list_has_no_group_headers() {
        let ctx = context().await;
        ctx.store
            .add(&NewEntry {
                kind: EntryKind::Income,
                title: "Salary".to_string(),
                amount: MoneyCents::from_crowns(30_000),
                person: Person::B,
                category: Category::Salary,
                temporary: None,
                sort: None,
            })
            .await
            .unwrap();

        let listed = run(&ctx, Command::List { kind: KindArg::Income })
            .await
            .unwrap();
        assert!(!listed.contains('['));
        assert_eq!(listed_index(&listed, "Salary"), 0);
    }
}
