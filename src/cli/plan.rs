use dinnerplan_mealplan::{
    Assignment, JsonFileStore, RotationStore, Selector, WeekPlan, week_boundary,
};
use dinnerplan_shared::{Catalog, Result};
use time::{OffsetDateTime, Weekday};

use crate::config::Config;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Fixed seed for a reproducible week
    pub seed: Option<u64>,
    /// Select and print without saving the rotation
    pub dry_run: bool,
}

/// Load the rotation, roll it over if the week changed, select the week and
/// save it.
///
/// Nothing is saved unless the whole week was selected, so a failed run
/// leaves the stored rotation exactly as it was.
pub fn plan_week(
    catalog: &Catalog,
    store: &mut impl RotationStore,
    selector: &mut Selector,
    plan: &WeekPlan,
    first_day: Weekday,
    now: OffsetDateTime,
    persist: bool,
) -> Result<Assignment> {
    let mut state = store.load(week_boundary(now, first_day))?;
    state.check_new_week(now, first_day);

    let assignment = selector.select_week(catalog, &mut state, plan)?;

    if persist {
        store.save(&state)?;
    }

    Ok(assignment)
}

/// Plan the week containing `now` using the files named in `config`.
pub fn plan(config: &Config, options: PlanOptions, now: OffsetDateTime) -> anyhow::Result<Assignment> {
    // Catalog first: a bad catalog must fail before the rotation is touched.
    let catalog = crate::catalog::load(&config.paths.catalog)?;
    let mut store = JsonFileStore::new(&config.paths.state);

    let mut selector = match options.seed {
        Some(seed) => Selector::from_seed(seed),
        None => Selector::from_entropy(),
    }
    .with_retry_factor(config.selection.retry_factor);

    let assignment = plan_week(
        &catalog,
        &mut store,
        &mut selector,
        &config.plan,
        config.calendar.week_starts_on.weekday(),
        now,
        !options.dry_run,
    )
    .inspect_err(|err| {
        if err.is_exhaustion() {
            tracing::warn!(
                "catalog has too few dinners in a category to avoid repeating the last two weeks"
            );
        }
    })?;

    if options.dry_run {
        tracing::info!("dry run, rotation not saved");
    }

    Ok(assignment)
}

pub fn run(config: Config, options: PlanOptions) -> anyhow::Result<()> {
    let now = dinnerplan_mealplan::now(config.calendar.timezone.as_deref());
    let assignment = plan(&config, options, now)?;

    print!(
        "{}",
        crate::menu::render(&assignment, config.calendar.week_starts_on)?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinnerplan_mealplan::{MemoryStore, RotationState};
    use dinnerplan_shared::{Dinner, Error};
    use time::macros::{date, datetime};

    fn catalog() -> Catalog {
        let mut dinners = Vec::new();
        for category in ["soup", "noodles-rice", "pasta", "bread-y", "Salad"] {
            for n in 1..=3 {
                dinners.push(Dinner::new(format!("{category} {n}"), category));
            }
        }
        dinners.into_iter().collect()
    }

    #[test]
    fn test_plan_week_saves_once() {
        let mut store = MemoryStore::new();
        let mut selector = Selector::from_seed(7);

        let assignment = plan_week(
            &catalog(),
            &mut store,
            &mut selector,
            &WeekPlan::default(),
            Weekday::Sunday,
            datetime!(2026-10-14 18:00 UTC),
            true,
        )
        .unwrap();

        assert_eq!(assignment.len(), 5);
        assert_eq!(assignment.week_start, date!(2026 - 10 - 11));
        assert_eq!(store.save_count(), 1);

        let saved = store.load(date!(2026 - 10 - 11)).unwrap();
        assert_eq!(saved.current_week.len(), 5);
    }

    #[test]
    fn test_plan_week_without_persist() {
        let mut store = MemoryStore::new();
        let mut selector = Selector::from_seed(7);

        plan_week(
            &catalog(),
            &mut store,
            &mut selector,
            &WeekPlan::default(),
            Weekday::Sunday,
            datetime!(2026-10-14 18:00 UTC),
            false,
        )
        .unwrap();

        assert_eq!(store.save_count(), 0);
        assert!(store.record().is_none());
    }

    #[test]
    fn test_plan_week_rolls_over_stale_state() {
        let mut stale = RotationState::new(date!(2026 - 10 - 04));
        stale.add_selection(Dinner::new("soup 1", "soup"));
        let mut store = MemoryStore::with_state(&stale).unwrap();
        let mut selector = Selector::from_seed(3);

        plan_week(
            &catalog(),
            &mut store,
            &mut selector,
            &WeekPlan::default(),
            Weekday::Sunday,
            datetime!(2026-10-14 18:00 UTC),
            true,
        )
        .unwrap();

        let saved = store.load(date!(2026 - 10 - 11)).unwrap();
        assert_eq!(saved.week_start, date!(2026 - 10 - 11));
        assert_eq!(saved.previous_week, vec![Dinner::new("soup 1", "soup")]);
        assert!(!saved.current_week.iter().any(|d| d.name == "soup 1"));
    }

    #[test]
    fn test_plan_week_failure_does_not_save() {
        let mut store = MemoryStore::new();
        let mut selector = Selector::from_seed(1);
        let plan = WeekPlan {
            fixed_category: "stew".to_owned(),
            ..WeekPlan::default()
        };

        let err = plan_week(
            &catalog(),
            &mut store,
            &mut selector,
            &plan,
            Weekday::Sunday,
            datetime!(2026-10-14 18:00 UTC),
            true,
        )
        .unwrap_err();

        assert!(matches!(err, Error::EmptyCategory(category) if category == "stew"));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_plan_week_rejects_corrupt_record() {
        let mut store = MemoryStore::with_record("{\"week_start\": 12");
        let mut selector = Selector::from_seed(1);

        let err = plan_week(
            &catalog(),
            &mut store,
            &mut selector,
            &WeekPlan::default(),
            Weekday::Sunday,
            datetime!(2026-10-14 18:00 UTC),
            true,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Persistence { .. }));
        assert_eq!(store.record(), Some("{\"week_start\": 12"));
    }
}
