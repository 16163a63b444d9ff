use std::collections::HashSet;

use dinnerplan_shared::{Catalog, Day, Dinner, Error, Result};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use time::Date;

use crate::RotationState;

/// Rejection draws allowed per dinner in a category before falling back to
/// an exact scan of the unused dinners.
pub const DEFAULT_RETRY_FACTOR: usize = 8;

/// Largest retry factor a selector accepts.
pub const MAX_RETRY_FACTOR: usize = 1024;

const DRAW_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Which day gets which category.
///
/// `fixed_day` always draws from `fixed_category`. The other `days` each get
/// one of `categories`, shuffled every week.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WeekPlan {
    pub fixed_day: Day,
    pub fixed_category: String,
    pub days: Vec<Day>,
    pub categories: Vec<String>,
}

impl Default for WeekPlan {
    fn default() -> Self {
        Self {
            fixed_day: Day::Sunday,
            fixed_category: "soup".to_owned(),
            days: vec![Day::Monday, Day::Tuesday, Day::Wednesday, Day::Thursday],
            categories: vec![
                "noodles-rice".to_owned(),
                "pasta".to_owned(),
                "bread-y".to_owned(),
                "Salad".to_owned(),
            ],
        }
    }
}

impl WeekPlan {
    pub fn validate(&self) -> Result<()> {
        if self.days.len() != self.categories.len() {
            dinnerplan_shared::bail!(
                "{} days but {} categories, each day needs exactly one category",
                self.days.len(),
                self.categories.len()
            );
        }

        if self.fixed_category.trim().is_empty() {
            dinnerplan_shared::bail!("fixed category must not be empty");
        }

        let mut days = HashSet::from([self.fixed_day]);
        for day in &self.days {
            if !days.insert(*day) {
                dinnerplan_shared::bail!("{day} is scheduled more than once");
            }
        }

        let mut categories = HashSet::new();
        for category in &self.categories {
            if category.trim().is_empty() {
                dinnerplan_shared::bail!("category names must not be empty");
            }

            if !categories.insert(category.as_str()) {
                dinnerplan_shared::bail!("category {category} is used more than once");
            }
        }

        Ok(())
    }

    /// Number of dinners one week needs.
    pub fn dinner_count(&self) -> usize {
        self.days.len() + 1
    }

    /// Every category the plan draws from, fixed category first.
    pub fn all_categories(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.fixed_category.as_str())
            .chain(self.categories.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDinner {
    pub day: Day,
    pub dinner: Dinner,
}

/// Dinners chosen for one week, fixed day first then the other days in
/// plan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub week_start: Date,
    pub days: Vec<DayDinner>,
}

impl Assignment {
    pub fn get(&self, day: Day) -> Option<&Dinner> {
        self.days.iter().find(|d| d.day == day).map(|d| &d.dinner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayDinner> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Uniform pick among every dinner in `category`.
pub fn pick_from_category<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    category: &str,
    rng: &mut R,
) -> Result<&'a Dinner> {
    catalog
        .category(category)
        .choose(rng)
        .ok_or_else(|| Error::EmptyCategory(category.to_owned()))
}

/// Pick a dinner from `category` that the rotation has not served this week
/// or last week.
///
/// Draws by rejection at most `len * retry_factor` times. If that runs out,
/// the unused dinners are scanned directly: one of them is picked uniformly,
/// or `NoUnusedDinner` is returned when there are none.
pub fn pick_unused_from_category<R: Rng + ?Sized>(
    catalog: &Catalog,
    state: &RotationState,
    category: &str,
    retry_factor: usize,
    rng: &mut R,
) -> Result<Dinner> {
    let attempts = catalog
        .category(category)
        .len()
        .saturating_mul(retry_factor.max(1));

    for attempt in 1..=attempts {
        let dinner = pick_from_category(catalog, category, rng)?;
        if !state.is_already_selected(&dinner.name) {
            tracing::debug!(category, dinner = %dinner.name, attempt, "dinner drawn");
            return Ok(dinner.clone());
        }
    }

    // Also covers an empty or unknown category, where no draw was made
    let unused = catalog
        .category(category)
        .iter()
        .filter(|dinner| !state.is_already_selected(&dinner.name))
        .collect::<Vec<_>>();

    match unused.choose(rng) {
        Some(dinner) => {
            tracing::debug!(category, dinner = %dinner.name, attempts, "dinner picked after scan");
            Ok((*dinner).clone())
        }
        None if attempts == 0 => Err(Error::EmptyCategory(category.to_owned())),
        None => Err(Error::NoUnusedDinner {
            category: category.to_owned(),
            attempts,
        }),
    }
}

/// Fisher-Yates shuffle of the category list.
pub fn shuffle_categories<R: Rng + ?Sized>(categories: &[String], rng: &mut R) -> Vec<String> {
    let mut shuffled = categories.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Picks a week of dinners.
///
/// The category shuffle and the dinner draws use separate random sources so
/// either can be pinned independently.
pub struct Selector<S = StdRng, D = StdRng> {
    shuffle_rng: S,
    draw_rng: D,
    retry_factor: usize,
}

impl Selector {
    /// Deterministic selector, both random sources derived from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(
            StdRng::seed_from_u64(seed),
            StdRng::seed_from_u64(seed ^ DRAW_STREAM),
        )
    }

    /// Selector seeded from the thread-local generator, so consecutive runs
    /// differ.
    pub fn from_entropy() -> Self {
        let mut rng = rand::rng();

        Self::new(StdRng::from_rng(&mut rng), StdRng::from_rng(&mut rng))
    }
}

impl<S: Rng, D: Rng> Selector<S, D> {
    pub fn new(shuffle_rng: S, draw_rng: D) -> Self {
        Self {
            shuffle_rng,
            draw_rng,
            retry_factor: DEFAULT_RETRY_FACTOR,
        }
    }

    pub fn with_retry_factor(mut self, retry_factor: usize) -> Self {
        self.retry_factor = retry_factor.clamp(1, MAX_RETRY_FACTOR);
        self
    }

    pub fn retry_factor(&self) -> usize {
        self.retry_factor
    }

    pub fn pick_unused(
        &mut self,
        catalog: &Catalog,
        state: &RotationState,
        category: &str,
    ) -> Result<Dinner> {
        pick_unused_from_category(
            catalog,
            state,
            category,
            self.retry_factor,
            &mut self.draw_rng,
        )
    }

    /// Select one dinner per planned day and record each in `state`.
    ///
    /// Every pick is recorded before the next one is drawn, so a week never
    /// repeats a dinner. `state` is only updated when the whole week was
    /// selected.
    pub fn select_week(
        &mut self,
        catalog: &Catalog,
        state: &mut RotationState,
        plan: &WeekPlan,
    ) -> Result<Assignment> {
        plan.validate()?;

        tracing::debug!(
            week_start = %state.week_start,
            excluded = state.excluded_count(),
            "selecting week"
        );

        let mut draft = state.clone();
        let mut days = Vec::with_capacity(plan.dinner_count());

        let dinner = self.pick_unused(catalog, &draft, &plan.fixed_category)?;
        draft.add_selection(dinner.clone());
        days.push(DayDinner {
            day: plan.fixed_day,
            dinner,
        });

        let categories = shuffle_categories(&plan.categories, &mut self.shuffle_rng);

        for (day, category) in plan.days.iter().zip(categories.iter()) {
            let dinner = self.pick_unused(catalog, &draft, category)?;
            draft.add_selection(dinner.clone());
            days.push(DayDinner { day: *day, dinner });
        }

        for entry in &days {
            tracing::info!(
                day = %entry.day,
                category = %entry.dinner.category,
                dinner = %entry.dinner.name,
                "dinner selected"
            );
        }

        *state = draft;

        Ok(Assignment {
            week_start: state.week_start,
            days,
        })
    }
}
