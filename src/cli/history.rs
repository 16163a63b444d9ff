use dinnerplan_mealplan::{JsonFileStore, RotationState, RotationStore, week_boundary};
use time::OffsetDateTime;

use crate::config::Config;

/// The stored rotation as a run at `now` would see it. The rollover is only
/// applied in memory; nothing is written back.
pub fn history(config: &Config, now: OffsetDateTime) -> anyhow::Result<RotationState> {
    let first_day = config.calendar.week_starts_on.weekday();
    let store = JsonFileStore::new(&config.paths.state);

    let mut state = store.load(week_boundary(now, first_day))?;
    state.check_new_week(now, first_day);

    Ok(state)
}

pub fn run(config: Config) -> anyhow::Result<()> {
    let now = dinnerplan_mealplan::now(config.calendar.timezone.as_deref());
    let state = history(&config, now)?;

    print!("{}", crate::menu::render_history(&state)?);

    Ok(())
}
