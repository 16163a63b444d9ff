use anyhow::{Context, Result};
use askama::Template;
use dinnerplan_mealplan::{Assignment, DayDinner, RotationState};
use dinnerplan_shared::{Day, Dinner};
use time::{Date, macros::format_description};

/// Weekly menu, one block per day with its ingredients indented below
#[derive(Template)]
#[template(path = "menu.txt")]
struct MenuTemplate<'a> {
    week_of: String,
    entries: Vec<&'a DayDinner>,
}

/// Persisted rotation as the next run will see it
#[derive(Template)]
#[template(path = "history.txt")]
struct HistoryTemplate<'a> {
    week_of: String,
    current: &'a [Dinner],
    previous: &'a [Dinner],
}

pub fn week_of(date: Date) -> Result<String> {
    date.format(format_description!(
        "[month repr:long] [day padding:none], [year]"
    ))
    .context("Failed to format week start")
}

/// Render the menu in calendar order for a week starting on `first_day`.
pub fn render(assignment: &Assignment, first_day: Day) -> Result<String> {
    let mut entries = assignment.iter().collect::<Vec<_>>();
    entries.sort_by_key(|entry| entry.day.position_from(first_day));

    let template = MenuTemplate {
        week_of: week_of(assignment.week_start)?,
        entries,
    };

    template.render().context("Failed to render menu template")
}

pub fn render_history(state: &RotationState) -> Result<String> {
    let template = HistoryTemplate {
        week_of: week_of(state.week_start)?,
        current: &state.current_week,
        previous: &state.previous_week,
    };

    template
        .render()
        .context("Failed to render history template")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn assignment() -> Assignment {
        Assignment {
            week_start: date!(2026 - 10 - 11),
            days: vec![
                DayDinner {
                    day: Day::Sunday,
                    dinner: Dinner::new("Pho", "soup")
                        .with_ingredients(["rice noodles", "beef broth"]),
                },
                DayDinner {
                    day: Day::Monday,
                    dinner: Dinner::new("Fried rice", "noodles-rice"),
                },
            ],
        }
    }

    #[test]
    fn test_week_of() {
        assert_eq!(week_of(date!(2026 - 10 - 11)).unwrap(), "October 11, 2026");
        assert_eq!(week_of(date!(2027 - 01 - 03)).unwrap(), "January 3, 2027");
    }

    #[test]
    fn test_render_menu() {
        let menu = render(&assignment(), Day::Sunday).unwrap();

        assert!(menu.starts_with("=== DINNER PLAN FOR WEEK OF October 11, 2026 ==="));
        assert!(menu.contains("Sunday - Pho"));
        assert!(menu.contains("  rice noodles"));
        assert!(menu.contains("  beef broth"));
        assert!(menu.contains("Monday - Fried rice"));
        assert!(menu.find("Sunday").unwrap() < menu.find("Monday").unwrap());
    }

    #[test]
    fn test_render_menu_in_calendar_order() {
        let assignment = Assignment {
            week_start: date!(2026 - 10 - 11),
            days: vec![
                DayDinner {
                    day: Day::Friday,
                    dinner: Dinner::new("Margherita", "pizza"),
                },
                DayDinner {
                    day: Day::Wednesday,
                    dinner: Dinner::new("Dal", "curry"),
                },
                DayDinner {
                    day: Day::Monday,
                    dinner: Dinner::new("Lasagna", "pasta"),
                },
            ],
        };

        let menu = render(&assignment, Day::Sunday).unwrap();
        let monday = menu.find("Monday - Lasagna").unwrap();
        let wednesday = menu.find("Wednesday - Dal").unwrap();
        let friday = menu.find("Friday - Margherita").unwrap();
        assert!(monday < wednesday && wednesday < friday);

        let menu = render(&assignment, Day::Thursday).unwrap();
        let friday = menu.find("Friday - Margherita").unwrap();
        let monday = menu.find("Monday - Lasagna").unwrap();
        assert!(friday < monday);
    }

    #[test]
    fn test_render_history() {
        let mut state = RotationState::new(date!(2026 - 10 - 11));
        state.add_selection(Dinner::new("Pho", "soup"));

        let history = render_history(&state).unwrap();

        assert!(history.contains("WEEK OF October 11, 2026"));
        assert!(history.contains("Pho (soup)"));
        assert!(history.contains("(nothing recorded)"));
    }
}
