/// Properties every streak computation must hold, checked over a spread of
/// completion histories and "today" values
use growmate_mcp::*;
use chrono::{Duration, NaiveDate};

fn day(s: &str) -> NaiveDate {
    parse_date(s).expect("valid test date")
}

fn histories() -> Vec<Vec<String>> {
    let base = day("2024-02-26");
    let run = |start: i64, len: i64| -> Vec<String> {
        (start..start + len)
            .map(|offset| format_date(base + Duration::days(offset)))
            .collect()
    };

    vec![
        vec![],
        run(0, 1),
        run(0, 5),
        // Crosses Feb 29 in a leap year
        run(2, 4),
        [run(0, 2), run(4, 3)].concat(),
        [run(6, 2), run(0, 3)].concat(),
        vec![
            "2024-03-01".to_string(),
            "2024-03-01".to_string(),
            "2024-02-29".to_string(),
        ],
    ]
}

fn habit_with(dates: Vec<String>, longest: u32) -> Habit {
    let mut habit = Habit::new(
        HabitDraft {
            title: "Property".to_string(),
            ..Default::default()
        },
        day("2024-02-01"),
    )
    .expect("valid habit");
    habit.completed_dates = dates;
    habit.longest_streak = longest;
    habit
}

#[test]
fn test_streak_properties() {
    let todays: Vec<NaiveDate> = (0..12)
        .map(|offset| day("2024-02-26") + Duration::days(offset))
        .collect();

    for dates in histories() {
        for &stored_longest in &[0u32, 2, 10] {
            for &today in &todays {
                let habit = habit_with(dates.clone(), stored_longest);
                let first = compute_streak(&habit, today).unwrap();
                let second = compute_streak(&habit, today).unwrap();
                assert_eq!(first, second, "deterministic for {:?} at {}", dates, today);

                assert!(first.longest_streak >= first.current_streak);
                assert!(first.longest_streak >= stored_longest);

                if dates.is_empty() {
                    assert_eq!(first.current_streak, 0);
                    assert_eq!(first.longest_streak, stored_longest);
                    assert_eq!(first.last_completed_date, None);
                }

                if first.last_completed_date.as_deref() == Some(format_date(today).as_str()) {
                    assert!(first.current_streak >= 1);
                }

                // Merging the result back in and recomputing changes nothing
                let mut merged = habit.clone();
                merged.apply_streak(&first);
                assert_eq!(compute_streak(&merged, today).unwrap(), first);
            }
        }
    }
}

#[test]
fn test_duplicate_entries_count_once() {
    let habit = habit_with(
        vec![
            "2024-03-01".to_string(),
            "2024-03-01".to_string(),
            "2024-02-29".to_string(),
        ],
        0,
    );
    let result = compute_streak(&habit, day("2024-03-01")).unwrap();
    assert_eq!(result.current_streak, 2);
}
