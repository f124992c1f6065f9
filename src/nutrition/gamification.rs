//! Streaks and badge awards

use chrono::NaiveDate;

use crate::models::Badge;

/// Streak after logging activity on `today`
///
/// Same day keeps the streak, the following day extends it, any gap (or a
/// last activity in the future) restarts it at 1.
pub fn next_streak(current: u32, last_activity: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last) = last_activity else {
        return 1;
    };

    match (today - last).num_days() {
        0 => current,
        1 => current + 1,
        _ => 1,
    }
}

/// Badges earned by the given totals that are not in `current`, catalog order
pub fn newly_earned_badges(meal_count: i64, streak: u32, current: &[Badge]) -> Vec<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| !current.contains(badge))
        .filter(|badge| match badge {
            Badge::FirstMeal => meal_count >= 1,
            Badge::WeekStreak => streak >= 7,
            Badge::MonthStreak => streak >= 30,
            Badge::TenMeals => meal_count >= 10,
            Badge::FiftyMeals => meal_count >= 50,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_first_activity_starts_streak() {
        assert_eq!(next_streak(0, None, day(1)), 1);
    }

    #[test]
    fn test_same_day_keeps_streak() {
        assert_eq!(next_streak(4, Some(day(5)), day(5)), 4);
        assert_eq!(next_streak(0, Some(day(5)), day(5)), 0);
    }

    #[test]
    fn test_consecutive_day_extends() {
        assert_eq!(next_streak(4, Some(day(5)), day(6)), 5);
    }

    #[test]
    fn test_gap_resets() {
        assert_eq!(next_streak(4, Some(day(5)), day(8)), 1);
    }

    #[test]
    fn test_badges_awarded_once() {
        assert_eq!(newly_earned_badges(1, 1, &[]), vec![Badge::FirstMeal]);
        assert!(newly_earned_badges(1, 1, &[Badge::FirstMeal]).is_empty());
    }

    #[test]
    fn test_badges_catalog_order() {
        let earned = newly_earned_badges(50, 30, &[]);
        assert_eq!(earned, Badge::ALL.to_vec());
    }

    #[test]
    fn test_week_streak_without_meal_milestones() {
        let earned = newly_earned_badges(9, 7, &[Badge::FirstMeal]);
        assert_eq!(earned, vec![Badge::WeekStreak]);
    }
}
