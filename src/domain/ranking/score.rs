//! Directory ranking scores.
//!
//! A profile's visibility score is the sum of four components: experience
//! level, subscription badges, recent activity, and reviews. An admin manual
//! rank bypasses all of them. Everything here is pure; the caller supplies
//! `now` so scores are reproducible.
//!
//! # Score components
//!
//! | Component | Range | Source |
//! |-----------|-------|--------|
//! | Level | 100-500 | platform-assigned experience level |
//! | Badges | 0-300 | premium plan name + unexpired paid package |
//! | Activity | 0-100 | days since last account activity |
//! | Reviews | 0-500 | published review count + average rating |

use crate::domain::detective::{Detective, DetectiveLevel};
use crate::domain::foundation::Timestamp;
use crate::domain::plan::SubscriptionPlan;
use crate::domain::visibility::VisibilityRecord;

use super::ReviewStats;

/// Plan names whose holders get the premium name boost.
const PREMIUM_PLAN_NAMES: &[&str] = &["pro", "agency"];

const PREMIUM_PLAN_BONUS: i64 = 100;
const ACTIVE_PACKAGE_BONUS: i64 = 200;

/// (minimum review count, points) tiers, highest first.
const REVIEW_COUNT_TIERS: &[(u64, i64)] = &[
    (50, 250),
    (30, 200),
    (20, 150),
    (10, 100),
    (5, 50),
    (1, 25),
];

/// (minimum average rating, points) tiers, highest first.
const REVIEW_RATING_TIERS: &[(f64, i64)] =
    &[(4.8, 250), (4.5, 200), (4.2, 150), (4.0, 100), (3.5, 50)];

/// Computes the visibility score for one profile.
///
/// An admin `manual_rank` is returned exactly as stored, negative values
/// included. Computed scores are floored at zero. Missing plan, visibility,
/// or review inputs contribute nothing; the function never fails.
pub fn visibility_score(
    detective: &Detective,
    plan: Option<&SubscriptionPlan>,
    visibility: Option<&VisibilityRecord>,
    reviews: Option<&ReviewStats>,
    now: &Timestamp,
) -> i64 {
    if let Some(rank) = visibility.and_then(|v| v.manual_rank) {
        return rank;
    }

    let score = level_score(detective.level)
        + badge_score(detective, plan, now)
        + activity_score(detective, now)
        + review_score(reviews);

    score.max(0)
}

fn level_score(level: DetectiveLevel) -> i64 {
    match level {
        DetectiveLevel::Level1 => 100,
        DetectiveLevel::Level2 => 200,
        DetectiveLevel::Level3 => 300,
        DetectiveLevel::Pro => 500,
    }
}

fn badge_score(detective: &Detective, plan: Option<&SubscriptionPlan>, now: &Timestamp) -> i64 {
    let mut score = 0;
    if let Some(plan) = plan {
        if PREMIUM_PLAN_NAMES.contains(&plan.name.as_str()) {
            score += PREMIUM_PLAN_BONUS;
        }
        // Every profile holds a package row; only a paid one earns the boost.
        if !plan.is_free() && detective.has_active_package(now) {
            score += ACTIVE_PACKAGE_BONUS;
        }
    }
    score
}

fn activity_score(detective: &Detective, now: &Timestamp) -> i64 {
    match detective.days_since_active(now) {
        Some(days) if days < 1 => 100,
        Some(days) if days < 7 => 75,
        Some(days) if days < 30 => 50,
        Some(days) if days < 90 => 25,
        _ => 0,
    }
}

fn review_score(reviews: Option<&ReviewStats>) -> i64 {
    let stats = match reviews {
        Some(stats) => stats,
        None => return 0,
    };

    let count_points = REVIEW_COUNT_TIERS
        .iter()
        .find(|(threshold, _)| stats.count >= *threshold)
        .map_or(0, |(_, points)| *points);

    let rating_points = REVIEW_RATING_TIERS
        .iter()
        .find(|(threshold, _)| stats.average >= *threshold)
        .map_or(0, |(_, points)| *points);

    count_points + rating_points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DetectiveId, PlanId, UserId};
    use crate::domain::plan::PlanBadges;
    use crate::domain::visibility::VisibilityRecord;
    use proptest::prelude::*;

    fn detective_at(level: DetectiveLevel, now: Timestamp) -> Detective {
        let mut detective = Detective::register(
            DetectiveId::new(),
            UserId::new("user-1").unwrap(),
            None,
            "GB".to_string(),
            PlanId::new(),
            now,
        );
        detective.level = level;
        // Baseline: no package, no recorded activity.
        detective.subscription_package_id = None;
        detective.subscription_activated_at = None;
        detective.last_active = None;
        detective
    }

    fn plan_named(name: &str) -> SubscriptionPlan {
        let mut plan = SubscriptionPlan::new(
            PlanId::new(),
            name,
            name.to_uppercase(),
            2900,
            29000,
            10,
            Timestamp::now(),
        )
        .unwrap();
        plan.badges = PlanBadges::new(true, true, false);
        plan
    }

    fn free_plan() -> SubscriptionPlan {
        SubscriptionPlan::new(PlanId::new(), "free", "FREE", 0, 0, 2, Timestamp::now()).unwrap()
    }

    fn stats(count: u64, average: f64) -> ReviewStats {
        ReviewStats { count, average }
    }

    // Manual rank override

    #[test]
    fn manual_rank_is_returned_exactly() {
        let now = Timestamp::now();
        let mut detective = detective_at(DetectiveLevel::Pro, now);
        detective.last_active = Some(now);
        let mut visibility = VisibilityRecord::with_defaults(detective.id, now);
        visibility.manual_rank = Some(42);

        let score = visibility_score(
            &detective,
            Some(&plan_named("agency")),
            Some(&visibility),
            Some(&stats(50, 5.0)),
            &now,
        );

        assert_eq!(score, 42);
    }

    #[test]
    fn negative_manual_rank_is_not_floored() {
        let now = Timestamp::now();
        let detective = detective_at(DetectiveLevel::Pro, now);
        let mut visibility = VisibilityRecord::with_defaults(detective.id, now);
        visibility.manual_rank = Some(-5);

        assert_eq!(
            visibility_score(&detective, None, Some(&visibility), None, &now),
            -5
        );
    }

    // Level component

    #[test]
    fn level_scores_match_tiers() {
        let now = Timestamp::now();
        for (level, expected) in [
            (DetectiveLevel::Level1, 100),
            (DetectiveLevel::Level2, 200),
            (DetectiveLevel::Level3, 300),
            (DetectiveLevel::Pro, 500),
        ] {
            let detective = detective_at(level, now);
            assert_eq!(
                visibility_score(&detective, None, None, None, &now),
                expected
            );
        }
    }

    // Badge component

    #[test]
    fn premium_plan_names_add_hundred() {
        let now = Timestamp::now();
        let detective = detective_at(DetectiveLevel::Level1, now);

        for name in ["pro", "agency"] {
            let score = visibility_score(&detective, Some(&plan_named(name)), None, None, &now);
            assert_eq!(score, 200, "plan '{}' should add 100", name);
        }
    }

    #[test]
    fn non_premium_plan_names_add_nothing() {
        let now = Timestamp::now();
        let detective = detective_at(DetectiveLevel::Level1, now);

        let score = visibility_score(&detective, Some(&plan_named("basic")), None, None, &now);
        assert_eq!(score, 100);
    }

    #[test]
    fn unexpired_paid_package_adds_two_hundred() {
        let now = Timestamp::now();
        let paid = plan_named("basic");
        let mut detective = detective_at(DetectiveLevel::Level1, now);
        detective.subscription_package_id = Some(paid.id);
        detective.subscription_expires_at = Some(now.add_days(10));

        assert_eq!(visibility_score(&detective, Some(&paid), None, None, &now), 300);
    }

    #[test]
    fn paid_package_without_expiry_counts_as_unexpired() {
        let now = Timestamp::now();
        let paid = plan_named("basic");
        let mut detective = detective_at(DetectiveLevel::Level1, now);
        detective.subscription_package_id = Some(paid.id);
        detective.subscription_expires_at = None;

        assert_eq!(visibility_score(&detective, Some(&paid), None, None, &now), 300);
    }

    #[test]
    fn expired_package_adds_nothing() {
        let now = Timestamp::now();
        let paid = plan_named("basic");
        let mut detective = detective_at(DetectiveLevel::Level1, now);
        detective.subscription_package_id = Some(paid.id);
        detective.subscription_expires_at = Some(now.minus_days(1));

        assert_eq!(visibility_score(&detective, Some(&paid), None, None, &now), 100);
    }

    #[test]
    fn free_package_adds_nothing() {
        let now = Timestamp::now();
        let free = free_plan();
        let mut detective = detective_at(DetectiveLevel::Level1, now);
        detective.subscription_package_id = Some(free.id);
        detective.subscription_expires_at = None;

        assert_eq!(visibility_score(&detective, Some(&free), None, None, &now), 100);
    }

    #[test]
    fn package_without_a_resolvable_plan_adds_nothing() {
        let now = Timestamp::now();
        let mut detective = detective_at(DetectiveLevel::Level1, now);
        detective.subscription_package_id = Some(PlanId::new());
        detective.subscription_expires_at = Some(now.add_days(10));

        assert_eq!(visibility_score(&detective, None, None, None, &now), 100);
    }

    #[test]
    fn agency_plan_with_package_scores_three_hundred_badges() {
        let now = Timestamp::now();
        let agency = plan_named("agency");
        let mut detective = detective_at(DetectiveLevel::Level1, now);
        detective.subscription_package_id = Some(agency.id);
        detective.subscription_expires_at = Some(now.add_days(30));

        let score = visibility_score(&detective, Some(&agency), None, None, &now);
        assert_eq!(score, 100 + 300);
    }

    // Activity component

    #[test]
    fn activity_steps_down_with_age() {
        let now = Timestamp::now();
        for (days_ago, expected) in [(0, 100), (1, 75), (6, 75), (7, 50), (29, 50), (30, 25), (89, 25), (90, 0), (365, 0)]
        {
            let mut detective = detective_at(DetectiveLevel::Level1, now);
            detective.last_active = Some(now.minus_days(days_ago));

            assert_eq!(
                visibility_score(&detective, None, None, None, &now),
                100 + expected,
                "{} days ago",
                days_ago
            );
        }
    }

    #[test]
    fn missing_activity_scores_zero() {
        let now = Timestamp::now();
        let detective = detective_at(DetectiveLevel::Level1, now);
        assert_eq!(visibility_score(&detective, None, None, None, &now), 100);
    }

    // Review component

    #[test]
    fn review_tiers_combine_count_and_rating() {
        let now = Timestamp::now();
        let detective = detective_at(DetectiveLevel::Level1, now);

        for (count, average, expected) in [
            (5, 4.9, 50 + 250),
            (50, 4.8, 250 + 250),
            (30, 4.5, 200 + 200),
            (20, 4.2, 150 + 150),
            (10, 4.0, 100 + 100),
            (1, 3.5, 25 + 50),
            (1, 3.0, 25),
            (4, 2.0, 25),
        ] {
            let score = visibility_score(
                &detective,
                None,
                None,
                Some(&stats(count, average)),
                &now,
            );
            assert_eq!(
                score,
                100 + expected,
                "{} reviews at {}",
                count,
                average
            );
        }
    }

    #[test]
    fn missing_reviews_score_zero() {
        let now = Timestamp::now();
        let detective = detective_at(DetectiveLevel::Level1, now);
        assert_eq!(visibility_score(&detective, None, None, None, &now), 100);
    }

    // Combined

    #[test]
    fn components_sum_for_a_full_profile() {
        let now = Timestamp::now();
        let agency = plan_named("agency");
        let mut detective = detective_at(DetectiveLevel::Level2, now);
        detective.subscription_package_id = Some(agency.id);
        detective.subscription_expires_at = Some(now.add_days(30));
        detective.last_active = Some(now);

        let score = visibility_score(
            &detective,
            Some(&agency),
            None,
            Some(&stats(5, 4.9)),
            &now,
        );

        // 200 level + 300 badges + 100 activity + 300 reviews
        assert_eq!(score, 900);
    }

    proptest! {
        #[test]
        fn manual_rank_always_wins(rank in -10_000i64..10_000, days_ago in 0i64..400, count in 0u64..100) {
            let now = Timestamp::now();
            let mut detective = detective_at(DetectiveLevel::Pro, now);
            detective.last_active = Some(now.minus_days(days_ago));
            let mut visibility = VisibilityRecord::with_defaults(detective.id, now);
            visibility.manual_rank = Some(rank);

            let score = visibility_score(
                &detective,
                Some(&plan_named("agency")),
                Some(&visibility),
                Some(&stats(count, 4.9)),
                &now,
            );

            prop_assert_eq!(score, rank);
        }

        #[test]
        fn computed_scores_never_drop_below_level_base(days_ago in 0i64..400, count in 0u64..100, average in 0.0f64..5.0) {
            let now = Timestamp::now();
            let mut detective = detective_at(DetectiveLevel::Level1, now);
            detective.last_active = Some(now.minus_days(days_ago));

            let score = visibility_score(
                &detective,
                None,
                None,
                Some(&stats(count, average)),
                &now,
            );

            prop_assert!(score >= 100);
        }

        #[test]
        fn more_recent_activity_never_scores_lower(younger in 0i64..400, older in 0i64..400) {
            prop_assume!(younger <= older);
            let now = Timestamp::now();

            let mut recent = detective_at(DetectiveLevel::Level1, now);
            recent.last_active = Some(now.minus_days(younger));
            let mut stale = detective_at(DetectiveLevel::Level1, now);
            stale.last_active = Some(now.minus_days(older));

            let recent_score = visibility_score(&recent, None, None, None, &now);
            let stale_score = visibility_score(&stale, None, None, None, &now);
            prop_assert!(recent_score >= stale_score);
        }

        #[test]
        fn more_reviews_never_score_lower(fewer in 0u64..200, extra in 0u64..200) {
            let now = Timestamp::now();
            let detective = detective_at(DetectiveLevel::Level1, now);

            let low = visibility_score(&detective, None, None, Some(&stats(fewer, 4.0)), &now);
            let high = visibility_score(&detective, None, None, Some(&stats(fewer + extra, 4.0)), &now);
            prop_assert!(high >= low);
        }
    }
}
