use crate::day::CalendarDay;
use crate::errors::ValidationError;
use crate::models::{SignUpRequest, User};
use crate::progress::{DailyProgress, Exercise, Goals, clamp_increment, remaining};

/// What one signed-in session currently shows. Handlers take it by value and
/// hand back the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub user: User,
    pub day: CalendarDay,
    pub progress: DailyProgress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progressed {
    pub dashboard: Dashboard,
    /// Both goals are met now and were not before this increment.
    pub goal_completed: bool,
}

impl Dashboard {
    pub fn new(user: User, day: CalendarDay, progress: DailyProgress) -> Self {
        Self { user, day, progress }
    }
}

/// Parses the raw amount typed into an exercise field.
pub fn parse_amount(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    let value: i64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidNumber(raw.to_string()))?;
    if value <= 0 {
        return Err(ValidationError::NotPositive);
    }
    u32::try_from(value).map_err(|_| ValidationError::InvalidNumber(raw.to_string()))
}

pub fn add_progress(
    dashboard: Dashboard,
    exercise: Exercise,
    raw_amount: &str,
    goals: &Goals,
) -> Result<Progressed, ValidationError> {
    let delta = parse_amount(raw_amount)?;
    let goal = goals.goal_for(exercise);
    let current = dashboard.progress.count(exercise);

    let (next, accepted) = clamp_increment(current, delta, goal);
    if !accepted {
        return Err(if current >= goal {
            ValidationError::GoalAlreadyReached(exercise)
        } else {
            ValidationError::Overshoot {
                exercise,
                max: remaining(current, goal),
            }
        });
    }

    let was_met = dashboard.progress.is_goal_met(goals);
    let mut dashboard = dashboard;
    dashboard.progress.set(exercise, next);
    let goal_completed = !was_met && dashboard.progress.is_goal_met(goals);

    Ok(Progressed {
        dashboard,
        goal_completed,
    })
}

pub fn reset_day(dashboard: Dashboard) -> Dashboard {
    Dashboard {
        progress: DailyProgress::default(),
        ..dashboard
    }
}

pub fn validate_sign_up(form: &SignUpRequest) -> Result<(), ValidationError> {
    if form.nickname.trim().is_empty() {
        return Err(ValidationError::MissingNickname);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard(pushups: u32, pullups: u32) -> Dashboard {
        let user = User {
            id: "u1".into(),
            email: "u1@example.com".into(),
            nickname: Some("U1".into()),
        };
        let day = CalendarDay::from_ymd(2026, 1, 5).unwrap();
        Dashboard::new(user, day, DailyProgress { pushups, pullups })
    }

    const GOALS: Goals = Goals {
        pushups: 100,
        pullups: 50,
    };

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_amount(" 12 "), Ok(12));
        assert_eq!(parse_amount(""), Err(ValidationError::EmptyInput));
        assert_eq!(parse_amount("   "), Err(ValidationError::EmptyInput));
        assert_eq!(parse_amount("abc"), Err(ValidationError::InvalidNumber("abc".into())));
        assert_eq!(parse_amount("2.5"), Err(ValidationError::InvalidNumber("2.5".into())));
        assert_eq!(parse_amount("0"), Err(ValidationError::NotPositive));
        assert_eq!(parse_amount("-3"), Err(ValidationError::NotPositive));
    }

    #[test]
    fn increment_updates_the_chosen_exercise() {
        let progressed = add_progress(dashboard(10, 5), Exercise::Pullups, "7", &GOALS).unwrap();
        assert_eq!(progressed.dashboard.progress, DailyProgress { pushups: 10, pullups: 12 });
        assert!(!progressed.goal_completed);
    }

    #[test]
    fn overshoot_reports_how_many_are_left() {
        let err = add_progress(dashboard(90, 0), Exercise::Pushups, "25", &GOALS).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Overshoot {
                exercise: Exercise::Pushups,
                max: 10
            }
        );
    }

    #[test]
    fn finished_exercise_rejects_more() {
        let err = add_progress(dashboard(100, 0), Exercise::Pushups, "1", &GOALS).unwrap_err();
        assert_eq!(err, ValidationError::GoalAlreadyReached(Exercise::Pushups));
    }

    #[test]
    fn completing_the_second_goal_flags_completion() {
        let progressed = add_progress(dashboard(100, 45), Exercise::Pullups, "5", &GOALS).unwrap();
        assert!(progressed.goal_completed);
        assert!(progressed.dashboard.progress.is_goal_met(&GOALS));
    }

    #[test]
    fn reset_clears_counts_and_keeps_day() {
        let before = dashboard(40, 20);
        let after = reset_day(before.clone());
        assert_eq!(after.progress, DailyProgress::default());
        assert_eq!(after.day, before.day);
        assert_eq!(after.user, before.user);
    }

    #[test]
    fn sign_up_form_checks() {
        let mut form = SignUpRequest {
            email: "a@b.c".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            nickname: "  ".into(),
        };
        assert_eq!(validate_sign_up(&form), Err(ValidationError::MissingNickname));
        form.nickname = "Ala".into();
        form.confirm_password = "secret2".into();
        assert_eq!(validate_sign_up(&form), Err(ValidationError::PasswordMismatch));
        form.confirm_password = "secret1".into();
        assert_eq!(validate_sign_up(&form), Ok(()));
    }
}
