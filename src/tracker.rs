use crate::dashboard::{self, Dashboard, Progressed};
use crate::day::CalendarDay;
use crate::errors::TrackerError;
use crate::leaderboard::{LEADERBOARD_SIZE, join_nicknames, rank_daily, streak_board};
use crate::models::{
    DashboardResponse, ExerciseView, LeaderboardMode, LeaderboardResponse, Profile, ProgressRow,
    SignInRequest, SignUpRequest, User,
};
use crate::progress::{Exercise, Goals, percent_complete, remaining};
use crate::session::{AuthChange, Credentials, Session, SessionProvider};
use crate::store::{ProfileStore, ProgressStore, RankField};
use std::{collections::HashMap, sync::Arc};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{error, info};

/// Owns the dashboards of all signed-in sessions and wires them to the
/// stores and the session provider.
///
/// Store failures while saving are logged and swallowed: the dashboard keeps
/// the locally applied value and the next successful write catches up.
pub struct Tracker {
    goals: Goals,
    progress: Arc<dyn ProgressStore>,
    profiles: Arc<dyn ProfileStore>,
    sessions: Arc<dyn SessionProvider>,
    // Entries live until sign-out; there is no expiry.
    dashboards: Mutex<HashMap<String, Dashboard>>,
}

impl Tracker {
    pub fn new(
        goals: Goals,
        progress: Arc<dyn ProgressStore>,
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            goals,
            progress,
            profiles,
            sessions,
            dashboards: Mutex::new(HashMap::new()),
        }
    }

    pub fn goals(&self) -> Goals {
        self.goals
    }

    /// Applies auth changes as they arrive, one at a time.
    pub fn spawn_auth_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut subscription = self.sessions.subscribe();
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(change) = subscription.next().await {
                tracker.handle_auth_change(change, CalendarDay::today()).await;
            }
        })
    }

    /// The dashboard held for `token`, if the session has one loaded.
    pub async fn cached_dashboard(&self, token: &str) -> Option<Dashboard> {
        self.dashboards.lock().await.get(token).cloned()
    }

    pub async fn handle_auth_change(&self, change: AuthChange, today: CalendarDay) {
        let mut dashboards = self.dashboards.lock().await;
        match change.user {
            Some(user) => {
                if !dashboards.contains_key(&change.token) {
                    info!("session opened for {}", user.id);
                    let dashboard = self.load_dashboard(user, today).await;
                    dashboards.insert(change.token, dashboard);
                }
            }
            None => {
                if dashboards.remove(&change.token).is_some() {
                    info!("session closed");
                }
            }
        }
    }

    pub async fn sign_up(&self, form: SignUpRequest) -> Result<Session, TrackerError> {
        dashboard::validate_sign_up(&form)?;
        let credentials = Credentials {
            email: form.email,
            password: form.password,
        };
        let session = self.sessions.sign_up(&credentials, &form.nickname).await?;
        self.save_nickname(&session.user).await;
        Ok(session)
    }

    pub async fn sign_in(&self, form: SignInRequest) -> Result<Session, TrackerError> {
        let credentials = Credentials {
            email: form.email,
            password: form.password,
        };
        self.sessions.sign_in(&credentials).await
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), TrackerError> {
        self.sessions.sign_out(token).await?;
        self.dashboards.lock().await.remove(token);
        Ok(())
    }

    pub async fn today(&self, token: &str, today: CalendarDay) -> Result<DashboardResponse, TrackerError> {
        let mut dashboards = self.dashboards.lock().await;
        let dashboard = self.current_dashboard(&mut dashboards, token, today).await?;
        let profile = self.load_profile(&dashboard.user.id).await;
        Ok(self.view(&dashboard, profile.as_ref()))
    }

    pub async fn add_progress(
        &self,
        token: &str,
        exercise: Exercise,
        raw_amount: &str,
        today: CalendarDay,
    ) -> Result<DashboardResponse, TrackerError> {
        let mut dashboards = self.dashboards.lock().await;
        let current = self.current_dashboard(&mut dashboards, token, today).await?;
        let Progressed {
            dashboard,
            goal_completed,
        } = dashboard::add_progress(current, exercise, raw_amount, &self.goals)?;
        dashboards.insert(token.to_string(), dashboard.clone());

        self.save_progress(&dashboard).await;
        let profile = if goal_completed {
            self.record_goal_met(&dashboard.user, dashboard.day).await
        } else {
            self.load_profile(&dashboard.user.id).await
        };
        Ok(self.view(&dashboard, profile.as_ref()))
    }

    pub async fn reset_day(&self, token: &str, today: CalendarDay) -> Result<DashboardResponse, TrackerError> {
        let mut dashboards = self.dashboards.lock().await;
        let current = self.current_dashboard(&mut dashboards, token, today).await?;
        let dashboard = dashboard::reset_day(current);
        dashboards.insert(token.to_string(), dashboard.clone());

        self.save_progress(&dashboard).await;
        let profile = self.load_profile(&dashboard.user.id).await;
        Ok(self.view(&dashboard, profile.as_ref()))
    }

    pub async fn leaderboard(&self, mode: LeaderboardMode, today: CalendarDay) -> LeaderboardResponse {
        match mode {
            LeaderboardMode::Daily => LeaderboardResponse::Daily(self.daily_board(today).await),
            LeaderboardMode::Streak => {
                let profiles = match self
                    .profiles
                    .list_ranked(RankField::CurrentStreak, LEADERBOARD_SIZE)
                    .await
                {
                    Ok(profiles) => profiles,
                    Err(err) => {
                        error!("failed to fetch streak leaderboard: {err}");
                        Vec::new()
                    }
                };
                LeaderboardResponse::Streak(streak_board(profiles))
            }
        }
    }

    async fn daily_board(&self, today: CalendarDay) -> Vec<crate::leaderboard::DailyEntry> {
        let rows = match self.progress.list_for_day(today).await {
            Ok(rows) => rows,
            Err(err) => {
                error!("failed to fetch leaderboard: {err}");
                return Vec::new();
            }
        };

        let ranked = rank_daily(rows);
        let mut nicknames = HashMap::new();
        for entry in &ranked {
            if let Some(profile) = self.load_profile(&entry.user_id).await {
                nicknames.insert(profile.id, profile.nickname);
            }
        }
        join_nicknames(ranked, &nicknames)
    }

    /// The session's dashboard for `today`, loading it when the session is
    /// new or the day has rolled over.
    async fn current_dashboard(
        &self,
        dashboards: &mut HashMap<String, Dashboard>,
        token: &str,
        today: CalendarDay,
    ) -> Result<Dashboard, TrackerError> {
        let Some(user) = self.sessions.current_user(token).await? else {
            dashboards.remove(token);
            return Err(TrackerError::Unauthorized);
        };

        if let Some(dashboard) = dashboards.get(token) {
            if dashboard.day == today && dashboard.user.id == user.id {
                return Ok(dashboard.clone());
            }
        }

        let dashboard = self.load_dashboard(user, today).await;
        dashboards.insert(token.to_string(), dashboard.clone());
        Ok(dashboard)
    }

    async fn load_dashboard(&self, user: User, today: CalendarDay) -> Dashboard {
        let progress = match self.progress.get(&user.id, today).await {
            Ok(row) => row.map(|row| row.progress()).unwrap_or_default(),
            Err(err) => {
                error!("failed to load progress for {}: {err}", user.id);
                Default::default()
            }
        };
        Dashboard::new(user, today, progress)
    }

    async fn load_profile(&self, user_id: &str) -> Option<Profile> {
        match self.profiles.get(user_id).await {
            Ok(profile) => profile,
            Err(err) => {
                error!("failed to load profile {user_id}: {err}");
                None
            }
        }
    }

    async fn save_progress(&self, dashboard: &Dashboard) {
        let row = ProgressRow::new(&dashboard.user.id, dashboard.day, dashboard.progress);
        if let Err(err) = self.progress.upsert(row).await {
            error!("error saving progress for {}: {err}", dashboard.user.id);
        }
    }

    /// Keeps an existing profile's streak and only replaces the nickname.
    async fn save_nickname(&self, user: &User) {
        let nickname = user.display_name().to_string();
        let profile = match self.load_profile(&user.id).await {
            Some(existing) => Profile { nickname, ..existing },
            None => Profile::new(&user.id, nickname),
        };
        if let Err(err) = self.profiles.upsert(profile).await {
            error!("error creating/updating profile {}: {err}", user.id);
        }
    }

    async fn record_goal_met(&self, user: &User, day: CalendarDay) -> Option<Profile> {
        let existing = match self.profiles.get(&user.id).await {
            Ok(existing) => existing,
            Err(err) => {
                error!("failed to load profile {} for streak: {err}", user.id);
                return None;
            }
        };

        let create = existing.is_none();
        let mut profile = existing.unwrap_or_else(|| Profile::new(&user.id, user.display_name()));
        if !profile.streak.record_goal_met(day) {
            return Some(profile);
        }

        let saved = if create {
            self.profiles.insert(profile.clone()).await
        } else {
            self.profiles.upsert(profile.clone()).await
        };
        match saved {
            Ok(()) => info!(
                "goal met by {} on {day}, streak {}",
                user.id, profile.streak.current
            ),
            Err(err) => error!("error updating streak for {}: {err}", user.id),
        }
        Some(profile)
    }

    fn view(&self, dashboard: &Dashboard, profile: Option<&Profile>) -> DashboardResponse {
        let exercise_view = |exercise: Exercise| {
            let done = dashboard.progress.count(exercise);
            let goal = self.goals.goal_for(exercise);
            ExerciseView {
                done,
                remaining: remaining(done, goal),
                goal,
                percent: percent_complete(done, goal),
            }
        };

        let nickname = match profile.map(|profile| profile.nickname.trim()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => dashboard.user.display_name().to_string(),
        };
        let streak = profile.map(|profile| profile.streak.clone()).unwrap_or_default();

        DashboardResponse {
            date: dashboard.day.key(),
            nickname,
            pushups: exercise_view(Exercise::Pushups),
            pullups: exercise_view(Exercise::Pullups),
            goal_met: dashboard.progress.is_goal_met(&self.goals),
            current_streak: streak.current,
            longest_streak: streak.longest,
        }
    }
}
