use crate::day::CalendarDay;
use crate::errors::StoreError;
use crate::models::{AccountRow, AppData, Profile, ProgressRow};
use crate::store::{ProfileStore, ProgressStore, RankField};
use async_trait::async_trait;
use std::{path::Path, path::PathBuf, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::error;

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

/// Progress, profile and account rows in one JSON document, rewritten after
/// every mutation.
#[derive(Clone)]
pub struct JsonStore {
    path: PathBuf,
    data: Arc<Mutex<AppData>>,
}

impl JsonStore {
    /// Loads `path`, creating its parent directory when missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let data = load_data(&path).await;
        Ok(Self::with_data(path, data))
    }

    pub fn with_data(path: PathBuf, data: AppData) -> Self {
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn find_account(&self, email: &str) -> Option<AccountRow> {
        self.data.lock().await.accounts.get(email).cloned()
    }

    pub async fn insert_account(&self, account: AccountRow) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        if data.accounts.contains_key(&account.email) {
            return Err(StoreError::Conflict(format!("account {}", account.email)));
        }
        let email = account.email.clone();
        data.accounts.insert(email.clone(), account);
        if let Err(err) = persist_data(&self.path, &data).await {
            data.accounts.remove(&email);
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for JsonStore {
    async fn get(&self, user_id: &str, day: CalendarDay) -> Result<Option<ProgressRow>, StoreError> {
        let data = self.data.lock().await;
        Ok(data
            .progress
            .get(user_id)
            .and_then(|days| days.get(&day))
            .cloned())
    }

    async fn upsert(&self, row: ProgressRow) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        data.progress
            .entry(row.user_id.clone())
            .or_default()
            .insert(row.date_key, row);
        persist_data(&self.path, &data).await
    }

    async fn list_for_day(&self, day: CalendarDay) -> Result<Vec<ProgressRow>, StoreError> {
        let data = self.data.lock().await;
        Ok(data
            .progress
            .values()
            .filter_map(|days| days.get(&day).cloned())
            .collect())
    }
}

#[async_trait]
impl ProfileStore for JsonStore {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.data.lock().await.profiles.get(id).cloned())
    }

    async fn insert(&self, profile: Profile) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        if data.profiles.contains_key(&profile.id) {
            return Err(StoreError::Conflict(format!("profile {}", profile.id)));
        }
        let id = profile.id.clone();
        data.profiles.insert(id.clone(), profile);
        if let Err(err) = persist_data(&self.path, &data).await {
            data.profiles.remove(&id);
            return Err(err);
        }
        Ok(())
    }

    async fn upsert(&self, profile: Profile) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        data.profiles.insert(profile.id.clone(), profile);
        persist_data(&self.path, &data).await
    }

    async fn list_ranked(&self, field: RankField, limit: usize) -> Result<Vec<Profile>, StoreError> {
        let data = self.data.lock().await;
        let mut profiles: Vec<Profile> = data.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| field.value(b).cmp(&field.value(a)));
        profiles.truncate(limit);
        Ok(profiles)
    }
}
