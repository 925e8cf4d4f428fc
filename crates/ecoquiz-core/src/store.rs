//! The profile store: the single source of truth for a learner's profile.
//!
//! Every operation is a whole-blob read-modify-write under [`STORAGE_KEY`].
//! Storage failures and corrupt blobs are logged and never surface to the
//! caller; a fresh default profile stands in for anything unreadable.

use std::sync::Arc;

use crate::error::StorageError;
use crate::model::{Profile, UserPreferences};
use crate::progression::ProgressionEngine;
use crate::traits::{Clock, ProfileStorage, SystemClock};

/// Key the profile blob is stored under.
pub const STORAGE_KEY: &str = "eco_quiz_user_data";

pub struct ProfileStore {
    storage: Arc<dyn ProfileStorage>,
    clock: Arc<dyn Clock>,
    engine: ProgressionEngine,
}

impl ProfileStore {
    /// A store over `storage` using wall-clock time.
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Arc<dyn ProfileStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            engine: ProgressionEngine::new(clock.clone()),
            clock,
        }
    }

    /// The stored profile, or a fresh one if nothing usable is stored.
    pub fn load_profile(&self) -> Profile {
        let blob = match self.storage.read(STORAGE_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return self.fresh_profile(),
            Err(e) => {
                tracing::warn!("failed to read stored profile: {e}");
                return self.fresh_profile();
            }
        };

        match Profile::from_json(&blob) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("stored profile is unreadable, starting fresh: {e}");
                self.fresh_profile()
            }
        }
    }

    /// Replace the learner's preferences and persist.
    pub fn save_preferences(&self, preferences: UserPreferences) -> Profile {
        let mut profile = self.load_profile();
        profile.preferences = Some(preferences);
        self.persist(&profile);
        profile
    }

    /// Fold a completed attempt into the stored profile and persist.
    pub fn record_attempt(
        &self,
        score: u32,
        question_count: u32,
        time_spent_minutes: u32,
    ) -> Profile {
        let profile = self.load_profile();
        let profile =
            self.engine
                .record_attempt(profile, score, question_count, time_spent_minutes);
        self.persist(&profile);
        profile
    }

    /// Remove all stored state. The next load starts from defaults.
    pub fn reset_profile(&self) {
        match self.storage.remove(STORAGE_KEY) {
            Ok(()) => tracing::info!("profile reset"),
            Err(e) => tracing::warn!("failed to reset profile: {e}"),
        }
    }

    fn fresh_profile(&self) -> Profile {
        Profile::new(self.clock.now())
    }

    fn persist(&self, profile: &Profile) {
        let result = profile
            .to_json()
            .map_err(StorageError::from)
            .and_then(|blob| self.storage.write(STORAGE_KEY, &blob));
        if let Err(e) = result {
            tracing::warn!("failed to persist profile: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::achievements::default_achievements;
    use crate::model::ExperienceLevel;
    use crate::storage::MemoryStorage;
    use crate::traits::ManualClock;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
    }

    fn store_over(storage: Arc<MemoryStorage>) -> (ProfileStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        (ProfileStore::with_clock(storage, clock.clone()), clock)
    }

    /// Storage whose every operation fails.
    struct BrokenStorage;

    impl ProfileStorage for BrokenStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::io(key, std::io::Error::other("disk on fire")))
        }
        fn write(&self, key: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::io(key, std::io::Error::other("disk on fire")))
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::io(key, std::io::Error::other("disk on fire")))
        }
    }

    #[test]
    fn load_without_blob_gives_default_and_does_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, _) = store_over(storage.clone());

        let profile = store.load_profile();
        assert_eq!(profile, Profile::new(start()));
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn corrupt_blob_falls_back_to_default() {
        for blob in ["not json", "null", "[1,2,3]", r#"{"quizHistory": 5}"#] {
            let storage = Arc::new(MemoryStorage::with_blob(STORAGE_KEY, blob));
            let (store, _) = store_over(storage);
            assert_eq!(store.load_profile(), Profile::new(start()), "blob {blob:?}");
        }
    }

    #[test]
    fn legacy_blob_without_achievements_is_migrated() {
        let blob = r#"{
            "preferences": {"interests": ["water"], "experience": "beginner", "goals": ["learn"]},
            "quizHistory": [
                {"id": 1700000000000, "date": "2023-11-14T22:13:20.000Z", "score": 70,
                 "totalQuestions": 10, "percentage": 70, "timeSpent": 4}
            ],
            "totalQuizzes": 1,
            "bestScore": 70,
            "averageScore": 70,
            "totalTimeSpent": 4,
            "joinDate": "2023-11-01T00:00:00.000Z"
        }"#;
        let storage = Arc::new(MemoryStorage::with_blob(STORAGE_KEY, blob));
        let (store, _) = store_over(storage);

        let profile = store.load_profile();
        assert_eq!(profile.achievements, default_achievements());
        assert_eq!(profile.total_attempts, 1);
        assert_eq!(profile.history[0].score, 70);
        assert_eq!(
            profile.join_date,
            Utc.with_ymd_and_hms(2023, 11, 1, 0, 0, 0).unwrap()
        );
        assert!(profile.preferences.unwrap().is_interested_in("water"));
    }

    #[test]
    fn null_achievements_keep_the_rest_of_the_blob() {
        let blob = r#"{
            "quizHistory": [
                {"id": 1700000000000, "date": "2023-11-14T22:13:20.000Z", "score": 90,
                 "totalQuestions": 10, "percentage": 90, "timeSpent": 3}
            ],
            "totalQuizzes": 1,
            "bestScore": 90,
            "averageScore": 90,
            "totalTimeSpent": 3,
            "joinDate": "2023-11-01T00:00:00.000Z",
            "achievements": null
        }"#;
        let storage = Arc::new(MemoryStorage::with_blob(STORAGE_KEY, blob));
        let (store, _) = store_over(storage);

        let profile = store.load_profile();
        assert_eq!(profile.total_attempts, 1);
        assert_eq!(profile.history.len(), 1);
        assert_eq!(profile.total_time_spent, 3);
        assert_eq!(profile.achievements, default_achievements());
    }

    #[test]
    fn save_preferences_persists_and_keeps_history() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, _) = store_over(storage.clone());
        store.record_attempt(60, 10, 5);

        let prefs = UserPreferences::new(["energy", "climate"], ExperienceLevel::Advanced);
        let profile = store.save_preferences(prefs.clone());

        assert_eq!(profile.preferences.as_ref(), Some(&prefs));
        assert_eq!(profile.total_attempts, 1);
        assert_eq!(store.load_profile(), profile);
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn record_attempt_round_trips_through_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, clock) = store_over(storage.clone());

        let first = store.record_attempt(100, 10, 2);
        clock.advance(Duration::minutes(30));
        let second = store.record_attempt(80, 10, 4);

        assert_eq!(second.total_attempts, 2);
        assert_eq!(second.history[1], first.history[0]);
        assert_eq!(second.average_score, 90);
        assert_eq!(store.load_profile(), second);

        let blob = storage.blob(STORAGE_KEY).unwrap();
        assert_eq!(Profile::from_json(&blob).unwrap(), second);
    }

    #[test]
    fn zero_minute_attempt_is_stored_as_one() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, _) = store_over(storage);

        store.record_attempt(50, 10, 0);
        let profile = store.load_profile();
        assert_eq!(profile.history[0].time_spent_minutes, 1);
        assert_eq!(profile.total_time_spent, 1);
    }

    #[test]
    fn reset_restores_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, clock) = store_over(storage.clone());
        store.record_attempt(100, 10, 2);

        clock.advance(Duration::days(3));
        store.reset_profile();

        assert!(storage.blob(STORAGE_KEY).is_none());
        let profile = store.load_profile();
        assert_eq!(profile, Profile::new(start() + Duration::days(3)));
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let clock = Arc::new(ManualClock::new(start()));
        let store = ProfileStore::with_clock(Arc::new(BrokenStorage), clock);

        assert_eq!(store.load_profile(), Profile::new(start()));
        let profile = store.record_attempt(90, 10, 3);
        assert_eq!(profile.total_attempts, 1);
        assert!(profile.achievement("high_scorer").unwrap().unlocked);

        let prefs = UserPreferences::new(["water"], ExperienceLevel::Beginner);
        assert!(store.save_preferences(prefs).preferences.is_some());
        store.reset_profile();
    }
}
