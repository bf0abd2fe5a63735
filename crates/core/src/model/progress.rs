use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::model::region::Region;

/// Distinct correct answers needed to master a region's quiz.
pub const QUIZ_TARGET: u32 = 3;

/// Completed tutor exchanges needed to master a region's chat.
pub const CHAT_TARGET: u32 = 3;

//
// ─── REGION PROGRESS ───────────────────────────────────────────────────────────
//

/// Completion progress for a single region.
///
/// Fields are private so the derived flags can only change together with
/// their counts: `quiz_complete == (quiz_correct_count >= QUIZ_TARGET)` and
/// `chat_complete == (chat_count >= CHAT_TARGET)` hold for every value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionProgress {
    summary_read: bool,
    quiz_correct_count: u32,
    quiz_complete: bool,
    correct_question_ids: Vec<String>,
    chat_count: u32,
    chat_complete: bool,
}

impl RegionProgress {
    #[must_use]
    pub fn summary_read(&self) -> bool {
        self.summary_read
    }

    #[must_use]
    pub fn quiz_correct_count(&self) -> u32 {
        self.quiz_correct_count
    }

    #[must_use]
    pub fn quiz_complete(&self) -> bool {
        self.quiz_complete
    }

    /// Question ids already credited, in the order they were answered.
    #[must_use]
    pub fn correct_question_ids(&self) -> &[String] {
        &self.correct_question_ids
    }

    #[must_use]
    pub fn chat_count(&self) -> u32 {
        self.chat_count
    }

    #[must_use]
    pub fn chat_complete(&self) -> bool {
        self.chat_complete
    }

    /// Rebuild progress from a persisted snapshot, falling back to defaults
    /// for missing fields and recomputing everything derived.
    fn from_snapshot(snapshot: &RegionProgressSnapshot) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for id in snapshot.correct_question_ids.iter().flatten() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        let credited = u32::try_from(ids.len()).unwrap_or(u32::MAX);
        let quiz_correct_count = snapshot
            .quiz_correct_count
            .unwrap_or(0)
            .max(credited)
            .min(QUIZ_TARGET);
        let chat_count = snapshot.chat_count.unwrap_or(0).min(CHAT_TARGET);

        Self {
            summary_read: snapshot.summary_read.unwrap_or(false),
            quiz_correct_count,
            quiz_complete: quiz_correct_count >= QUIZ_TARGET,
            correct_question_ids: ids,
            chat_count,
            chat_complete: chat_count >= CHAT_TARGET,
        }
    }

    fn credit_question(&mut self, question_id: String) -> bool {
        if self.quiz_complete || self.correct_question_ids.contains(&question_id) {
            return false;
        }
        self.correct_question_ids.push(question_id);
        let credited = u32::try_from(self.correct_question_ids.len()).unwrap_or(u32::MAX);
        self.quiz_correct_count = credited.min(QUIZ_TARGET);
        self.quiz_complete = self.quiz_correct_count >= QUIZ_TARGET;
        true
    }

    fn credit_chat(&mut self) -> bool {
        if self.chat_complete {
            return false;
        }
        self.chat_count = (self.chat_count + 1).min(CHAT_TARGET);
        self.chat_complete = self.chat_count >= CHAT_TARGET;
        true
    }

    fn reset_quiz(&mut self) -> bool {
        if self.quiz_correct_count == 0 && self.correct_question_ids.is_empty() {
            return false;
        }
        self.quiz_correct_count = 0;
        self.quiz_complete = false;
        self.correct_question_ids.clear();
        true
    }
}

//
// ─── APP STATE ─────────────────────────────────────────────────────────────────
//

/// Root application state: notification permission plus progress for every
/// region. Progress for all regions is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    notifications_granted: bool,
    progress: [RegionProgress; Region::COUNT],
}

/// An activity whose completion flag can flip to true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Summary,
    Quiz,
    Chat,
}

/// Result of applying an action to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The action was rejected or was a no-op; nothing needs persisting.
    Unchanged,
    /// The state changed.
    Changed,
    /// The state changed and the given activity became complete for the
    /// region the action targeted.
    Completed(Activity),
}

impl Transition {
    #[must_use]
    pub fn is_changed(self) -> bool {
        !matches!(self, Transition::Unchanged)
    }

    #[must_use]
    pub fn completed(self, activity: Activity) -> bool {
        self == Transition::Completed(activity)
    }
}

/// Mutations accepted by [`AppState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressAction {
    Hydrate(AppStateSnapshot),
    MarkSummaryRead(Region),
    ResetSummary(Region),
    IncrementQuizCorrect { region: Region, question_id: String },
    ResetQuiz(Region),
    IncrementChat(Region),
    SetNotificationsGranted(bool),
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notifications_granted(&self) -> bool {
        self.notifications_granted
    }

    #[must_use]
    pub fn progress(&self, region: Region) -> &RegionProgress {
        &self.progress[region.index()]
    }

    /// Iterate over every region with its progress, in display order.
    pub fn regions(&self) -> impl Iterator<Item = (Region, &RegionProgress)> {
        Region::ALL.into_iter().zip(self.progress.iter())
    }

    fn progress_mut(&mut self, region: Region) -> &mut RegionProgress {
        &mut self.progress[region.index()]
    }

    /// Apply an action in place.
    ///
    /// Rejected and no-op actions leave the state untouched and return
    /// [`Transition::Unchanged`].
    pub fn apply(&mut self, action: ProgressAction) -> Transition {
        match action {
            ProgressAction::Hydrate(snapshot) => {
                let merged = self.merged_with(&snapshot);
                if merged == *self {
                    return Transition::Unchanged;
                }
                *self = merged;
                Transition::Changed
            }
            ProgressAction::MarkSummaryRead(region) => {
                let progress = self.progress_mut(region);
                if progress.summary_read {
                    return Transition::Unchanged;
                }
                progress.summary_read = true;
                Transition::Completed(Activity::Summary)
            }
            ProgressAction::ResetSummary(region) => {
                let progress = self.progress_mut(region);
                if !progress.summary_read {
                    return Transition::Unchanged;
                }
                progress.summary_read = false;
                Transition::Changed
            }
            ProgressAction::IncrementQuizCorrect {
                region,
                question_id,
            } => {
                let progress = self.progress_mut(region);
                if !progress.credit_question(question_id) {
                    return Transition::Unchanged;
                }
                if progress.quiz_complete {
                    Transition::Completed(Activity::Quiz)
                } else {
                    Transition::Changed
                }
            }
            ProgressAction::ResetQuiz(region) => {
                if self.progress_mut(region).reset_quiz() {
                    Transition::Changed
                } else {
                    Transition::Unchanged
                }
            }
            ProgressAction::IncrementChat(region) => {
                let progress = self.progress_mut(region);
                if !progress.credit_chat() {
                    return Transition::Unchanged;
                }
                if progress.chat_complete {
                    Transition::Completed(Activity::Chat)
                } else {
                    Transition::Changed
                }
            }
            ProgressAction::SetNotificationsGranted(value) => {
                if self.notifications_granted == value {
                    return Transition::Unchanged;
                }
                self.notifications_granted = value;
                Transition::Changed
            }
        }
    }

    /// Defaults for every region, overlaid with whatever the snapshot knows.
    fn merged_with(&self, snapshot: &AppStateSnapshot) -> Self {
        let mut merged = Self {
            notifications_granted: snapshot
                .notifications_granted
                .unwrap_or(self.notifications_granted),
            progress: Default::default(),
        };
        if let Some(progress) = snapshot.progress.as_ref() {
            for (key, region_snapshot) in progress {
                // Regions dropped from the app are ignored.
                if let Ok(region) = key.parse::<Region>() {
                    *merged.progress_mut(region) = RegionProgress::from_snapshot(region_snapshot);
                }
            }
        }
        merged
    }
}

struct ProgressByRegion<'a>(&'a AppState);

impl Serialize for ProgressByRegion<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Region::COUNT))?;
        for (region, progress) in self.0.regions() {
            map.serialize_entry(region.key(), progress)?;
        }
        map.end()
    }
}

impl Serialize for AppState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AppState", 2)?;
        state.serialize_field("notificationsGranted", &self.notifications_granted)?;
        state.serialize_field("progress", &ProgressByRegion(self))?;
        state.end()
    }
}

//
// ─── PERSISTED SNAPSHOTS ───────────────────────────────────────────────────────
//

/// Persisted shape of [`AppState`].
///
/// Everything is optional so data written by older builds (or missing newer
/// fields) still hydrates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppStateSnapshot {
    pub notifications_granted: Option<bool>,
    pub progress: Option<BTreeMap<String, RegionProgressSnapshot>>,
}

/// Persisted shape of [`RegionProgress`]. Derived flags are read but ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionProgressSnapshot {
    pub summary_read: Option<bool>,
    pub quiz_correct_count: Option<u32>,
    pub quiz_complete: Option<bool>,
    pub correct_question_ids: Option<Vec<String>>,
    pub chat_count: Option<u32>,
    pub chat_complete: Option<bool>,
}

impl AppStateSnapshot {
    /// Snapshot containing progress for a single region.
    #[must_use]
    pub fn for_region(region: Region, progress: RegionProgressSnapshot) -> Self {
        let mut map = BTreeMap::new();
        map.insert(region.key().to_string(), progress);
        Self {
            notifications_granted: None,
            progress: Some(map),
        }
    }
}
