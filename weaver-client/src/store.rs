//! Workflow state store
//!
//! One owned state object drives the three-step workflow
//! `Upload → Analysis → Download`. Every mutation goes through an action
//! method; actions that need the server call the [`WeaverBackend`].
//!
//! Actions take `&mut self`, so at most one upload, analysis or mix can be in
//! flight. The `is_*` flags mirror that for display.
//!
//! Failures never propagate out of an action. They are logged and queued as
//! [`Notification`]s for the front end to show; the step only moves back on a
//! failed analysis.

use weaver_common::api::{MixSelection, MIX_FILE_NAME};
use weaver_common::stems::{StemPair, Version};

use crate::backend::{ArchiveFile, WeaverBackend};

pub const INVALID_FILE_TYPE: &str = "Invalid file type. Please upload a ZIP file.";
pub const NO_COMMON_STEMS: &str = "No common stems found between the two ZIP files.";
pub const ANALYSIS_FAILED: &str = "An error occurred during analysis.";
pub const MIX_DOWNLOADED: &str = "Your mix has been downloaded!";
pub const MIX_FAILED: &str = "An error occurred while creating your mix.";

/// Workflow step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Upload,
    Analysis,
    Download,
}

/// One value per archive slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slots<T> {
    pub a: T,
    pub b: T,
}

impl<T> Slots<T> {
    pub fn get(&self, version: Version) -> &T {
        match version {
            Version::A => &self.a,
            Version::B => &self.b,
        }
    }

    pub fn get_mut(&mut self, version: Version) -> &mut T {
        match version {
            Version::A => &mut self.a,
            Version::B => &mut self.b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Finished mix handed to the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything the front end renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub step: Step,
    pub files: Slots<Option<ArchiveFile>>,
    pub stem_lists: Slots<Vec<String>>,
    /// In the order analysis returned them
    pub stem_pairs: Vec<StemPair>,
    pub is_uploading: Option<Version>,
    pub is_analyzing: bool,
    pub is_processing: bool,
}

impl WorkflowState {
    pub fn pair(&self, name: &str) -> Option<&StemPair> {
        self.stem_pairs.iter().find(|p| p.name == name)
    }

    /// Any operation in flight
    pub fn is_busy(&self) -> bool {
        self.is_uploading.is_some() || self.is_analyzing || self.is_processing
    }

    /// Current picks, one per pair
    pub fn selections(&self) -> Vec<MixSelection> {
        self.stem_pairs
            .iter()
            .map(|p| MixSelection::new(p.name.clone(), p.selected))
            .collect()
    }
}

/// Owns the workflow state and the backend it drives
pub struct WorkflowStore<B> {
    backend: B,
    state: WorkflowState,
    notifications: Vec<Notification>,
}

impl<B: WeaverBackend> WorkflowStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: WorkflowState::default(),
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Take all pending notifications, oldest first
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify_success(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.notifications.push(Notification {
            level: NotificationLevel::Success,
            message,
        });
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.notifications.push(Notification {
            level: NotificationLevel::Error,
            message,
        });
    }

    /// Upload an archive into a slot
    ///
    /// Upload step only. On success the slot's file and stem list are
    /// replaced wholesale. Returns whether the slot changed.
    pub async fn set_file(&mut self, version: Version, file: ArchiveFile) -> bool {
        if self.state.is_busy() {
            tracing::warn!(version = %version, "Upload refused while busy");
            return false;
        }
        if self.state.step != Step::Upload {
            tracing::warn!(version = %version, step = ?self.state.step, "Upload ignored outside upload step");
            return false;
        }
        if !file.is_zip() {
            self.notify_error(INVALID_FILE_TYPE);
            return false;
        }

        self.state.is_uploading = Some(version);
        let result = self.backend.upload(&file).await;
        self.state.is_uploading = None;

        match result {
            Ok(stems) => {
                tracing::info!(
                    version = %version,
                    file = %file.file_name,
                    stem_count = stems.len(),
                    "Slot updated"
                );
                *self.state.files.get_mut(version) = Some(file);
                *self.state.stem_lists.get_mut(version) = stems;
                self.notify_success(format!("Version {} uploaded successfully!", version));
                true
            }
            Err(e) => {
                tracing::error!(version = %version, error = %e, "Upload failed");
                self.notify_error(format!(
                    "Version {} upload failed. Please try again.",
                    version
                ));
                false
            }
        }
    }

    /// Match and score both stem lists
    ///
    /// Runs only from the upload step with both lists non-empty. Returns
    /// whether stem pairs are now available. A refused call changes nothing;
    /// an empty or failed analysis leaves the step at `Upload`.
    pub async fn start_analysis(&mut self) -> bool {
        if self.state.is_busy() || self.state.step != Step::Upload {
            tracing::warn!(step = ?self.state.step, "Analysis refused");
            return false;
        }
        if self.state.stem_lists.a.is_empty() || self.state.stem_lists.b.is_empty() {
            return false;
        }

        self.state.step = Step::Analysis;
        self.state.is_analyzing = true;
        let result = self
            .backend
            .analyze(&self.state.stem_lists.a, &self.state.stem_lists.b)
            .await;
        self.state.is_analyzing = false;

        match result {
            Ok(results) if results.is_empty() => {
                self.state.step = Step::Upload;
                self.notify_error(NO_COMMON_STEMS);
                false
            }
            Ok(results) => {
                self.state.stem_pairs = results
                    .into_iter()
                    .map(|r| StemPair::new(r.name, r.scores))
                    .collect();
                tracing::info!(pairs = self.state.stem_pairs.len(), "Analysis complete");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Analysis failed");
                self.state.step = Step::Upload;
                self.notify_error(ANALYSIS_FAILED);
                false
            }
        }
    }

    /// Pick a version for one stem; unknown names are ignored
    pub fn select_stem(&mut self, name: &str, version: Version) {
        if let Some(pair) = self.state.stem_pairs.iter_mut().find(|p| p.name == name) {
            pair.selected = version;
        } else {
            tracing::debug!(stem = %name, "Selection for unknown stem ignored");
        }
    }

    /// Build the mix from the current picks
    ///
    /// Runs only after analysis and with both files present. May be repeated
    /// from the download step.
    pub async fn start_processing(&mut self) -> Option<MixDownload> {
        if self.state.is_busy() || !matches!(self.state.step, Step::Analysis | Step::Download) {
            tracing::warn!(step = ?self.state.step, "Mix refused");
            return None;
        }
        let selections = self.state.selections();
        let (Some(file_a), Some(file_b)) = (&self.state.files.a, &self.state.files.b) else {
            return None;
        };

        self.state.step = Step::Download;
        self.state.is_processing = true;
        let result = self.backend.create_mix(file_a, file_b, &selections).await;
        self.state.is_processing = false;

        match result {
            Ok(bytes) => {
                tracing::info!(
                    selections = selections.len(),
                    size = bytes.len(),
                    "Mix received"
                );
                self.notify_success(MIX_DOWNLOADED);
                Some(MixDownload {
                    file_name: MIX_FILE_NAME.to_string(),
                    bytes,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Mix creation failed");
                self.notify_error(MIX_FAILED);
                None
            }
        }
    }

    /// Back to the initial state
    pub fn reset(&mut self) {
        self.state = WorkflowState::default();
    }
}
