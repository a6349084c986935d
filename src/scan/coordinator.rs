//! Scan Coordinator
//!
//! ```text
//!         select_image()           submit()                 upload ok
//!  Idle ───────────────► ImageSelected ─────► Uploading ─────────────► Submitting
//!   ▲                                             │                        │
//!   │                upload failed                │                        │
//!   ├─────────────────────────────────────────────┘                        │
//!   │                analysis settled (dialog closes on success)           │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The upload always finishes before the analysis payload is built. State
//! lives behind a mutex that is never held across an `.await`; each
//! `close()` bumps an epoch so a submission started under an older epoch
//! finishes its current call and then discards the result silently.

use std::sync::Arc;

use nutriscan_client::AssetHost;
use nutriscan_types::{AnalyzeLabelRequest, ImageBlob, MealType, Tag};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::form::ScanForm;
use super::preview::{PreviewHandle, PreviewRegistry};
use super::progress::ProgressMessages;
use crate::error::ScanError;
use crate::notify::Notifier;
use crate::nutrition::NutritionGateway;
use crate::session::SessionStore;

pub const SCAN_SUCCEEDED: &str = "Food label analyzed successfully!";
pub const SCAN_FAILED: &str = "Failed to analyze food label";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    ImageSelected,
    Uploading,
    Submitting,
}

impl ScanPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, ScanPhase::Uploading | ScanPhase::Submitting)
    }
}

/// Everything the open dialog holds. Discarded on close or success.
#[derive(Debug, Default)]
pub struct ScanSubmission {
    image: Option<ImageBlob>,
    preview: Option<PreviewHandle>,
    form: ScanForm,
    image_url: Option<String>,
}

/// Read-only copy of the coordinator for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanView {
    pub phase: ScanPhase,
    pub dialog_open: bool,
    pub file_name: Option<String>,
    pub preview_url: Option<String>,
    pub form: ScanForm,
    pub image_url: Option<String>,
    pub progress_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Preconditions not met or a submission already running; nothing sent
    Skipped,
    Completed {
        image_url: String,
        data: Option<Value>,
    },
    /// The dialog was closed mid-flight and the result dropped
    Detached,
}

#[derive(Debug, Default)]
struct ScanState {
    phase: ScanPhase,
    submission: ScanSubmission,
    epoch: u64,
    dialog_open: bool,
}

impl ScanState {
    fn reset(&mut self) {
        self.submission = ScanSubmission::default();
        self.phase = ScanPhase::Idle;
    }
}

#[derive(Clone)]
pub struct ScanCoordinator {
    state: Arc<Mutex<ScanState>>,
    session: SessionStore,
    assets: Arc<dyn AssetHost>,
    nutrition: NutritionGateway,
    notifier: Notifier,
    previews: PreviewRegistry,
    progress: ProgressMessages,
}

impl ScanCoordinator {
    pub fn new(
        session: SessionStore,
        assets: Arc<dyn AssetHost>,
        nutrition: NutritionGateway,
        notifier: Notifier,
        progress: ProgressMessages,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScanState::default())),
            session,
            assets,
            nutrition,
            notifier,
            previews: PreviewRegistry::new(),
            progress,
        }
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn progress(&self) -> &ProgressMessages {
        &self.progress
    }

    pub async fn view(&self) -> ScanView {
        let st = self.state.lock().await;
        ScanView {
            phase: st.phase,
            dialog_open: st.dialog_open,
            file_name: st.submission.image.as_ref().map(|i| i.file_name.clone()),
            preview_url: st.submission.preview.as_ref().map(|p| p.url().to_string()),
            form: st.submission.form.clone(),
            image_url: st.submission.image_url.clone(),
            progress_message: self.progress.current(),
        }
    }

    // ------------------------------------------------------------------------
    // Dialog lifecycle
    // ------------------------------------------------------------------------

    /// Open the dialog with a fresh submission. No-op when already open.
    pub async fn open(&self) {
        let mut st = self.state.lock().await;
        if st.dialog_open {
            return;
        }
        st.dialog_open = true;
        st.reset();
    }

    /// Close the dialog and detach whatever is in flight
    pub async fn close(&self) {
        let mut st = self.state.lock().await;
        if st.phase.is_busy() {
            tracing::info!("Scan dialog closed mid-{:?}, result will be discarded", st.phase);
        }
        st.dialog_open = false;
        st.epoch += 1;
        st.reset();
    }

    // ------------------------------------------------------------------------
    // Form edits
    // ------------------------------------------------------------------------

    /// Retain `image` as the only selection, releasing the previous preview.
    pub async fn select_image(&self, image: ImageBlob) -> Result<(), ScanError> {
        if image.format().is_none() {
            return Err(ScanError::UnsupportedImage {
                file_name: image.file_name,
                content_type: image.content_type,
            });
        }

        let mut st = self.state.lock().await;
        if st.phase.is_busy() {
            return Err(ScanError::Busy);
        }
        tracing::debug!("scan: selected {:?}", image);
        st.submission.preview = Some(self.previews.create());
        st.submission.image = Some(image);
        st.submission.image_url = None;
        st.phase = ScanPhase::ImageSelected;
        Ok(())
    }

    pub async fn clear_image(&self) -> Result<(), ScanError> {
        let mut st = self.state.lock().await;
        if st.phase.is_busy() {
            return Err(ScanError::Busy);
        }
        st.submission.image = None;
        st.submission.preview = None;
        st.submission.image_url = None;
        st.phase = ScanPhase::Idle;
        Ok(())
    }

    pub async fn set_food_name(&self, food_name: impl Into<String>) {
        self.state.lock().await.submission.form.food_name = food_name.into();
    }

    pub async fn set_meal_type(&self, meal_type: MealType) {
        self.state.lock().await.submission.form.meal_type = meal_type;
    }

    /// Returns whether the tag is now selected
    pub async fn toggle_tag(&self, tag: Tag) -> bool {
        self.state.lock().await.submission.form.tags.toggle(tag)
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Upload the selected image, then send it for analysis.
    ///
    /// Without a selected image or a signed-in user this does nothing and
    /// returns `Skipped`. Invalid form values are returned as
    /// `ScanError::Invalid` before any network call. Upload and analysis
    /// failures emit exactly one error notice and leave the image and form in
    /// place for a retry.
    pub async fn submit(&self) -> Result<SubmitOutcome, ScanError> {
        let (epoch, image, user_id, form) = {
            let mut st = self.state.lock().await;
            if st.phase.is_busy() {
                tracing::debug!("scan: submit ignored, already {:?}", st.phase);
                return Ok(SubmitOutcome::Skipped);
            }
            let Some(image) = st.submission.image.clone() else {
                tracing::debug!("scan: submit ignored, no image");
                return Ok(SubmitOutcome::Skipped);
            };
            let Some(user) = self.session.current_user() else {
                tracing::debug!("scan: submit ignored, not signed in");
                return Ok(SubmitOutcome::Skipped);
            };
            st.submission.form.validate().map_err(ScanError::Invalid)?;

            st.phase = ScanPhase::Uploading;
            (st.epoch, image, user.id, st.submission.form.clone())
        };

        let uploaded = {
            let _ticker = self.progress.start();
            self.assets.upload(&image).await
        };

        let image_url = {
            let mut st = self.state.lock().await;
            if st.epoch != epoch {
                return Ok(SubmitOutcome::Detached);
            }
            match uploaded {
                Ok(url) => {
                    st.submission.image_url = Some(url.clone());
                    st.phase = ScanPhase::Submitting;
                    url
                }
                Err(e) => {
                    tracing::warn!("Image upload failed: {}", e);
                    st.phase = ScanPhase::Idle;
                    self.notifier.error(SCAN_FAILED);
                    return Err(ScanError::Upload(e));
                }
            }
        };

        let request = AnalyzeLabelRequest {
            user_uuid: user_id,
            food_name: form.food_name.trim().to_string(),
            meal_type: form.meal_type,
            tags: form.tags.to_vec(),
            image_url: image_url.clone(),
        };
        let result = self.nutrition.analyze_label(&request).await;

        let mut st = self.state.lock().await;
        if st.epoch != epoch {
            return Ok(SubmitOutcome::Detached);
        }

        if !result.success {
            let message = result
                .message
                .unwrap_or_else(|| crate::nutrition::ANALYZE_FAILED.to_string());
            st.submission.image_url = None;
            st.phase = ScanPhase::Idle;
            self.notifier.error(SCAN_FAILED);
            return Err(ScanError::Analysis(message));
        }

        tracing::info!("Analyzed {} ({})", request.food_name, request.meal_type);
        st.reset();
        st.dialog_open = false;
        self.notifier.success(SCAN_SUCCEEDED);
        Ok(SubmitOutcome::Completed {
            image_url,
            data: result.data,
        })
    }

    /// Run [`Self::submit`] on its own task so the caller stays responsive
    pub fn spawn_submit(&self) -> JoinHandle<Result<SubmitOutcome, ScanError>> {
        let this = self.clone();
        tokio::spawn(async move { this.submit().await })
    }
}

impl std::fmt::Debug for ScanCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanCoordinator")
            .field("live_previews", &self.previews.live_count())
            .finish_non_exhaustive()
    }
}
