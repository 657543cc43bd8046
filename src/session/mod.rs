//! Identification session state.
//!
//! A session holds what the user is currently working with: the selected
//! image, the last result, the last error message, and whether an
//! identification is in flight. Only one identification may be pending at a
//! time; a second attempt while loading is refused with
//! [`IdentifyError::Busy`].
//!
//! The state lock is never held across the upstream call.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{IdentifyError, Result};
use crate::gemini::SpeciesIdentifier;
use crate::metrics;
use crate::models::SpeciesIdentification;
use crate::vision::{ImageUpload, SelectedImage};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct SessionState {
    selected: Option<ImageUpload>,
    result: Option<SpeciesIdentification>,
    error: Option<String>,
    loading: bool,
}

/// Serializable view of the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub selected_image: Option<SelectedImage>,
    pub result: Option<SpeciesIdentification>,
    pub error: Option<String>,
    pub loading: bool,
}

pub struct IdentificationSession {
    identifier: Arc<dyn SpeciesIdentifier>,
    max_image_bytes: usize,
    state: Mutex<SessionState>,
}

/// Clears the loading flag when the pending identification ends, including
/// when its future is dropped.
struct LoadingGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().loading = false;
    }
}

impl IdentificationSession {
    pub fn new(identifier: Arc<dyn SpeciesIdentifier>, max_image_bytes: usize) -> Self {
        Self {
            identifier,
            max_image_bytes,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn identifier(&self) -> &Arc<dyn SpeciesIdentifier> {
        &self.identifier
    }

    /// Replace the selected image.
    ///
    /// The upload is validated first; a rejected upload leaves the session
    /// untouched. On success the MIME type is replaced by the canonical one
    /// for its format, and the previous result and error are cleared.
    pub fn select_image(&self, mut image: ImageUpload) -> Result<SelectedImage> {
        let mut state = self.state.lock();
        if state.loading {
            return Err(IdentifyError::Busy);
        }

        let format = match image.validate(self.max_image_bytes) {
            Ok(format) => format,
            Err(e) => {
                warn!("Rejected image selection: {}", e);
                metrics::record_rejected_upload(e.kind());
                return Err(e);
            }
        };
        image.mime_type = format.mime_type().to_string();

        let summary = image.summary();
        info!(
            "Selected image {} ({}, {} bytes)",
            summary.file_name.as_deref().unwrap_or("<unnamed>"),
            summary.mime_type,
            summary.size_bytes
        );

        state.selected = Some(image);
        state.result = None;
        state.error = None;
        Ok(summary)
    }

    /// Identify the selected image.
    ///
    /// Any failure is also recorded as the session's error message, and the
    /// previous result is cleared before the call starts.
    pub async fn identify(&self) -> Result<SpeciesIdentification> {
        let image = {
            let mut state = self.state.lock();
            if state.loading {
                return Err(IdentifyError::Busy);
            }
            let Some(image) = state.selected.clone() else {
                let err = IdentifyError::NoImageSelected;
                state.error = Some(err.to_string());
                return Err(err);
            };
            state.loading = true;
            state.result = None;
            state.error = None;
            image
        };

        let _guard = LoadingGuard { state: &self.state };
        let outcome = self.identifier.identify(&image).await;

        let mut state = self.state.lock();
        match &outcome {
            Ok(identification) => {
                let label = if identification.is_unidentified() {
                    "unidentified"
                } else {
                    "success"
                };
                metrics::record_identification(label);
                state.result = Some(identification.clone());
            }
            Err(e) => {
                warn!("Identification error: {}", e);
                metrics::record_identification(e.kind());
                state.error = Some(e.to_string());
            }
        }
        outcome
    }

    pub fn dismiss_error(&self) {
        self.state.lock().error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            selected_image: state.selected.as_ref().map(ImageUpload::summary),
            result: state.result.clone(),
            error: state.error.clone(),
            loading: state.loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::MAX_IMAGE_SIZE_BYTES;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct Scripted {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        reply: fn() -> Result<SpeciesIdentification>,
    }

    #[async_trait]
    impl SpeciesIdentifier for Scripted {
        async fn identify(&self, _image: &ImageUpload) -> Result<SpeciesIdentification> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.reply)()
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    fn tiger() -> Result<SpeciesIdentification> {
        Ok(SpeciesIdentification {
            species_name: "Bengal Tiger".into(),
            scientific_name: "Panthera tigris tigris".into(),
            is_endangered_status: "Endangered".into(),
            confidence: "High".into(),
            conservation_summary: "Apex predator.".into(),
            common_threats: "Illegal poaching, habitat loss.".into(),
        })
    }

    fn incomplete() -> Result<SpeciesIdentification> {
        Err(IdentifyError::IncompleteData)
    }

    fn session(
        reply: fn() -> Result<SpeciesIdentification>,
        gate: Option<Arc<Notify>>,
    ) -> (Arc<IdentificationSession>, Arc<Scripted>) {
        let identifier = Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            gate,
            reply,
        });
        let session = IdentificationSession::new(identifier.clone(), MAX_IMAGE_SIZE_BYTES);
        (Arc::new(session), identifier)
    }

    fn jpeg() -> ImageUpload {
        ImageUpload::new(Some("tiger.jpg".into()), "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[tokio::test]
    async fn test_identify_without_selection() {
        let (session, identifier) = session(tiger, None);
        let err = session.identify().await.unwrap_err();
        assert!(matches!(err, IdentifyError::NoImageSelected));
        assert_eq!(session.snapshot().error.as_deref(), Some("Please select an image first."));
        assert_eq!(identifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_identify_success_stores_result() {
        let (session, _) = session(tiger, None);
        session.select_image(jpeg()).unwrap();

        let id = session.identify().await.unwrap();
        assert_eq!(id.species_name, "Bengal Tiger");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.result, Some(id));
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
        assert_eq!(snapshot.selected_image.unwrap().file_name.as_deref(), Some("tiger.jpg"));
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_dismissible() {
        let (session, _) = session(incomplete, None);
        session.select_image(jpeg()).unwrap();

        assert!(matches!(session.identify().await, Err(IdentifyError::IncompleteData)));
        let snapshot = session.snapshot();
        assert!(snapshot.result.is_none());
        assert_eq!(snapshot.error.as_deref(), Some("Received incomplete data from AI."));

        session.dismiss_error();
        assert!(session.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_oversized_image_rejected_before_any_call() {
        let (session, identifier) = session(tiger, None);
        let big = ImageUpload::new(Some("big.jpg".into()), "image/jpeg", vec![0u8; 6 * 1024 * 1024]);

        assert!(matches!(session.select_image(big), Err(IdentifyError::ImageTooLarge { .. })));
        assert!(session.snapshot().selected_image.is_none());
        assert!(matches!(session.identify().await, Err(IdentifyError::NoImageSelected)));
        assert_eq!(identifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_new_selection_clears_previous_result() {
        let (session, _) = session(tiger, None);
        session.select_image(jpeg()).unwrap();
        session.identify().await.unwrap();
        assert!(session.snapshot().result.is_some());

        session.select_image(jpeg()).unwrap();
        let snapshot = session.snapshot();
        assert!(snapshot.result.is_none());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_selection_stores_canonical_mime_type() {
        let (session, _) = session(tiger, None);

        for (given, canonical) in [
            ("image/jpg", "image/jpeg"),
            ("IMAGE/PNG; charset=binary", "image/png"),
            ("Image/WebP", "image/webp"),
        ] {
            let upload = ImageUpload::new(None, given, vec![0u8; 8]);
            let summary = session.select_image(upload).unwrap();
            assert_eq!(summary.mime_type, canonical);

            let state = session.state.lock();
            let selected = state.selected.as_ref().unwrap();
            let request = crate::gemini::encode_request(selected);
            let json = serde_json::to_value(&request).unwrap();
            assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], canonical);
        }
    }

    #[tokio::test]
    async fn test_second_identify_while_pending_is_busy() {
        let gate = Arc::new(Notify::new());
        let (session, identifier) = session(tiger, Some(gate.clone()));
        session.select_image(jpeg()).unwrap();

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.identify().await }
        });

        // Wait until the first call reaches the identifier
        while identifier.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(session.is_loading());
        assert!(matches!(session.identify().await, Err(IdentifyError::Busy)));
        assert!(matches!(session.select_image(jpeg()), Err(IdentifyError::Busy)));

        gate.notify_one();
        assert!(pending.await.unwrap().is_ok());
        assert!(!session.is_loading());
        assert_eq!(identifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropped_call_clears_loading() {
        let gate = Arc::new(Notify::new());
        let (session, identifier) = session(tiger, Some(gate));
        session.select_image(jpeg()).unwrap();

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.identify().await }
        });
        while identifier.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        pending.abort();
        let _ = pending.await;
        assert!(!session.is_loading());
    }
}
