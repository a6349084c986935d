//! Food-label scanning: image selection, upload, analysis submission

pub mod coordinator;
pub mod form;
pub mod preview;
pub mod progress;

pub use coordinator::{ScanCoordinator, ScanPhase, ScanSubmission, ScanView, SubmitOutcome};
pub use form::{ScanForm, TagSet};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use progress::{ProgressGuard, ProgressMessages};
