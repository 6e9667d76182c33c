pub mod detectors;
pub mod extractor;
pub mod walker;

pub use detectors::{
    EnvAssignmentDetector, FrameworkDetector, PortReferenceDetector, SignalDetector,
};
pub use extractor::SignalExtractor;
pub use walker::{walk_workspace, WalkedFile};
