use std::io;
use std::path::Path;

use crate::models::FileSignals;
use crate::scan::detectors::{
    EnvAssignmentDetector, FrameworkDetector, PortReferenceDetector, SignalDetector,
};

/// Runs every registered detector over a file's content. Undecodable bytes
/// are replaced rather than treated as failures; only an actual read error
/// surfaces, and the caller decides how to degrade it.
pub struct SignalExtractor {
    detectors: Vec<Box<dyn SignalDetector>>,
}

impl SignalExtractor {
    pub fn new() -> Self {
        Self::with_detectors(vec![
            Box::new(EnvAssignmentDetector),
            Box::new(PortReferenceDetector),
            Box::new(FrameworkDetector),
        ])
    }

    pub fn with_detectors(detectors: Vec<Box<dyn SignalDetector>>) -> Self {
        Self { detectors }
    }

    /// Extract signals from one file. `Err` means the file could not be
    /// read at all, which is distinct from `Ok` with empty signals.
    pub fn extract(&self, path: &Path) -> io::Result<FileSignals> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(self.extract_content(&content))
    }

    pub fn extract_content(&self, content: &str) -> FileSignals {
        let mut signals = FileSignals::default();
        for detector in &self.detectors {
            detector.detect(content, &mut signals);
        }
        signals
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new()
    }
}
