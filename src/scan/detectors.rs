use crate::models::FileSignals;

/// One detector per signal kind. Each takes the full decoded file content
/// and folds whatever it finds into the accumulated signals, so new
/// heuristics can be added without touching the orchestration.
pub trait SignalDetector: Send + Sync {
    fn detect(&self, content: &str, signals: &mut FileSignals);

    fn name(&self) -> &str;
}

/// Flags lines that look like KEY=VALUE assignments: anything containing
/// `=` whose trimmed form is not a `#` comment.
pub struct EnvAssignmentDetector;

impl SignalDetector for EnvAssignmentDetector {
    fn detect(&self, content: &str, signals: &mut FileSignals) {
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.contains('=') && !trimmed.starts_with('#') {
                signals.env_assignments.push(trimmed.to_string());
            }
        }
    }

    fn name(&self) -> &str {
        "env-assignment"
    }
}

/// Flags lines that mention "port" (any case) and carry at least one digit
/// anywhere in the line.
pub struct PortReferenceDetector;

impl SignalDetector for PortReferenceDetector {
    fn detect(&self, content: &str, signals: &mut FileSignals) {
        for line in content.lines() {
            if line.to_lowercase().contains("port") && line.chars().any(|c| c.is_ascii_digit()) {
                signals.port_references.push(line.trim().to_string());
            }
        }
    }

    fn name(&self) -> &str {
        "port-reference"
    }
}

/// Marker substring (matched against lowercased content) → canonical name.
const FRAMEWORK_MARKERS: [(&str, &str); 5] = [
    ("flask", "Flask"),
    ("django", "Django"),
    ("express", "Express.js"),
    ("react", "React"),
    ("spring", "Spring"),
];

/// Case-insensitive substring match against a fixed marker dictionary. A
/// marker occurring anywhere in the file counts once.
pub struct FrameworkDetector;

impl SignalDetector for FrameworkDetector {
    fn detect(&self, content: &str, signals: &mut FileSignals) {
        let lowered = content.to_lowercase();
        for (marker, canonical) in FRAMEWORK_MARKERS {
            if lowered.contains(marker) {
                signals.frameworks.insert(canonical.to_string());
            }
        }
    }

    fn name(&self) -> &str {
        "framework"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(detector: &dyn SignalDetector, content: &str) -> FileSignals {
        let mut signals = FileSignals::default();
        detector.detect(content, &mut signals);
        signals
    }

    #[test]
    fn env_lines_require_equals_and_no_leading_hash() {
        let signals = run(
            &EnvAssignmentDetector,
            "KEY=value\n# COMMENTED=out\n   # indented comment = too\nplain line\nA=B=C\n",
        );
        assert_eq!(signals.env_assignments, vec!["KEY=value", "A=B=C"]);
    }

    #[test]
    fn env_lines_are_recorded_trimmed() {
        let signals = run(&EnvAssignmentDetector, "  PADDED=yes  \n");
        assert_eq!(signals.env_assignments, vec!["PADDED=yes"]);
    }

    #[test]
    fn port_lines_require_digit() {
        let signals = run(
            &PortReferenceDetector,
            "the port is open\nPORT=8080\nlistening on Port 3000\nreport: 1 issue\n",
        );
        assert_eq!(
            signals.port_references,
            vec!["PORT=8080", "listening on Port 3000", "report: 1 issue"]
        );
    }

    #[test]
    fn port_without_digits_is_ignored() {
        let signals = run(&PortReferenceDetector, "export the port\nimportant note\n");
        assert!(signals.port_references.is_empty());
    }

    #[test]
    fn frameworks_match_case_insensitively_and_deduplicate() {
        let signals = run(&FrameworkDetector, "flask Flask FLASK and some django");
        let found: Vec<_> = signals.frameworks.iter().cloned().collect();
        assert_eq!(found, vec!["Django", "Flask"]);
    }

    #[test]
    fn frameworks_use_canonical_names() {
        let signals = run(&FrameworkDetector, "const app = express();");
        assert!(signals.frameworks.contains("Express.js"));
    }

    #[test]
    fn no_marker_means_empty_set() {
        let signals = run(&FrameworkDetector, "nothing interesting here");
        assert!(signals.frameworks.is_empty());
    }

    #[test]
    fn port_assignment_line_matches_both_detectors() {
        let mut signals = FileSignals::default();
        EnvAssignmentDetector.detect("PORT=8080\n", &mut signals);
        PortReferenceDetector.detect("PORT=8080\n", &mut signals);
        assert_eq!(signals.env_assignments, vec!["PORT=8080"]);
        assert_eq!(signals.port_references, vec!["PORT=8080"]);
    }
}
