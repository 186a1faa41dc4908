// ABOUTME: Diagnostics accumulator for non-fatal warnings during a release.
// ABOUTME: Collects warnings that shouldn't fail a phase but should be shown to users.

/// Collects non-fatal warnings during pipeline phases.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Take the collected warnings, leaving the accumulator empty.
    pub fn drain(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}

/// A non-fatal warning collected during a phase.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The object store returned no integrity tag for the artifact.
    pub fn missing_e_tag(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MissingETag,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Upload succeeded without an ETag; the revision is deployed unpinned.
    MissingETag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_and_drains_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::missing_e_tag("no ETag for releases/app.zip"));
        diag.warn(Warning::missing_e_tag("no ETag for releases/other.zip"));

        assert_eq!(diag.warnings().len(), 2);
        let drained = diag.drain();
        assert_eq!(drained.len(), 2);
        assert!(!diag.has_warnings());
    }

    #[test]
    fn warning_constructor_sets_kind() {
        assert_eq!(Warning::missing_e_tag("x").kind, WarningKind::MissingETag);
    }
}
