//! Non-fatal diagnostics boundary.
//!
//! Nothing encountered while mirroring aborts a run. Omitted members,
//! collections and configurations are reported here instead.

use crate::prelude::*;
use std::sync::{Mutex, PoisonError};

///
/// DiagnosticCode
///

#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum DiagnosticCode {
    /// Configuration whose entity produced no mirror.
    SkippedConfiguration,

    /// Exposed collection whose element has no local declaration.
    SkippedExposedCollection,

    /// Discovered reference with no declaration in the model.
    UnresolvedEntity,
}

impl DiagnosticCode {
    /// Stable identifier for hosts that filter or suppress diagnostics.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::SkippedExposedCollection => "MIRROR001",
            Self::SkippedConfiguration => "MIRROR002",
            Self::UnresolvedEntity => "MIRROR003",
        }
    }
}

///
/// Severity
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

///
/// Diagnostic
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,

    /// Declaration the report is about (root, configuration, or entity).
    pub subject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    pub message: String,
}

impl Diagnostic {
    /// Root exposes a collection of a type with no local declaration.
    #[must_use]
    pub fn skipped_exposed_collection(root: &str, member: &str, ty: &str) -> Self {
        Self {
            code: DiagnosticCode::SkippedExposedCollection,
            severity: Severity::Info,
            subject: root.to_string(),
            member: Some(member.to_string()),
            ty: Some(ty.to_string()),
            message: format!(
                "root '{root}' collection '{member}' uses external type '{ty}' and is skipped from read-only generation"
            ),
        }
    }

    #[must_use]
    pub fn skipped_configuration(configuration: &str, entity: &str) -> Self {
        Self {
            code: DiagnosticCode::SkippedConfiguration,
            severity: Severity::Info,
            subject: configuration.to_string(),
            member: None,
            ty: Some(entity.to_string()),
            message: format!(
                "configuration '{configuration}' maps entity '{entity}', which has no read-only mirror"
            ),
        }
    }

    #[must_use]
    pub fn unresolved_entity(entity: &str) -> Self {
        Self {
            code: DiagnosticCode::UnresolvedEntity,
            severity: Severity::Warning,
            subject: entity.to_string(),
            member: None,
            ty: None,
            message: format!("entity '{entity}' has no declaration and is not mirrored"),
        }
    }
}

///
/// DiagnosticSink
///

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

///
/// DiagnosticLog
/// Collecting sink.
///

#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_collects_in_report_order() {
        let log = DiagnosticLog::new();
        log.report(Diagnostic::unresolved_entity("Ghost"));
        log.report(Diagnostic::skipped_configuration("GhostConfig", "Ghost"));

        let codes: Vec<_> = log.into_entries().into_iter().map(|d| d.code).collect();

        assert_eq!(
            codes,
            [
                DiagnosticCode::UnresolvedEntity,
                DiagnosticCode::SkippedConfiguration
            ]
        );
    }

    #[test]
    fn skipped_collection_names_root_member_and_type() {
        let diag = Diagnostic::skipped_exposed_collection("ShopContext", "Audits", "AuditRecord");

        assert_eq!(diag.code.id(), "MIRROR001");
        assert_eq!(diag.severity, Severity::Info);
        assert_eq!(diag.member.as_deref(), Some("Audits"));
        assert!(diag.message.contains("ShopContext"));
        assert!(diag.message.contains("AuditRecord"));
    }
}
