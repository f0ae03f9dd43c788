// Copyright (c) 2023 The MobileCoin Foundation

//! The structured outcome of a certificate chain validation.
//!
//! A [`ValidationReport`] is an append only log of [`ReportItem`]s in the
//! order the checks were performed. The overall [`ValidationResult`] is
//! derived from the failures in the log, it is never stored.

use crate::{Certificate, Error};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};

/// The indentation used for each item when displaying a report.
pub const MESSAGE_INDENT: usize = 2;

/// Check name for trust and issuer resolution items.
pub const CERTIFICATE_CHECK: &str = "Certificate check.";
/// Check name for validity period items.
pub const VALIDITY_CHECK: &str = "Certificate validity period check.";
/// Check name for required extension items, both call scoped and global.
pub const EXTENSIONS_CHECK: &str = "Required certificate extensions check.";
/// Check name for revocation items.
pub const REVOCATION_CHECK: &str = "Certificate revocation check.";

/// How a single report item affects the overall result.
///
/// The variant order is important here, the higher the index the worse the
/// severity.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    /// Informational, the check succeeded.
    Info,
    /// The check could not be concluded.
    Indeterminate,
    /// The check proved the chain is broken.
    Invalid,
}

impl Severity {
    /// Returns `true` for the severities that count as failures.
    pub fn is_failure(&self) -> bool {
        *self != Severity::Info
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Severity::Info => "INFO",
            Severity::Indeterminate => "INDETERMINATE",
            Severity::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// The overall verdict of a [`ValidationReport`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValidationResult {
    /// No failures were recorded.
    Valid,
    /// Every recorded failure is indeterminate.
    Indeterminate,
    /// At least one recorded failure is invalid.
    Invalid,
}

impl Display for ValidationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ValidationResult::Valid => "VALID",
            ValidationResult::Indeterminate => "INDETERMINATE",
            ValidationResult::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// A single check performed against a certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportItem<'a> {
    certificate: &'a Certificate,
    check_name: &'static str,
    message: String,
    severity: Severity,
    cause: Option<Error>,
}

impl<'a> ReportItem<'a> {
    /// Create a new instance without an underlying cause.
    pub fn new(
        certificate: &'a Certificate,
        check_name: &'static str,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            certificate,
            check_name,
            message: message.into(),
            severity,
            cause: None,
        }
    }

    /// Attach the error that caused this item.
    pub fn with_cause(mut self, cause: Error) -> Self {
        self.cause = Some(cause);
        self
    }

    /// The certificate the check was performed on.
    pub fn certificate(&self) -> &'a Certificate {
        self.certificate
    }

    /// The name of the check.
    pub fn check_name(&self) -> &'static str {
        self.check_name
    }

    /// A human readable description of the outcome.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// How this item affects the overall result.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The underlying error, if any.
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }
}

impl Display for ReportItem<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {} {}", self.severity, self.check_name, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({cause})")?;
        }
        Ok(())
    }
}

/// The ordered log of every check performed during one validation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationReport<'a> {
    logs: Vec<ReportItem<'a>>,
}

impl<'a> ValidationReport<'a> {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_item(&mut self, item: ReportItem<'a>) {
        self.logs.push(item);
    }

    /// Every item in the order the checks were performed.
    pub fn logs(&self) -> &[ReportItem<'a>] {
        &self.logs
    }

    /// The indeterminate and invalid items, in the order they were
    /// performed.
    pub fn failures(&self) -> Vec<&ReportItem<'a>> {
        self.logs
            .iter()
            .filter(|item| item.severity.is_failure())
            .collect()
    }

    /// The overall verdict.
    ///
    /// An invalid failure anywhere makes the report invalid. Indeterminate
    /// failures alone make it indeterminate.
    pub fn validation_result(&self) -> ValidationResult {
        match self.logs.iter().map(ReportItem::severity).max() {
            Some(Severity::Invalid) => ValidationResult::Invalid,
            Some(Severity::Indeterminate) => ValidationResult::Indeterminate,
            Some(Severity::Info) | None => ValidationResult::Valid,
        }
    }
}

impl Display for ValidationReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Validation result: {}", self.validation_result())?;
        for item in &self.logs {
            write!(f, "\n{:pad$}- {item}", "", pad = MESSAGE_INDENT)?;
        }
        Ok(())
    }
}
