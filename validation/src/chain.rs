// Copyright (c) 2023 The MobileCoin Foundation

//! Validation of a certificate and the chain of issuers above it.
//!
//! Starting from the certificate being validated, each certificate is
//! checked in turn:
//!
//! 1. Its validity period must contain the validation time.
//! 2. It must meet the required extensions. The certificate being validated
//!    is checked against the requirements given for the call, every other
//!    certificate against the global requirements in [`ValidatorSettings`].
//! 3. If it's a trust anchor the walk ends successfully. Otherwise its
//!    issuer is looked up in the [`TrustStore`], checked for revocation,
//!    and becomes the next certificate. Without an issuer the walk ends
//!    indeterminate.
//!
//! Every finding is recorded in the [`ValidationReport`]. When
//! [`ValidatorSettings::proceed_after_fail`] is `false` the walk stops at the
//! first failure.

use crate::report::{CERTIFICATE_CHECK, VALIDITY_CHECK};
use crate::{
    Certificate, Error, ExtensionPolicy, ExtensionRequirement, NoRevocationCheck, ReportItem,
    RequirementScope, RevocationChecker, Severity, TrustClass, TrustStore, ValidationReport,
    ValidatorSettings,
};
use alloc::format;
use alloc::vec::Vec;
use core::ops::ControlFlow;
use core::time::Duration;

/// The most certificates a walk visits before giving up on finding a trust
/// anchor.
pub const MAX_CHAIN_DEPTH: usize = 32;

/// The outcome of checking one certificate of the chain.
#[derive(Debug)]
enum Step<'a> {
    /// Check the issuer next.
    Continue(&'a Certificate),
    /// The walk is over, the verdict is in the report.
    Terminate,
}

/// Validates certificates against a [`TrustStore`] and [`ValidatorSettings`].
///
/// Configure it once, then share it by reference. Validation doesn't mutate
/// the validator, so concurrent calls on a shared instance are safe.
#[derive(Clone, Debug, Default)]
pub struct ChainValidator<R = NoRevocationCheck> {
    trust_store: TrustStore,
    settings: ValidatorSettings,
    revocation_checker: R,
}

impl ChainValidator<NoRevocationCheck> {
    /// Create a new instance which doesn't check revocation.
    pub fn new(trust_store: TrustStore, settings: ValidatorSettings) -> Self {
        Self {
            trust_store,
            settings,
            revocation_checker: NoRevocationCheck,
        }
    }
}

impl<R: RevocationChecker> ChainValidator<R> {
    /// Use `revocation_checker` for every certificate whose issuer is
    /// resolved.
    pub fn with_revocation_checker<C: RevocationChecker>(
        self,
        revocation_checker: C,
    ) -> ChainValidator<C> {
        ChainValidator {
            trust_store: self.trust_store,
            settings: self.settings,
            revocation_checker,
        }
    }

    /// Replace the trust anchors.
    pub fn set_trusted_certificates(
        &mut self,
        certificates: impl IntoIterator<Item = Certificate>,
    ) -> &mut Self {
        self.trust_store.set_trusted(certificates);
        self
    }

    /// Replace the certificates available for issuer lookup.
    pub fn set_known_certificates(
        &mut self,
        certificates: impl IntoIterator<Item = Certificate>,
    ) -> &mut Self {
        self.trust_store.set_known(certificates);
        self
    }

    /// Replace the requirements applied to every certificate in the chain
    /// except the one being validated.
    pub fn set_global_required_extensions(
        &mut self,
        requirements: impl IntoIterator<Item = ExtensionRequirement>,
    ) -> &mut Self {
        self.settings.set_global_required_extensions(requirements);
        self
    }

    /// Whether to keep checking after the first failure.
    pub fn proceed_validation_after_fail(&mut self, proceed: bool) -> &mut Self {
        self.settings.set_proceed_after_fail(proceed);
        self
    }

    /// The trust store
    pub fn trust_store(&self) -> &TrustStore {
        &self.trust_store
    }

    /// The settings
    pub fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    /// The revocation checker
    pub fn revocation_checker(&self) -> &R {
        &self.revocation_checker
    }

    /// Validate `certificate` and its chain at `unix_time`.
    ///
    /// Validation problems never surface as errors, they are recorded in the
    /// returned report.
    ///
    /// # Arguments:
    /// * `certificate` - The certificate to validate.
    /// * `unix_time` - The time of validation, as a duration since the UNIX
    ///   epoch.
    /// * `required_extensions` - Requirements that only `certificate` must
    ///   meet.
    pub fn validate_certificate<'a>(
        &'a self,
        certificate: &'a Certificate,
        unix_time: Duration,
        required_extensions: Option<&[ExtensionRequirement]>,
    ) -> ValidationReport<'a> {
        let mut report = ValidationReport::new();
        let mut visited = Vec::new();
        let leaf_policy =
            ExtensionPolicy::new(RequirementScope::Call, required_extensions.unwrap_or(&[]));
        let global_policy = ExtensionPolicy::new(
            RequirementScope::Global,
            self.settings.global_required_extensions(),
        );

        let mut current = certificate;
        let mut policy = &leaf_policy;
        loop {
            tracing::trace!(subject = %current.subject(), "checking certificate");
            visited.push(current);
            match self.check_certificate(current, unix_time, policy, &visited, &mut report) {
                Step::Continue(issuer) => {
                    current = issuer;
                    policy = &global_policy;
                }
                Step::Terminate => break,
            }
        }

        tracing::debug!(
            subject = %certificate.subject(),
            result = %report.validation_result(),
            "certificate validation done"
        );
        report
    }

    fn check_certificate<'a>(
        &'a self,
        certificate: &'a Certificate,
        unix_time: Duration,
        policy: &ExtensionPolicy<'_>,
        visited: &[&'a Certificate],
        report: &mut ValidationReport<'a>,
    ) -> Step<'a> {
        let subject = certificate.subject();

        if let Err(cause) = certificate.validity().check(unix_time) {
            let message = match cause {
                Error::CertificateNotYetValid => format!("Certificate {subject} is not yet valid."),
                _ => format!("Certificate {subject} is expired."),
            };
            let item = ReportItem::new(certificate, VALIDITY_CHECK, message, Severity::Invalid)
                .with_cause(cause);
            if self.record(report, item).is_break() {
                return Step::Terminate;
            }
        }

        if let Some(item) = policy.check(certificate) {
            if self.record(report, item).is_break() {
                return Step::Terminate;
            }
        }

        if self.trust_store.classify(certificate) == TrustClass::Trusted {
            let message =
                format!("Certificate {subject} is trusted, revocation data checks are not required.");
            Self::push(
                report,
                ReportItem::new(certificate, CERTIFICATE_CHECK, message, Severity::Info),
            );
            return Step::Terminate;
        }

        let issuer = if visited.len() < MAX_CHAIN_DEPTH {
            self.trust_store
                .issuer_candidates(certificate)
                .find(|candidate| !visited.contains(candidate))
        } else {
            tracing::warn!(%subject, "maximum chain depth reached");
            None
        };

        let Some(issuer) = issuer else {
            let message =
                format!("Certificate {subject} isn't trusted and issuer certificate isn't provided.");
            Self::push(
                report,
                ReportItem::new(certificate, CERTIFICATE_CHECK, message, Severity::Indeterminate),
            );
            return Step::Terminate;
        };

        if let Some(item) = self
            .revocation_checker
            .check(certificate, issuer, unix_time)
        {
            if self.record(report, item).is_break() {
                return Step::Terminate;
            }
        }

        Step::Continue(issuer)
    }

    /// Append `item` to `report`, breaking when it's a failure that should
    /// stop the walk.
    fn record<'a>(
        &self,
        report: &mut ValidationReport<'a>,
        item: ReportItem<'a>,
    ) -> ControlFlow<()> {
        let stop = item.severity().is_failure() && !self.settings.proceed_after_fail();
        Self::push(report, item);
        if stop {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn push<'a>(report: &mut ValidationReport<'a>, item: ReportItem<'a>) {
        tracing::debug!(
            check = item.check_name(),
            subject = %item.certificate().subject(),
            severity = %item.severity(),
            "{}",
            item.message()
        );
        report.add_item(item);
    }
}
