// Copyright (c) 2023 The MobileCoin Foundation

#![allow(dead_code)]

use mc_signature_validation::{
    BasicConstraints, Certificate, ChainValidator, DistinguishedName, Extensions, KeyUsage,
    NoRevocationCheck, ReportItem, TrustStore, Validity, ValidatorSettings,
};
use std::time::Duration;

pub const LEAF_CERT: &str = include_str!("../data/leaf_cert.pem");
pub const PROCESSOR_CA: &str = include_str!("../data/processor_ca.pem");
pub const ROOT_CA: &str = include_str!("../data/root_ca.pem");
pub const PROCESSOR_CA_CRL: &[u8] = include_bytes!("../data/processor_ca.crl");

/// The time validations of the synthetic chain are performed at.
pub const NOW: Duration = Duration::from_secs(1_700_000_000);
const YEAR: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A signing certificate, the CA that issued it and the root CA.
pub struct Chain {
    pub leaf: Certificate,
    pub intermediate: Certificate,
    pub root: Certificate,
}

/// A validity interval of one year on either side of [`NOW`].
pub fn current_validity() -> Validity {
    Validity::new(NOW - YEAR, NOW + YEAR)
}

fn ca_extensions(path_len_constraint: u8) -> Extensions {
    Extensions::new()
        .with_key_usage([KeyUsage::KeyCertSign, KeyUsage::CrlSign])
        .with_basic_constraints(BasicConstraints {
            ca: true,
            path_len_constraint: Some(path_len_constraint),
        })
}

pub fn name(name: &str) -> DistinguishedName {
    name.parse().expect("Failed to parse name")
}

pub fn leaf_issued_by(issuer: &DistinguishedName, validity: Validity) -> Certificate {
    Certificate::new(
        name("CN=Signer,O=Example"),
        issuer.clone(),
        [0x30u8, 0x01],
        validity,
    )
    .with_extensions(
        Extensions::new()
            .with_key_usage([KeyUsage::DigitalSignature, KeyUsage::NonRepudiation])
            .with_basic_constraints(BasicConstraints::default()),
    )
}

pub fn intermediate_with_validity(validity: Validity) -> Certificate {
    Certificate::new(
        name("CN=Intermediate CA,O=Example"),
        name("CN=Root CA,O=Example"),
        [0x20u8],
        validity,
    )
    .with_extensions(ca_extensions(0))
}

pub fn root() -> Certificate {
    Certificate::new(
        name("CN=Root CA,O=Example"),
        name("CN=Root CA,O=Example"),
        [0x10u8],
        current_validity(),
    )
    .with_extensions(ca_extensions(1))
}

/// A chain where every certificate is valid at [`NOW`].
pub fn chain() -> Chain {
    let intermediate = intermediate_with_validity(current_validity());
    Chain {
        leaf: leaf_issued_by(intermediate.subject(), current_validity()),
        intermediate,
        root: root(),
    }
}

/// A validator with default settings and an empty trust store.
pub fn validator() -> ChainValidator<NoRevocationCheck> {
    ChainValidator::new(TrustStore::new(), ValidatorSettings::default())
}

pub fn trusted_message(certificate: &Certificate) -> String {
    format!(
        "Certificate {} is trusted, revocation data checks are not required.",
        certificate.subject()
    )
}

pub fn no_issuer_message(certificate: &Certificate) -> String {
    format!(
        "Certificate {} isn't trusted and issuer certificate isn't provided.",
        certificate.subject()
    )
}

/// Assert `item` is the trust anchor item for `certificate`.
pub fn assert_trusted_item(item: &ReportItem<'_>, certificate: &Certificate) {
    assert_eq!(item.certificate(), certificate);
    assert_eq!(item.check_name(), "Certificate check.");
    assert_eq!(item.message(), trusted_message(certificate));
}

/// Assert the failures are exactly the failing items of the logs, in order.
pub fn assert_failures_are_filtered_logs(
    report: &mc_signature_validation::ValidationReport<'_>,
) {
    let filtered = report
        .logs()
        .iter()
        .filter(|item| item.severity().is_failure())
        .collect::<Vec<_>>();
    assert_eq!(report.failures(), filtered);
}
