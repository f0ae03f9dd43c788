// Copyright (c) 2023 The MobileCoin Foundation

#![doc = include_str!("../README.md")]
#![deny(missing_docs, missing_debug_implementations, unsafe_code)]
#![no_std]

extern crate alloc;

mod certificate;
mod chain;
mod error;
mod extensions;
mod name;
mod report;
mod revocation;
mod settings;
mod trust_store;
pub mod x509;

pub use crate::certificate::{
    BasicConstraints, Certificate, Extensions, KeyUsage, Validity, BASIC_CONSTRAINTS_OID,
    EXTENDED_KEY_USAGE_OID, KEY_USAGE_OID,
};
pub use crate::chain::{ChainValidator, MAX_CHAIN_DEPTH};
pub use crate::error::{Error, Result};
pub use crate::extensions::{ExtensionPolicy, ExtensionRequirement, RequirementScope};
pub use crate::name::DistinguishedName;
pub use crate::report::{
    ReportItem, Severity, ValidationReport, ValidationResult, CERTIFICATE_CHECK,
    EXTENSIONS_CHECK, MESSAGE_INDENT, REVOCATION_CHECK, VALIDITY_CHECK,
};
pub use crate::revocation::{
    CrlRevocationChecker, NoRevocationCheck, RevocationChecker, RevokedCertificate,
};
pub use crate::settings::ValidatorSettings;
pub use crate::trust_store::{TrustClass, TrustStore};
