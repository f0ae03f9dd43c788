// Copyright (c) 2023 The MobileCoin Foundation

//! Errors that can occur while loading certificates or settings, and the
//! causes recorded on validation report items.

use alloc::string::{String, ToString};

/// Result type for certificate loading and settings.
pub type Result<T> = core::result::Result<T, Error>;

/// Error working with certificates and validation settings
#[derive(displaydoc::Display, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The certificate is not yet valid
    CertificateNotYetValid,
    /// The certificate has expired
    CertificateExpired,
    /// The certificate has been revoked
    CertificateRevoked,
    /// An error occurred decoding the certificate: {0}
    CertificateDecoding(der::Error),
    /// An error occurred decoding a certificate extension: {0}
    ExtensionDecoding(der::Error),
    /// An error occurred parsing a distinguished name: {0}
    Name(der::Error),
    /// Error parsing validator settings: {0}
    Settings(String),
}

impl From<der::Error> for Error {
    fn from(src: der::Error) -> Self {
        Error::CertificateDecoding(src)
    }
}

impl From<serde_json::Error> for Error {
    fn from(src: serde_json::Error) -> Self {
        Error::Settings(src.to_string())
    }
}
