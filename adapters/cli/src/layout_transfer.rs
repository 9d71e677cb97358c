use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use grid_chase_core::{Layout, SetupError};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "chase";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const SNAPSHOT_HEADER: &str = "chase:v1";
const FIELD_DELIMITER: char = ':';

/// A level layout together with the grid size it was built for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayoutSnapshot {
    pub(crate) size: u32,
    pub(crate) layout: Layout,
}

impl LayoutSnapshot {
    /// Encodes the snapshot as `chase:v1:<N>x<N>:<base64 json>`.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&self.layout).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{SNAPSHOT_HEADER}:{0}x{0}:{encoded}", self.size))
    }

    /// Decodes and validates a snapshot produced by [`LayoutSnapshot::encode`].
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.splitn(4, FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts
            .next()
            .ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let size = parse_size(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let layout: Layout =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;
        layout.validate(size)?;

        Ok(Self { size, layout })
    }
}

/// Errors that can occur while encoding or decoding layout strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    #[error("layout string was empty")]
    EmptyPayload,
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    #[error("layout string is missing the version")]
    MissingVersion,
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    #[error("layout string is missing the payload")]
    MissingPayload,
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("could not parse square grid dimensions '{0}'")]
    InvalidDimensions(String),
    #[error("could not decode layout payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    #[error("could not parse layout payload")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("layout does not fit its grid")]
    InvalidLayout(#[from] SetupError),
}

fn parse_size(dimensions: &str) -> Result<u32, LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || columns != rows {
        return Err(invalid());
    }
    Ok(columns)
}
