use thiserror::Error;

/// Parse errors for the wire forms of tariff values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TariffError {
    #[error("Unknown visit kind: {0}")]
    UnknownKind(String),

    #[error("Unknown shift: {0}")]
    UnknownShift(String),

    #[error("Unknown tariff type: {0}")]
    UnknownTariffType(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
