use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::binning::binning::BinningError;
use crate::math::densityerror::DensityError;
use crate::parameter::realfunction::ParameterError;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("key '{0}' not found")]
    NameNotFound(String),

    #[error("key '{0}' is already defined")]
    DuplicateName(String),

    #[error("'{0}' is not a variable")]
    NotAVariable(String),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Binning(#[from] BinningError),

    #[error(transparent)]
    Density(#[from] DensityError),
}

/// Deserializes one configuration entry into its typed properties.
pub fn parse_json_value<T>(json_value: serde_json::Value) -> Result<T, ManagerError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(json_value)?)
}
