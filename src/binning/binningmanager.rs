use std::rc::Rc;

use serde::Deserialize;

use crate::manager::manager::{
    IManager,
    Manager
};
use crate::manager::managererror::{
    parse_json_value,
    ManagerError
};
use crate::manager::namedobject::NamedJsonObject;
use crate::parameter::parametermanager::ParameterManager;
use super::binning::Binning;
use super::irregularbinning::IrregularBinning;
use super::parametricbingrid::ParametricBinGrid;
use super::uniformbinning::UniformBinning;

#[derive(Deserialize)]
enum BinningType {
    Uniform,
    Irregular,
    Parametric,
}

#[derive(Deserialize)]
struct BinningTypedObject {
    binning_type: BinningType,
    #[serde(default)]
    owner: Option<String>,
}

#[derive(Deserialize)]
struct UniformBinningJsonProp {
    min: f64,
    max: f64,
    bins: usize,
}

#[derive(Deserialize)]
struct IrregularBinningJsonProp {
    boundaries: Vec<f64>,
}

#[derive(Deserialize)]
struct ParametricBinGridJsonProp {
    low: String,
    high: String,
    bins: usize,
}

fn parametric_bin_grid_from_json(
    json_value: serde_json::Value,
    parameters: &ParameterManager,
) -> Result<Rc<dyn Binning>, ManagerError> {
    let prop: ParametricBinGridJsonProp = parse_json_value(json_value)?;
    let lo = parameters.get(&prop.low)?;
    let hi = parameters.get(&prop.high)?;
    Ok(Rc::new(ParametricBinGrid::new(&lo, &hi, prop.bins)?))
}

/// Builds a binning entry; an `owner` variable receives it as a named range
/// under the entry's name.
fn get_binning_from_json(
    json_value: serde_json::Value,
    parameters: &ParameterManager,
) -> Result<Rc<dyn Binning>, ManagerError> {
    let named_object = NamedJsonObject::from_json(&json_value)?;
    let typed: BinningTypedObject = parse_json_value(json_value.clone())?;
    let binning: Rc<dyn Binning> = match typed.binning_type {
        BinningType::Uniform => {
            let prop: UniformBinningJsonProp = parse_json_value(json_value)?;
            Rc::new(UniformBinning::new(prop.min, prop.max, prop.bins)?)
        }
        BinningType::Irregular => {
            let prop: IrregularBinningJsonProp = parse_json_value(json_value)?;
            Rc::new(IrregularBinning::new(prop.boundaries)?)
        }
        BinningType::Parametric => parametric_bin_grid_from_json(json_value, parameters)?,
    };
    if let Some(owner) = typed.owner {
        parameters
            .variable(&owner)?
            .attach_binning(named_object.name(), binning.clone())?;
    }
    Ok(binning)
}

pub struct BinningManager;

impl BinningManager {
    pub fn new() -> Manager<Rc<dyn Binning>, ParameterManager> {
        Manager::new(get_binning_from_json)
    }
}
