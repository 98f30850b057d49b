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
use crate::parameter::parametermanager::ParameterManager;
use super::chisquaredensity::ChiSquareDensity;

#[derive(Deserialize)]
struct ChiSquareJsonProp {
    x: String,
    ndof: String,
}

fn get_chi_square_from_json(
    json_value: serde_json::Value,
    parameters: &ParameterManager,
) -> Result<Rc<ChiSquareDensity>, ManagerError> {
    let prop: ChiSquareJsonProp = parse_json_value(json_value)?;
    let x = parameters.variable(&prop.x)?;
    let ndof = parameters.get(&prop.ndof)?;
    Ok(Rc::new(ChiSquareDensity::new(x, ndof)))
}

pub struct ChiSquareManager;

impl ChiSquareManager {
    pub fn new() -> Manager<Rc<ChiSquareDensity>, ParameterManager> {
        Manager::new(get_chi_square_from_json)
    }
}
