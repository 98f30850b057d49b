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
use crate::parameter::realfunction::RealFunction;
use super::polynomialexpansion::PolynomialExpansion;

#[derive(Deserialize)]
struct PolynomialExpansionJsonProp {
    domain: String,
    #[serde(default)]
    coefficients: Vec<String>,
    #[serde(default)]
    normalization_range: Option<String>,
}

fn get_expansion_from_json(
    json_value: serde_json::Value,
    parameters: &ParameterManager,
) -> Result<Rc<PolynomialExpansion>, ManagerError> {
    let prop: PolynomialExpansionJsonProp = parse_json_value(json_value)?;
    let domain = parameters.variable(&prop.domain)?;
    let coefficients = prop
        .coefficients
        .iter()
        .map(|name| parameters.get(name))
        .collect::<Result<Vec<Rc<dyn RealFunction>>, ManagerError>>()?;
    let expansion = PolynomialExpansion::new(domain, coefficients);
    if let Some(range_name) = prop.normalization_range.as_deref() {
        expansion.on_range_selected(Some(range_name));
        expansion.reference_range()?;
    }
    Ok(Rc::new(expansion))
}

pub struct ExpansionManager;

impl ExpansionManager {
    pub fn new() -> Manager<Rc<PolynomialExpansion>, ParameterManager> {
        Manager::new(get_expansion_from_json)
    }
}
