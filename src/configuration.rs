use std::cell::{
    Ref,
    RefCell
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use crate::binning::binning::Binning;
use crate::binning::binningmanager::BinningManager;
use crate::manager::managererror::{
    parse_json_value,
    ManagerError
};
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::math::chebychev::expansionmanager::ExpansionManager;
use crate::math::chebychev::polynomialexpansion::PolynomialExpansion;
use crate::math::chisquare::chisquaredensity::ChiSquareDensity;
use crate::math::chisquare::chisquaremanager::ChiSquareManager;
use crate::parameter::parametermanager::ParameterManager;

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    parameters: Vec<serde_json::Value>,
    #[serde(default)]
    binnings: Vec<serde_json::Value>,
    #[serde(default)]
    expansions: Vec<serde_json::Value>,
    #[serde(default)]
    chi_squares: Vec<serde_json::Value>,
}

/// Every registry of a model, filled from one JSON document.
///
/// Sections load in dependency order: parameters, binnings, expansions,
/// chi-square densities. Entries may only refer to names loaded before them.
pub struct Configuration {
    parameter_manager_cell: RefCell<ParameterManager>,
    binning_manager_cell: RefCell<Manager<Rc<dyn Binning>, ParameterManager>>,
    expansion_manager_cell: RefCell<Manager<Rc<PolynomialExpansion>, ParameterManager>>,
    chi_square_manager_cell: RefCell<Manager<Rc<ChiSquareDensity>, ParameterManager>>,
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            parameter_manager_cell: RefCell::new(ParameterManager::new()),
            binning_manager_cell: RefCell::new(BinningManager::new()),
            expansion_manager_cell: RefCell::new(ExpansionManager::new()),
            chi_square_manager_cell: RefCell::new(ChiSquareManager::new()),
        }
    }

    pub fn parameter_manager(&self) -> Ref<'_, ParameterManager> {
        self.parameter_manager_cell.borrow()
    }

    pub fn binning_manager(&self) -> Ref<'_, Manager<Rc<dyn Binning>, ParameterManager>> {
        self.binning_manager_cell.borrow()
    }

    pub fn expansion_manager(&self) -> Ref<'_, Manager<Rc<PolynomialExpansion>, ParameterManager>> {
        self.expansion_manager_cell.borrow()
    }

    pub fn chi_square_manager(&self) -> Ref<'_, Manager<Rc<ChiSquareDensity>, ParameterManager>> {
        self.chi_square_manager_cell.borrow()
    }

    pub fn from_reader(&self, file_path: &Path) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        log::info!("loading configuration from {}", file_path.display());
        self.from_json_value(json_value)
    }

    pub fn from_json_value(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let json_prop: ConfigurationJsonProp = parse_json_value(json_value)?;
        let parameters = self.parameter_manager_cell.borrow();
        parameters.insert_obj_from_json_vec(&json_prop.parameters, &())?;
        self.binning_manager_cell
            .borrow()
            .insert_obj_from_json_vec(&json_prop.binnings, &*parameters)?;
        self.expansion_manager_cell
            .borrow()
            .insert_obj_from_json_vec(&json_prop.expansions, &*parameters)?;
        self.chi_square_manager_cell
            .borrow()
            .insert_obj_from_json_vec(&json_prop.chi_squares, &*parameters)?;
        log::info!(
            "configuration loaded: {} parameters, {} binnings, {} expansions, {} chi-square densities",
            json_prop.parameters.len(),
            json_prop.binnings.len(),
            json_prop.expansions.len(),
            json_prop.chi_squares.len()
        );
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
