use std::cell::{
    RefCell,
    RefMut
};
use std::collections::HashMap;
use std::rc::Rc;

use serde::Deserialize;

use crate::manager::manager::IManager;
use crate::manager::managererror::{
    parse_json_value,
    ManagerError
};
use crate::manager::namedobject::NamedJsonObject;
use super::constantfunction::ConstantFunction;
use super::derivedfunction::DerivedFunction;
use super::realfunction::RealFunction;
use super::realvariable::RealVariable;

// ─────────────────────────────────────────────────────────────────────────────
// JSON entries
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
enum ParameterType {
    Variable,
    Constant,
    Linear,
}

#[derive(Deserialize)]
struct ParameterTypedObject {
    parameter_type: ParameterType,
}

#[derive(Deserialize)]
struct VariableJsonProp {
    name: String,
    value: f64,
    min: f64,
    max: f64,
    #[serde(default)]
    ranges: HashMap<String, (f64, f64)>,
}

#[derive(Deserialize)]
struct ConstantJsonProp {
    name: String,
    value: f64,
}

#[derive(Deserialize)]
struct LinearJsonProp {
    name: String,
    source: String,
    #[serde(default = "unit_slope")]
    slope: f64,
    #[serde(default)]
    offset: f64,
}

fn unit_slope() -> f64 {
    1.0
}

// ─────────────────────────────────────────────────────────────────────────────
// ParameterManager
// ─────────────────────────────────────────────────────────────────────────────

/// Registry of every named `RealFunction`, with variables also kept under
/// their concrete type so densities can use them as domains.
///
/// `Linear` entries resolve their `source` against entries loaded earlier.
pub struct ParameterManager {
    map_cell: RefCell<HashMap<String, Rc<dyn RealFunction>>>,
    variable_cell: RefCell<HashMap<String, Rc<RealVariable>>>,
}

impl ParameterManager {
    pub fn new() -> ParameterManager {
        ParameterManager {
            map_cell: RefCell::new(HashMap::new()),
            variable_cell: RefCell::new(HashMap::new()),
        }
    }

    pub fn variable(&self, name: &str) -> Result<Rc<RealVariable>, ManagerError> {
        if let Some(variable) = self.variable_cell.borrow().get(name) {
            return Ok(variable.clone());
        }
        if self.contains(name) {
            Err(ManagerError::NotAVariable(name.to_owned()))
        } else {
            Err(ManagerError::NameNotFound(name.to_owned()))
        }
    }

    pub fn insert_variable(&self, variable: Rc<RealVariable>) -> Result<(), ManagerError> {
        let name = variable.name().to_owned();
        let function: Rc<dyn RealFunction> = variable.clone();
        self.insert(&name, function)?;
        self.variable_cell.borrow_mut().insert(name, variable);
        Ok(())
    }

    fn variable_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let prop: VariableJsonProp = parse_json_value(json_value)?;
        let variable = RealVariable::new(prop.name, prop.value, prop.min, prop.max)?;
        let mut ranges: Vec<(String, (f64, f64))> = prop.ranges.into_iter().collect();
        ranges.sort_by(|a, b| a.0.cmp(&b.0));
        for (range_name, (lo, hi)) in ranges {
            variable.set_named_range(&range_name, lo, hi)?;
        }
        self.insert_variable(Rc::new(variable))
    }

    fn constant_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let prop: ConstantJsonProp = parse_json_value(json_value)?;
        let function: Rc<dyn RealFunction> = Rc::new(ConstantFunction::new(prop.name.clone(), prop.value));
        self.insert(&prop.name, function)
    }

    fn linear_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let prop: LinearJsonProp = parse_json_value(json_value)?;
        let source = self.get(&prop.source)?;
        let function: Rc<dyn RealFunction> =
            Rc::new(DerivedFunction::linear(prop.name.clone(), source, prop.slope, prop.offset));
        self.insert(&prop.name, function)
    }
}

impl Default for ParameterManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IManager<Rc<dyn RealFunction>, ()> for ParameterManager {
    fn map(&self) -> RefMut<'_, HashMap<String, Rc<dyn RealFunction>>> {
        self.map_cell.borrow_mut()
    }

    fn insert_obj_from_json(&self, json_value: serde_json::Value, _supports: &()) -> Result<(), ManagerError> {
        let named_object = NamedJsonObject::from_json(&json_value)?;
        if self.contains(named_object.name()) {
            return Err(ManagerError::DuplicateName(named_object.name().to_owned()));
        }
        let typed: ParameterTypedObject = parse_json_value(json_value.clone())?;
        match typed.parameter_type {
            ParameterType::Variable => self.variable_from_json(json_value),
            ParameterType::Constant => self.constant_from_json(json_value),
            ParameterType::Linear => self.linear_from_json(json_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_parameters() {
        let manager = ParameterManager::new();
        manager
            .insert_obj_from_json_vec(
                &[
                    json!({"name": "x", "parameter_type": "Variable", "value": 1.0, "min": 0.0, "max": 10.0,
                           "ranges": {"signal": [2.0, 5.0]}}),
                    json!({"name": "c1", "parameter_type": "Constant", "value": 0.25}),
                    json!({"name": "edge", "parameter_type": "Linear", "source": "x", "slope": 2.0, "offset": 1.0}),
                ],
                &(),
            )
            .unwrap();

        let x = manager.variable("x").unwrap();
        assert_eq!(x.range(Some("signal")).unwrap(), (2.0, 5.0));
        assert_eq!(manager.get("c1").unwrap().value(), 0.25);

        let edge = manager.get("edge").unwrap();
        assert_eq!(edge.value(), 3.0);
        x.set_value(4.0).unwrap();
        assert_eq!(edge.value(), 9.0);

        assert!(matches!(manager.variable("c1"), Err(ManagerError::NotAVariable(_))));
        assert!(matches!(manager.variable("nope"), Err(ManagerError::NameNotFound(_))));
    }

    #[test]
    fn test_linear_needs_earlier_source() {
        let manager = ParameterManager::new();
        let result = manager.insert_obj_from_json(
            json!({"name": "edge", "parameter_type": "Linear", "source": "later"}),
            &(),
        );
        assert!(matches!(result, Err(ManagerError::NameNotFound(name)) if name == "later"));
    }

    #[test]
    fn test_invalid_variable() {
        let manager = ParameterManager::new();
        let result = manager.insert_obj_from_json(
            json!({"name": "x", "parameter_type": "Variable", "value": 0.0, "min": 1.0, "max": 1.0}),
            &(),
        );
        assert!(matches!(result, Err(ManagerError::Parameter(_))));
        assert!(manager.is_empty());
    }
}
