use std::path::Path;

use approx::assert_abs_diff_eq;
use serde_json::json;

use paramshape::binning::binning::BinIndex;
use paramshape::configuration::Configuration;
use paramshape::manager::manager::IManager;
use paramshape::manager::managererror::ManagerError;
use paramshape::math::density::Density;

fn model() -> serde_json::Value {
    json!({
        "parameters": [
            {"name": "x", "parameter_type": "Variable", "value": 5.0, "min": 0.0, "max": 20.0},
            {"name": "lo", "parameter_type": "Variable", "value": 0.0, "min": -5.0, "max": 5.0},
            {"name": "hi", "parameter_type": "Variable", "value": 10.0, "min": 5.0, "max": 30.0},
            {"name": "c1", "parameter_type": "Variable", "value": 0.5, "min": -1.0, "max": 1.0},
            {"name": "c2", "parameter_type": "Constant", "value": 0.0},
            {"name": "ndof", "parameter_type": "Constant", "value": 2.0}
        ],
        "binnings": [
            {"name": "window", "binning_type": "Parametric", "low": "lo", "high": "hi", "bins": 5, "owner": "x"},
            {"name": "sideband", "binning_type": "Uniform", "min": 12.0, "max": 20.0, "bins": 1, "owner": "x"}
        ],
        "expansions": [
            {"name": "bkg", "domain": "x", "coefficients": ["c1", "c2"]}
        ],
        "chi_squares": [
            {"name": "chi2", "x": "x", "ndof": "ndof"}
        ]
    })
}

#[test]
fn test_load_full_model() {
    let configuration = Configuration::new();
    configuration.from_json_value(model()).unwrap();

    assert_eq!(configuration.parameter_manager().len(), 6);
    assert_eq!(configuration.binning_manager().names(), vec!["sideband".to_owned(), "window".to_owned()]);

    let window = configuration.binning_manager().get("window").unwrap();
    assert_eq!(window.boundaries().unwrap(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    assert_eq!(window.bin_index_of(5.0).unwrap(), BinIndex::Inside(2));

    let chi2 = configuration.chi_square_manager().get("chi2").unwrap();
    assert_abs_diff_eq!(chi2.value_at(2.0).unwrap(), 0.5 * (-1.0f64).exp(), epsilon = 1e-12);
}

#[test]
fn test_parametric_range_drives_integral() {
    let configuration = Configuration::new();
    configuration.from_json_value(model()).unwrap();
    let bkg = configuration.expansion_manager().get("bkg").unwrap();

    // mapped through the declared bounds [0, 20], 0.5 + p/20 on [0, 10] is 5 + 2.5
    assert_abs_diff_eq!(bkg.integral_over(Some("window")).unwrap(), 7.5, epsilon = 1e-12);

    // 0.5 + p/10 once "window" = [0, 10] is the reference: 2 + 0.8 on [0, 4]
    let at_four = bkg.integral(0.0, 4.0, Some("window")).unwrap();
    assert_abs_diff_eq!(at_four, 2.8, epsilon = 1e-12);
    assert_eq!(bkg.selected_range().as_deref(), Some("window"));
    assert_abs_diff_eq!(bkg.integral_over(Some("window")).unwrap(), 10.0, epsilon = 1e-12);

    // moving the upper edge moves the grid and the reference range
    let parameters = configuration.parameter_manager();
    parameters.get("hi").unwrap().set_value(20.0).unwrap();
    let window = configuration.binning_manager().get("window").unwrap();
    assert_eq!(window.boundaries().unwrap(), vec![0.0, 4.0, 8.0, 12.0, 16.0, 20.0]);
    assert_abs_diff_eq!(bkg.integral(0.0, 20.0, Some("window")).unwrap(), 20.0, epsilon = 1e-12);

    // selecting no range switches back to the declared bounds of x: 0.5 + p/20 on [12, 20]
    assert_abs_diff_eq!(bkg.integral(12.0, 20.0, None).unwrap(), 10.4, epsilon = 1e-12);
    assert_eq!(bkg.selected_range(), None);
}

#[test]
fn test_missing_sections_are_empty() {
    let configuration = Configuration::new();
    configuration
        .from_json_value(json!({
            "parameters": [{"name": "x", "parameter_type": "Variable", "value": 0.0, "min": -1.0, "max": 1.0}]
        }))
        .unwrap();
    assert!(configuration.binning_manager().is_empty());
    assert!(configuration.expansion_manager().is_empty());
}

#[test]
fn test_forward_reference_fails() {
    let configuration = Configuration::new();
    let result = configuration.from_json_value(json!({
        "expansions": [{"name": "bkg", "domain": "x"}]
    }));
    assert!(matches!(result, Err(ManagerError::NameNotFound(name)) if name == "x"));
}

#[test]
fn test_missing_file() {
    let configuration = Configuration::new();
    let result = configuration.from_reader(Path::new("/nonexistent/paramshape/model.json"));
    assert!(matches!(result, Err(ManagerError::Io(_))));
}
