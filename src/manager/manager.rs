use std::cell::{
    RefCell,
    RefMut
};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json;

use super::managererror::{
    parse_json_value,
    ManagerError
};
use super::namedobject::NamedJsonObject;

/// Registry of named objects built from JSON entries.
///
/// `S` is whatever the builder needs to resolve references to other objects
/// (for instance the parameter registry when building densities).
pub trait IManager<V, S>
where
    V: Clone,
{
    fn map(&self) -> RefMut<'_, HashMap<String, V>>;

    fn insert_obj_from_json(&self, json_value: serde_json::Value, supports: &S) -> Result<(), ManagerError>;

    fn get(&self, name: &str) -> Result<V, ManagerError> {
        let map = self.map();
        map.get(name)
            .cloned()
            .ok_or_else(|| ManagerError::NameNotFound(name.to_owned()))
    }

    fn contains(&self, name: &str) -> bool {
        self.map().contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map().keys().cloned().collect();
        names.sort();
        names
    }

    fn len(&self) -> usize {
        self.map().len()
    }

    fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    fn insert(&self, name: &str, obj: V) -> Result<(), ManagerError> {
        let mut map = self.map();
        if map.contains_key(name) {
            return Err(ManagerError::DuplicateName(name.to_owned()));
        }
        map.insert(name.to_owned(), obj);
        Ok(())
    }

    fn insert_obj_from_json_vec(&self, json_vec: &[serde_json::Value], supports: &S) -> Result<(), ManagerError> {
        for j in json_vec.iter() {
            self.insert_obj_from_json(j.clone(), supports)?;
        }
        Ok(())
    }

    /// Loads a JSON file holding either one entry or an array of entries.
    fn from_reader(&self, file_path: &Path, supports: &S) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        if json_value.is_array() {
            let json_array: Vec<serde_json::Value> = parse_json_value(json_value)?;
            self.insert_obj_from_json_vec(&json_array, supports)
        } else {
            self.insert_obj_from_json(json_value, supports)
        }
    }
}

pub struct Manager<V, S = ()> {
    map_cell: RefCell<HashMap<String, V>>,
    get_obj_from_json: fn(serde_json::Value, &S) -> Result<V, ManagerError>,
}

impl<V, S> Manager<V, S>
where
    V: Clone,
{
    pub fn new(get_obj_from_json: fn(serde_json::Value, &S) -> Result<V, ManagerError>) -> Manager<V, S> {
        Manager { map_cell: RefCell::new(HashMap::new()), get_obj_from_json }
    }
}

impl<V, S> IManager<V, S> for Manager<V, S>
where
    V: Clone,
{
    fn map(&self) -> RefMut<'_, HashMap<String, V>> {
        self.map_cell.borrow_mut()
    }

    fn insert_obj_from_json(&self, json_value: serde_json::Value, supports: &S) -> Result<(), ManagerError> {
        let named_object = NamedJsonObject::from_json(&json_value)?;
        if self.contains(named_object.name()) {
            return Err(ManagerError::DuplicateName(named_object.name().to_owned()));
        }
        let v = (self.get_obj_from_json)(json_value, supports)?;
        self.insert(named_object.name(), v)
    }
}
