use super::realfunction::RealFunction;

pub struct ConstantFunction {
    name: String,
    value: f64,
}

impl ConstantFunction {
    pub fn new(name: impl Into<String>, value: f64) -> ConstantFunction {
        ConstantFunction { name: name.into(), value }
    }
}

impl RealFunction for ConstantFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> f64 {
        self.value
    }
}
