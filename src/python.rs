use crate::decision::Decision;
use crate::engine::DoughEngine;
use crate::optimizer::WorkPlan;
use crate::recipe::{CaramelizationOptions, IntoRecipe, ProcessOptions, Recipe};
use crate::tempering::{LiquidBreakdown, TemperingBatchPlan, TemperingInput};
use crate::viscosity::ViscosityResult;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use pyo3::IntoPyObjectExt;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

fn json_to_py<'py>(py: Python<'py>, value: &Value) -> PyResult<Bound<'py, PyAny>> {
    match value {
        Value::Null => Ok(py.None().into_bound(py)),
        Value::Bool(b) => (*b).into_bound_py_any(py),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.into_bound_py_any(py),
            None => n.as_f64().unwrap_or(f64::NAN).into_bound_py_any(py),
        },
        Value::String(s) => s.as_str().into_bound_py_any(py),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(json_to_py(py, item)?)?;
            }
            Ok(list.into_any())
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, json_to_py(py, item)?)?;
            }
            Ok(dict.into_any())
        }
    }
}

fn to_py_dict<'py, T: Serialize>(py: Python<'py>, value: &T) -> PyResult<Bound<'py, PyAny>> {
    let json = serde_json::to_value(value).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    json_to_py(py, &json)
}

macro_rules! into_py_dict {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'py> IntoPyObject<'py> for $ty {
                type Target = PyAny;
                type Output = Bound<'py, Self::Target>;
                type Error = PyErr;

                fn into_pyobject(self, py: Python<'py>) -> Result<Self::Output, Self::Error> {
                    to_py_dict(py, &self)
                }
            }
        )*
    };
}

into_py_dict!(ViscosityResult, TemperingBatchPlan, WorkPlan, Decision);

fn to_recipe(recipe: HashMap<String, f64>) -> PyResult<Recipe> {
    recipe
        .into_recipe()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

fn process_options(caramelize: bool, egg_temp_c: f64, debug: bool) -> ProcessOptions {
    let mut options = ProcessOptions::default()
        .with_egg_temp(egg_temp_c)
        .with_debug(debug);
    if caramelize {
        options = options.with_caramelization(CaramelizationOptions::enabled());
    }
    options
}

/// Honey-cake dough process engine.
///
/// Recipes are dictionaries of ingredient name to grams, using the names
/// `flour`, `butter`, `sugar`, `honey`, `eggs` and `soda`. Every method returns
/// plain dictionaries.
#[pyclass(name = "Medovik")]
struct MedovikPy {
    engine: DoughEngine,
}

#[pymethods]
impl MedovikPy {
    /// Creates an engine, optionally overriding the physical constants.
    ///
    /// Args:
    ///     constants_path (str | None): Path to a TOML file. Keys it leaves out
    ///         keep their default values.
    ///
    /// Raises:
    ///     ValueError: If the file cannot be read or describes an invalid table.
    #[new]
    #[pyo3(signature = (constants_path=None))]
    fn new(constants_path: Option<&str>) -> PyResult<Self> {
        let builder = match constants_path {
            Some(path) => DoughEngine::builder()
                .constants_file(Path::new(path))
                .map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => DoughEngine::builder(),
        };
        let engine = builder
            .build()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(MedovikPy { engine })
    }

    /// Dough viscosity at one temperature.
    ///
    /// Returns:
    ///     dict: `value_cp`, `temperature_c`, `components`, `work_target` and,
    ///         with `debug=True`, `phases`.
    #[pyo3(signature = (recipe, temperature_c, caramelize=false, egg_temp_c=20.0, debug=false))]
    fn viscosity(
        &self,
        recipe: HashMap<String, f64>,
        temperature_c: f64,
        caramelize: bool,
        egg_temp_c: f64,
        debug: bool,
    ) -> PyResult<ViscosityResult> {
        let recipe = to_recipe(recipe)?;
        let options = process_options(caramelize, egg_temp_c, debug);
        Ok(self.engine.compute_viscosity(&recipe, temperature_c, &options))
    }

    /// Batch-wise tempering plan for pouring hot liquid into eggs.
    ///
    /// Args:
    ///     breakdown (dict | None): Butter, sugar, honey and soda masses of the
    ///         hot liquid, used for its specific heat.
    ///
    /// Raises:
    ///     ValueError: Listing every out-of-range input.
    #[pyo3(signature = (egg_mass_g, egg_temp_c, liquid_mass_g, liquid_temp_c, batch_count, breakdown=None))]
    fn temper(
        &self,
        egg_mass_g: f64,
        egg_temp_c: f64,
        liquid_mass_g: f64,
        liquid_temp_c: f64,
        batch_count: u32,
        breakdown: Option<HashMap<String, f64>>,
    ) -> PyResult<TemperingBatchPlan> {
        let mut input = TemperingInput::new(egg_mass_g, egg_temp_c, liquid_mass_g, liquid_temp_c, batch_count);
        if let Some(parts) = breakdown {
            input = input.with_breakdown(LiquidBreakdown::from_recipe(&to_recipe(parts)?));
        }
        self.engine
            .simulate_tempering(&input)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Best working temperature and, when needed, a corrective plan.
    #[pyo3(signature = (recipe, caramelize=false, egg_temp_c=20.0))]
    fn work_plan(&self, recipe: HashMap<String, f64>, caramelize: bool, egg_temp_c: f64) -> PyResult<WorkPlan> {
        let recipe = to_recipe(recipe)?;
        let options = process_options(caramelize, egg_temp_c, false);
        Ok(self.engine.find_optimal_work_plan(&recipe, &options))
    }

    /// GO / WAIT / STOP for a recipe, with the work plan behind it.
    #[pyo3(signature = (recipe, caramelize=false, egg_temp_c=20.0))]
    fn decide(&self, recipe: HashMap<String, f64>, caramelize: bool, egg_temp_c: f64) -> PyResult<Decision> {
        let recipe = to_recipe(recipe)?;
        let options = process_options(caramelize, egg_temp_c, false);
        Ok(self.engine.decide(&recipe, &options))
    }
}

/// Process and rheology simulation for laminated honey-cake dough.
#[pymodule]
fn medovik(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<MedovikPy>()?;
    Ok(())
}
