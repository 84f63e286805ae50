//! Test utilities for the configuration crates.
//!
//! The main export is a fuzzer that turns a [`FuzzSpec`] (a tree of allowed
//! values per field) into random override documents. Generated documents mix
//! nested and dotted keys, drop fields, and replace fields with the `null`
//! deletion sentinel, so they exercise every path through the override and
//! normalization engine while staying valid for the level they describe.
//!
//! Per-level specs live in [`specs`].

use config_format::{Config, FormatResult};
use rand::Rng;
use serde_json::{Map, Value};
use tracing::debug;

pub mod specs;

pub use specs::{
    branch_fuzz_spec, environment_fuzz_spec, organization_fuzz_spec, project_fuzz_spec,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// One option the fuzzer may pick for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FuzzChoice {
    /// A leaf value, used as is.
    Value(Value),
    /// An object whose fields are fuzzed independently.
    Object(Vec<(String, FuzzSpec)>),
    /// An array whose elements are always generated, in order.
    Array(Vec<FuzzSpec>),
}

impl FuzzChoice {
    fn is_object_like(&self) -> bool {
        !matches!(self, FuzzChoice::Value(_))
    }

    fn empty_value(&self) -> Value {
        match self {
            FuzzChoice::Value(value) => value.clone(),
            FuzzChoice::Object(_) => Value::Object(Map::new()),
            FuzzChoice::Array(_) => Value::Array(Vec::new()),
        }
    }
}

/// The options the fuzzer picks from for a single field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzSpec {
    choices: Vec<FuzzChoice>,
}

impl FuzzSpec {
    /// A field that takes one of the given leaf values.
    ///
    /// # Examples
    ///
    /// ```
    /// use test_utils::FuzzSpec;
    ///
    /// let spec = FuzzSpec::values([true, false]);
    /// assert_eq!(spec.choices().len(), 2);
    /// ```
    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            choices: values
                .into_iter()
                .map(|value| FuzzChoice::Value(value.into()))
                .collect(),
        }
    }

    /// A field that is always an object with the given fields.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FuzzSpec)>,
        K: Into<String>,
    {
        Self {
            choices: vec![FuzzChoice::Object(
                fields
                    .into_iter()
                    .map(|(key, spec)| (key.into(), spec))
                    .collect(),
            )],
        }
    }

    /// A field that is always an array with one element per spec.
    pub fn array<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = FuzzSpec>,
    {
        Self {
            choices: vec![FuzzChoice::Array(elements.into_iter().collect())],
        }
    }

    /// Adds `other`'s choices as alternatives to this field's choices.
    pub fn or(mut self, other: FuzzSpec) -> Self {
        self.choices.extend(other.choices);
        self
    }

    /// Adds or replaces a field in every object choice.
    ///
    /// Used to widen the spec of one level into the spec of a later level.
    pub fn with_field(mut self, key: &str, spec: FuzzSpec) -> Self {
        for choice in &mut self.choices {
            if let FuzzChoice::Object(fields) = choice {
                match fields.iter_mut().find(|(existing, _)| existing == key) {
                    Some((_, existing)) => *existing = spec.clone(),
                    None => fields.push((key.to_string(), spec.clone())),
                }
            }
        }
        self
    }

    /// The spec of `key` in the first object choice that has it.
    pub fn field(&self, key: &str) -> Option<&FuzzSpec> {
        self.choices.iter().find_map(|choice| match choice {
            FuzzChoice::Object(fields) => fields
                .iter()
                .find(|(existing, _)| existing == key)
                .map(|(_, spec)| spec),
            _ => None,
        })
    }

    pub fn choices(&self) -> &[FuzzChoice] {
        &self.choices
    }
}

/// A random chance drawn once per generated document.
///
/// `strength` scales how likely the event is; the chance is slightly below
/// zero for part of the range so some documents never see the event at all.
fn draw_chance<R: Rng + ?Sized>(rng: &mut R, strength: f64) -> f64 {
    rng.gen::<f64>() * strength * 1.2 - 0.1
}

/// Chances that depend on whether the value being placed is an object.
#[derive(Debug, Clone, Copy)]
struct ObjectDependentChance {
    object: f64,
    primitive: f64,
}

impl ObjectDependentChance {
    fn draw<R: Rng + ?Sized>(rng: &mut R, strength: f64) -> Self {
        Self {
            object: draw_chance(rng, strength),
            primitive: draw_chance(rng, strength),
        }
    }

    fn roll<R: Rng + ?Sized>(&self, rng: &mut R, object_like: bool) -> bool {
        let chance = if object_like { self.object } else { self.primitive };
        rng.gen::<f64>() * rng.gen::<f64>() < chance
    }
}

struct Fuzzer<'r, R: Rng + ?Sized> {
    rng: &'r mut R,
    keep: ObjectDependentChance,
    make_nested: ObjectDependentChance,
    null: f64,
    result: Value,
}

impl<R: Rng + ?Sized> Fuzzer<'_, R> {
    fn recurse(
        &mut self,
        output_path: &[String],
        spec: &FuzzSpec,
        force_nested: bool,
        force_non_null: bool,
    ) {
        if spec.choices.is_empty() {
            return;
        }
        let choice = &spec.choices[self.rng.gen_range(0..spec.choices.len())];
        let object_like = choice.is_object_like();

        let new_value = if force_non_null || self.rng.gen::<f64>() >= self.null {
            choice.empty_value()
        } else {
            Value::Null
        };

        let new_output_path = if force_nested
            || output_path.is_empty()
            || self.make_nested.roll(self.rng, object_like)
        {
            output_path.to_vec()
        } else {
            vec![output_path.join(".")]
        };

        if output_path.is_empty() {
            self.result = new_value;
        } else if force_nested || self.keep.roll(self.rng, object_like) {
            set_deep(&mut self.result, &new_output_path, new_value);
        }

        match choice {
            FuzzChoice::Object(fields) => {
                for (key, field_spec) in fields {
                    let mut child_path = new_output_path.clone();
                    child_path.push(key.clone());
                    self.recurse(&child_path, field_spec, false, false);
                }
            }
            FuzzChoice::Array(elements) => {
                for (index, element_spec) in elements.iter().enumerate() {
                    let mut child_path = new_output_path.clone();
                    child_path.push(index.to_string());
                    self.recurse(&child_path, element_spec, true, true);
                }
            }
            FuzzChoice::Value(_) => {}
        }
    }
}

/// Sets `value` at `path` inside `target`, doing nothing if an intermediate
/// segment is missing or not an object or array.
fn set_deep(target: &mut Value, path: &[String], value: Value) {
    match (target, path) {
        (Value::Object(map), [key]) => {
            map.insert(key.clone(), value);
        }
        (Value::Array(items), [index]) => {
            if let Ok(index) = index.parse::<usize>() {
                if index < items.len() {
                    items[index] = value;
                } else if index == items.len() {
                    items.push(value);
                }
            }
        }
        (Value::Object(map), [key, rest @ ..]) => {
            if let Some(child) = map.get_mut(key) {
                set_deep(child, rest, value);
            }
        }
        (Value::Array(items), [index, rest @ ..]) => {
            if let Some(child) = index.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                set_deep(child, rest, value);
            }
        }
        _ => {}
    }
}

/// Generates a random document from `spec`.
///
/// `progress` runs from 0 to 1 over a fuzzing session. Early documents keep
/// few fields; from the halfway point on, documents keep fields as often as
/// the drawn chances allow.
///
/// # Arguments
///
/// * `spec` - Allowed values for each field; the root should be an object
/// * `progress` - How far the fuzzing session has got, from 0 to 1
/// * `rng` - Source of randomness
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use test_utils::{create_fuzzer_input, FuzzSpec};
///
/// let spec = FuzzSpec::object([("enabled", FuzzSpec::values([true, false]))]);
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let input = create_fuzzer_input(&spec, 0.5, &mut rng);
/// assert!(input.is_object());
/// ```
pub fn create_fuzzer_input<R: Rng + ?Sized>(spec: &FuzzSpec, progress: f64, rng: &mut R) -> Value {
    let progress = (2.0 * progress).min(1.0);

    let keep = ObjectDependentChance::draw(rng, progress);
    let make_nested = ObjectDependentChance::draw(rng, 1.25);
    let null = draw_chance(rng, 0.25);

    let mut fuzzer = Fuzzer {
        rng,
        keep,
        make_nested,
        null,
        result: Value::Null,
    };
    fuzzer.recurse(&[], spec, false, true);
    fuzzer.result
}

/// Generates a random override document from `spec` as a [`Config`].
///
/// # Errors
///
/// Returns `FormatError::InvalidConfig` if the spec produces a document that
/// is not a valid config, for example because its root is not an object.
pub fn create_fuzzer_config<R: Rng + ?Sized>(
    spec: &FuzzSpec,
    progress: f64,
    rng: &mut R,
) -> FormatResult<Config> {
    let input = create_fuzzer_input(spec, progress, rng);
    debug!("Generated fuzzer input: {}", input);
    Config::try_from(input)
}
