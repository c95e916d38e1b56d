//! Caller-supplied symbol bindings and their coercion to engine values.
//!
//! Hosts hand over loosely typed [`Value`]s. Before a simplification pass
//! every value is coerced into a [`Binding`]: either one `f64` or a series of
//! them. Anything that is not numeric is rejected with
//! [`Error::BadBindingType`].

use hashbrown::HashMap;

use crate::api::Error;

/// A binding value as supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// A value whose concrete kind is only known at runtime.
    Any(Box<Value>),
    Bool(bool),
    Text(String),
    I32s(Vec<i32>),
    I64s(Vec<i64>),
    F32s(Vec<f32>),
    F64s(Vec<f64>),
    /// A heterogeneous list; every element must be a numeric scalar.
    List(Vec<Value>),
}

impl Value {
    /// Name of the value's kind, as reported in binding errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Any(inner) => inner.kind(),
            Value::Bool(_) => "bool",
            Value::Text(_) => "string",
            Value::I32s(_) => "[i32]",
            Value::I64s(_) => "[i64]",
            Value::F32s(_) => "[f32]",
            Value::F64s(_) => "[f64]",
            Value::List(_) => "[any]",
        }
    }

    fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::I32(v) => Some(f64::from(*v)),
            Value::I64(v) => Some(*v as f64),
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            Value::Any(inner) => inner.as_scalar(),
            _ => None,
        }
    }

    /// Coerces this value, reporting the offending kind on failure.
    fn coerce(&self) -> Result<Binding, &'static str> {
        if let Some(v) = self.as_scalar() {
            return Ok(Binding::Scalar(v));
        }
        let series = match self {
            Value::I32s(vs) => vs.iter().map(|v| f64::from(*v)).collect(),
            Value::I64s(vs) => vs.iter().map(|v| *v as f64).collect(),
            Value::F32s(vs) => vs.iter().map(|v| f64::from(*v)).collect(),
            Value::F64s(vs) => vs.clone(),
            Value::List(vs) => vs
                .iter()
                .map(|v| v.as_scalar().ok_or_else(|| v.kind()))
                .collect::<Result<Vec<_>, _>>()?,
            Value::Any(inner) => return inner.coerce(),
            other => return Err(other.kind()),
        };
        Ok(Binding::Series(series))
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Text,
    Vec<i32> => I32s,
    Vec<i64> => I64s,
    Vec<f32> => F32s,
    Vec<f64> => F64s,
    Vec<Value> => List,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self {
        Value::F64s(v.to_vec())
    }
}

/// A binding after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Scalar(f64),
    Series(Vec<f64>),
}

/// Coerced bindings keyed by symbol name.
pub type Resolved = HashMap<String, Binding>;

/// Symbol bindings for one `evaluate` or `partial` call.
///
/// # Example
///
/// ```
/// use tsrpn_core::api::Program;
/// use tsrpn_core::bindings::Bindings;
///
/// let program = Program::new("12,age,*").unwrap();
/// let bindings = Bindings::new().bind("age", 21);
/// assert_eq!(program.evaluate(&bindings).unwrap(), 252.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, replacing any previous value for `name`.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Coerces every value into a [`Binding`].
    pub(crate) fn resolve(&self) -> Result<Resolved, Error> {
        let mut resolved = HashMap::with_capacity(self.values.len());
        for (key, value) in &self.values {
            let binding = value.coerce().map_err(|kind| Error::BadBindingType {
                key: key.clone(),
                kind: kind.to_string(),
            })?;
            resolved.insert(key.clone(), binding);
        }
        Ok(resolved)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        bindings.extend(iter);
        bindings
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Bindings {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
