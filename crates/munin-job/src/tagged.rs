//! Tagged-value JSON encoding for result payloads.
//!
//! Result payloads embed values plain JSON cannot carry: complex scalars,
//! multi-dimensional numeric arrays, raw byte buffers. Each such value is
//! encoded as an object carrying a `"__type__"` tag and a primitive-encodable
//! payload; decoding dispatches on the tag. The tag vocabulary is fixed and
//! versioned — an object with an unrecognized tag fails decoding loudly
//! instead of degrading into an untyped tree.
//!
//! | Tag | Payload |
//! |-----|---------|
//! | `complex` | `re`, `im` (f64) |
//! | `ndarray` | `shape`, `data` (row-major f64) |
//! | `ndarray_c` | `shape`, `re`, `im` (row-major f64) |
//! | `bytes` | `data` (base64) |
//!
//! Plain maps with a literal `"__type__"` key are not representable; the
//! key is reserved for the codec. Non-finite floats (`NaN`, infinities)
//! have no JSON representation and encode as `null`; result payloads
//! carry measurement statistics, which are always finite.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};

use crate::error::{JobError, JobResult};

/// Version of the tag vocabulary understood by this build.
pub const TAG_FORMAT_VERSION: u32 = 1;

/// Reserved key marking a tagged object.
const TAG_KEY: &str = "__type__";

/// A JSON-encodable value with first-class support for the non-primitive
/// types that appear in result payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// JSON null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// String.
    Str(String),
    /// Complex scalar.
    Complex(Complex64),
    /// Real-valued n-dimensional array.
    Array(ArrayD<f64>),
    /// Complex-valued n-dimensional array.
    ComplexArray(ArrayD<Complex64>),
    /// Raw byte buffer.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    List(Vec<TypedValue>),
    /// String-keyed mapping of values.
    Map(BTreeMap<String, TypedValue>),
}

impl TypedValue {
    /// Encode into the tagged JSON representation.
    ///
    /// Primitives pass through unchanged; non-primitives become tagged
    /// objects. Encoding never fails, but non-finite floats collapse to
    /// `null` (see the module docs).
    pub fn encode(&self) -> Value {
        match self {
            TypedValue::Null => Value::Null,
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Int(i) => json!(i),
            TypedValue::Float(f) => json!(f),
            TypedValue::Str(s) => Value::String(s.clone()),
            TypedValue::Complex(c) => json!({
                (TAG_KEY): "complex",
                "re": c.re,
                "im": c.im,
            }),
            TypedValue::Array(arr) => json!({
                (TAG_KEY): "ndarray",
                "shape": arr.shape(),
                "data": arr.iter().copied().collect::<Vec<f64>>(),
            }),
            TypedValue::ComplexArray(arr) => json!({
                (TAG_KEY): "ndarray_c",
                "shape": arr.shape(),
                "re": arr.iter().map(|c| c.re).collect::<Vec<f64>>(),
                "im": arr.iter().map(|c| c.im).collect::<Vec<f64>>(),
            }),
            TypedValue::Bytes(bytes) => json!({
                (TAG_KEY): "bytes",
                "data": BASE64.encode(bytes),
            }),
            TypedValue::List(items) => {
                Value::Array(items.iter().map(TypedValue::encode).collect())
            }
            TypedValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.encode()))
                    .collect(),
            ),
        }
    }

    /// Decode from the tagged JSON representation.
    pub fn decode(value: &Value) -> JobResult<Self> {
        match value {
            Value::Null => Ok(TypedValue::Null),
            Value::Bool(b) => Ok(TypedValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(TypedValue::Int(i))
                } else {
                    // u64 beyond i64::MAX also lands here; result payloads
                    // never carry counts that large.
                    Ok(TypedValue::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => Ok(TypedValue::Str(s.clone())),
            Value::Array(items) => Ok(TypedValue::List(
                items.iter().map(TypedValue::decode).collect::<JobResult<_>>()?,
            )),
            Value::Object(obj) => match obj.get(TAG_KEY) {
                Some(tag) => Self::decode_tagged(tag, obj),
                None => Ok(TypedValue::Map(
                    obj.iter()
                        .map(|(k, v)| Ok((k.clone(), TypedValue::decode(v)?)))
                        .collect::<JobResult<_>>()?,
                )),
            },
        }
    }

    fn decode_tagged(tag: &Value, obj: &serde_json::Map<String, Value>) -> JobResult<Self> {
        let tag = tag
            .as_str()
            .ok_or_else(|| JobError::MalformedValue("non-string __type__ tag".into()))?;

        match tag {
            "complex" => {
                let re = field_f64(obj, "re")?;
                let im = field_f64(obj, "im")?;
                Ok(TypedValue::Complex(Complex64::new(re, im)))
            }
            "ndarray" => {
                let shape = field_shape(obj)?;
                let data = field_f64_vec(obj, "data")?;
                let arr = ArrayD::from_shape_vec(IxDyn(&shape), data)
                    .map_err(|_| shape_mismatch(&shape, field_len(obj, "data")))?;
                Ok(TypedValue::Array(arr))
            }
            "ndarray_c" => {
                let shape = field_shape(obj)?;
                let re = field_f64_vec(obj, "re")?;
                let im = field_f64_vec(obj, "im")?;
                if re.len() != im.len() {
                    return Err(JobError::ShapeMismatch {
                        expected: re.len(),
                        actual: im.len(),
                    });
                }
                let data: Vec<Complex64> = re
                    .into_iter()
                    .zip(im)
                    .map(|(re, im)| Complex64::new(re, im))
                    .collect();
                let len = data.len();
                let arr = ArrayD::from_shape_vec(IxDyn(&shape), data)
                    .map_err(|_| shape_mismatch(&shape, len))?;
                Ok(TypedValue::ComplexArray(arr))
            }
            "bytes" => {
                let encoded = obj
                    .get("data")
                    .and_then(Value::as_str)
                    .ok_or_else(|| JobError::MalformedValue("bytes payload missing data".into()))?;
                Ok(TypedValue::Bytes(BASE64.decode(encoded)?))
            }
            other => Err(JobError::UnknownTag(other.to_string())),
        }
    }
}

fn field_f64(obj: &serde_json::Map<String, Value>, key: &str) -> JobResult<f64> {
    obj.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| JobError::MalformedValue(format!("missing numeric field '{key}'")))
}

fn field_f64_vec(obj: &serde_json::Map<String, Value>, key: &str) -> JobResult<Vec<f64>> {
    obj.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| JobError::MalformedValue(format!("missing array field '{key}'")))?
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| JobError::MalformedValue(format!("non-numeric entry in '{key}'")))
        })
        .collect()
}

fn field_shape(obj: &serde_json::Map<String, Value>) -> JobResult<Vec<usize>> {
    obj.get("shape")
        .and_then(Value::as_array)
        .ok_or_else(|| JobError::MalformedValue("missing array field 'shape'".into()))?
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|n| n as usize)
                .ok_or_else(|| JobError::MalformedValue("non-integer shape entry".into()))
        })
        .collect()
}

fn field_len(obj: &serde_json::Map<String, Value>, key: &str) -> usize {
    obj.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

fn shape_mismatch(shape: &[usize], actual: usize) -> JobError {
    JobError::ShapeMismatch {
        expected: shape.iter().product(),
        actual,
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TypedValue::decode(&value).map_err(D::Error::custom)
    }
}

impl From<f64> for TypedValue {
    fn from(f: f64) -> Self {
        TypedValue::Float(f)
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Int(i)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::Str(s.to_string())
    }
}

impl From<Complex64> for TypedValue {
    fn from(c: Complex64) -> Self {
        TypedValue::Complex(c)
    }
}

impl From<ArrayD<f64>> for TypedValue {
    fn from(arr: ArrayD<f64>) -> Self {
        TypedValue::Array(arr)
    }
}

impl From<ArrayD<Complex64>> for TypedValue {
    fn from(arr: ArrayD<Complex64>) -> Self {
        TypedValue::ComplexArray(arr)
    }
}

impl From<Vec<u8>> for TypedValue {
    fn from(bytes: Vec<u8>) -> Self {
        TypedValue::Bytes(bytes)
    }
}
