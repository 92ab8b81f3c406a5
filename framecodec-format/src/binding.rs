//! Explicit record↔schema binding, replacing runtime reflection.
//!
//! A [`RecordBinding`] is built once per record type `T` and reused for
//! every `cast_to_entry`/`cast_from_entry` call. See the module docs of
//! [`crate::schema`] for how a `Schema` consumes one of these.

use crate::error::{FrameCodecError, Result};
use crate::value::Value;

type Getter<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<()> + Send + Sync>;

/// A named (getter, setter) pair used to read/write one property of `T`.
pub struct PropertyBinding<T> {
    /// Must match a `Block::property_name` exactly for `cast_*` to find it.
    pub property_name: String,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> PropertyBinding<T> {
    /// Construct a binding for one named property.
    pub fn new(
        property_name: impl Into<String>,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
        set: impl Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        PropertyBinding {
            property_name: property_name.into(),
            get: Box::new(get),
            set: Box::new(set),
        }
    }
}

/// The full set of property bindings for a record type `T`, keyed by the
/// `property_name` strings a `Schema`'s blocks reference.
///
/// There is no reflection in Rust to fall back on, so every `(name, getter,
/// setter)` triple is supplied explicitly by the caller, once, and reused
/// across every encode/decode call for that record type.
pub struct RecordBinding<T> {
    bindings: Vec<PropertyBinding<T>>,
}

impl<T> RecordBinding<T> {
    /// Build a binding set from an ordered list of property bindings.
    pub fn new(bindings: Vec<PropertyBinding<T>>) -> Self {
        RecordBinding { bindings }
    }

    /// Read `property_name` out of `record` as a `Value`.
    pub fn get(&self, property_name: &str, record: &T) -> Result<Value> {
        self.find(property_name).map(|b| (b.get)(record))
    }

    /// Write `value` into `record` at `property_name`.
    pub fn set(&self, property_name: &str, record: &mut T, value: Value) -> Result<()> {
        let binding = self.find(property_name)?;
        (binding.set)(record, value)
    }

    fn find(&self, property_name: &str) -> Result<&PropertyBinding<T>> {
        self.bindings
            .iter()
            .find(|b| b.property_name == property_name)
            .ok_or_else(|| {
                FrameCodecError::PropertyBindingFailure(
                    property_name.to_string(),
                    "no binding registered for this property".to_string(),
                )
            })
    }
}
