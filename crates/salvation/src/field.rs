// File: salvation/src/field.rs
// Purpose: Read-only view of a form control and its declared validation attributes

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::rules::ValidationType;

/// Identifier of a form control inside its host document
pub type FieldId = String;

/// Read-only access to a form control
///
/// The engine never mutates a field. It only reads the current value and the
/// attributes the markup declared (`required`, `data-validate`, `data-length`,
/// `data-format`, ...). Hosts implement this for whatever their element handle is.
pub trait Field {
    /// Stable identifier used by the bucket map
    fn id(&self) -> &str;

    /// Current text value
    fn value(&self) -> &str;

    /// Attribute value, `None` when the attribute is absent
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Presence check; an attribute declared without a value still counts
    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

impl<T: Field + ?Sized> Field for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn value(&self) -> &str {
        (**self).value()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        (**self).attribute(name)
    }
}

/// Snapshot of an input element, as handed over by the host integration layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    pub id: FieldId,

    #[serde(default)]
    pub value: String,

    /// Declared attributes; boolean attributes map to an empty string
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl InputField {
    /// Create an empty field with no attributes
    pub fn new(id: impl Into<FieldId>) -> Self {
        Self {
            id: id.into(),
            value: String::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark the field with the boolean `required` attribute
    pub fn required(self) -> Self {
        self.with_attr("required", "")
    }

    /// Replace the current value (a live edit)
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl Field for InputField {
    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Parse the comma-separated type list a field declares under `attribute`
///
/// Entries are trimmed, empty entries dropped and repeated entries collapsed
/// onto their first occurrence, so the order is the one the markup declared.
pub fn declared_types<F: Field + ?Sized>(field: &F, attribute: &str) -> Vec<ValidationType> {
    let mut types: Vec<ValidationType> = Vec::new();

    let Some(raw) = field.attribute(attribute) else {
        return types;
    };

    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let ty = ValidationType::from_name(name);
        if !types.contains(&ty) {
            types.push(ty);
        }
    }

    types
}
