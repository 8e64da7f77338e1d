// File: salvation/src/classifier.rs
// Purpose: Partition fields into validation buckets from their declared attributes

use serde::Serialize;

use crate::config::AttributeNames;
use crate::field::{declared_types, Field, FieldId};
use crate::rules::ValidationType;

/// Fields sharing one validation type, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub name: ValidationType,
    pub members: Vec<FieldId>,
}

/// Insertion-ordered mapping from validation type to its member fields
///
/// A field id appears at most once per bucket but may sit in several buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BucketMap {
    buckets: Vec<Bucket>,
}

impl BucketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` to the bucket for `ty`, creating the bucket on first use
    ///
    /// Returns false when the id was already a member.
    pub fn insert(&mut self, ty: ValidationType, id: &str) -> bool {
        let bucket = match self.buckets.iter().position(|b| b.name == ty) {
            Some(i) => &mut self.buckets[i],
            None => {
                self.buckets.push(Bucket {
                    name: ty,
                    members: Vec::new(),
                });
                let last = self.buckets.len() - 1;
                &mut self.buckets[last]
            }
        };

        if bucket.members.iter().any(|m| m == id) {
            return false;
        }
        bucket.members.push(id.to_string());
        true
    }

    /// Members of a bucket, `None` if no field ever declared the type
    pub fn get(&self, ty: &ValidationType) -> Option<&[FieldId]> {
        self.buckets
            .iter()
            .find(|b| &b.name == ty)
            .map(|b| b.members.as_slice())
    }

    pub fn contains(&self, ty: &ValidationType, id: &str) -> bool {
        self.get(ty).is_some_and(|members| members.iter().any(|m| m == id))
    }

    /// Buckets in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    pub fn bucket_names(&self) -> Vec<&ValidationType> {
        self.buckets.iter().map(|b| &b.name).collect()
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Classify a newly inserted field and append it where it belongs
    ///
    /// Returns the buckets the field was newly added to; registering the same
    /// field twice is a no-op.
    pub fn register_field<F: Field + ?Sized>(&mut self, field: &F, attrs: &AttributeNames) -> Vec<ValidationType> {
        memberships(field, attrs)
            .into_iter()
            .filter(|ty| self.insert(ty.clone(), field.id()))
            .collect()
    }

    /// Remove a field from every bucket; emptied buckets keep their position
    pub fn unregister_field(&mut self, id: &str) -> bool {
        let mut removed = false;
        for bucket in &mut self.buckets {
            let before = bucket.members.len();
            bucket.members.retain(|m| m != id);
            removed |= bucket.members.len() != before;
        }
        removed
    }
}

/// Buckets a field belongs to, in evaluation order
///
/// The declared type list comes first. The legacy attributes follow as a
/// union: the `required` attribute adds `required`, a length attribute adds
/// `length`, each only when not already declared.
pub fn memberships<F: Field + ?Sized>(field: &F, attrs: &AttributeNames) -> Vec<ValidationType> {
    let mut types = declared_types(field, &attrs.validate);

    if field.has_attribute(&attrs.required) && !types.contains(&ValidationType::Required) {
        types.push(ValidationType::Required);
    }
    if field.has_attribute(&attrs.length) && !types.contains(&ValidationType::Length) {
        types.push(ValidationType::Length);
    }

    types
}

/// Build the bucket map for a snapshot of fields
pub fn classify<F: Field>(fields: &[F], attrs: &AttributeNames) -> BucketMap {
    let mut map = BucketMap::new();
    for field in fields {
        map.register_field(field, attrs);
    }

    tracing::debug!("Classified {} fields into {} buckets", fields.len(), map.len());
    map
}
