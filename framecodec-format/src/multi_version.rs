//! Dispatch across several [`Schema`]s keyed by version byte.

use crate::schema::Schema;

/// An ordered collection of schemas, selected by version byte on decode.
///
/// The source this format is modeled on mutates a "currently selected"
/// version inside the schema object as `validate_version` runs, which makes
/// the schema's behavior depend on decode history. This type holds no such
/// state: [`Self::validate_version`] is a pure function from a version byte
/// to the matching `Schema`, and the caller (the decoder) is responsible for
/// remembering which one it selected.
#[derive(Debug, Clone)]
pub struct MultiVersionSchema {
    schemas: Vec<Schema>,
}

impl MultiVersionSchema {
    /// Build a dispatch table from an ordered list of schemas. Order matters
    /// only in that the first schema whose `validate_version` accepts a
    /// given byte wins.
    pub fn new(schemas: Vec<Schema>) -> Self {
        MultiVersionSchema { schemas }
    }

    /// All schemas in dispatch order.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// Return the first schema whose `validate_version(v)` accepts `v`, or
    /// `None` if none do (the decoder maps this to `VersionMismatch`).
    pub fn validate_version(&self, v: u8) -> Option<&Schema> {
        self.schemas.iter().find(|schema| schema.validate_version(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_first_matching_schema() {
        let a = Schema::new(1, vec![], None, None).unwrap();
        let b = Schema::new(2, vec![], None, None).unwrap();
        let table = MultiVersionSchema::new(vec![a, b]);
        assert_eq!(table.validate_version(1).unwrap().version(), 1);
        assert_eq!(table.validate_version(2).unwrap().version(), 2);
        assert!(table.validate_version(3).is_none());
    }

    #[test]
    fn repeated_validation_is_stateless() {
        let a = Schema::new(1, vec![], None, None).unwrap();
        let table = MultiVersionSchema::new(vec![a]);
        assert!(table.validate_version(1).is_some());
        assert!(table.validate_version(1).is_some());
        assert!(table.validate_version(9).is_none());
        assert!(table.validate_version(1).is_some());
    }
}
