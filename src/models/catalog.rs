//! Operation catalog ("library").
//!
//! Insertion-ordered; ids are unique within the catalog.

use serde::Serialize;

use super::{Operation, OperationId};

/// Flat, insertion-ordered collection of operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    operations: Vec<Operation>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from operations in the given order.
    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Adds an operation (builder style).
    pub fn with_operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, id: &OperationId) -> Option<&Operation> {
        self.operations.iter().find(|op| &op.id == id)
    }

    pub fn get_mut(&mut self, id: &OperationId) -> Option<&mut Operation> {
        self.operations.iter_mut().find(|op| &op.id == id)
    }

    pub fn contains(&self, id: &OperationId) -> bool {
        self.get(id).is_some()
    }

    /// Appends an operation at the end.
    pub fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Removes and returns the operation with `id`.
    pub fn remove(&mut self, id: &OperationId) -> Option<Operation> {
        let pos = self.operations.iter().position(|op| &op.id == id)?;
        Some(self.operations.remove(pos))
    }

    /// Operations in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(n: u64) -> Operation {
        Operation::new(OperationId::sequential(n), format!("L11{n:02}"), format!("Op {n}"))
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = Catalog::new().with_operation(op(3)).with_operation(op(1));
        let ids: Vec<_> = catalog.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["op_3", "op_1"]);
    }

    #[test]
    fn test_catalog_lookup_and_remove() {
        let mut catalog = Catalog::from_operations(vec![op(1), op(2)]);
        assert!(catalog.contains(&OperationId::sequential(2)));

        let removed = catalog.remove(&OperationId::sequential(1)).unwrap();
        assert_eq!(removed.code, "L1101");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(&OperationId::sequential(1)).is_none());
        assert!(catalog.remove(&OperationId::sequential(9)).is_none());
    }

    #[test]
    fn test_catalog_get_mut() {
        let mut catalog = Catalog::from_operations(vec![op(1)]);
        catalog.get_mut(&OperationId::sequential(1)).unwrap().title = "Neu".into();
        assert_eq!(catalog.get(&OperationId::sequential(1)).unwrap().title, "Neu");
    }
}
