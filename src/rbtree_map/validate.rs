use super::RBTreeMap;
use crate::error::Result;

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Verifies that the map still satisfies every red-black and ordering
    /// invariant: the root is BLACK, no RED node has a RED child, keys are in
    /// strict BST order, every path to a missing child crosses the same
    /// number of BLACK nodes, and the stored length matches the reachable
    /// node count.
    ///
    /// The check walks the whole tree and fails fast on the first violation
    /// it finds. It is a diagnostic for tests and debugging, not something
    /// the mutation paths ever call.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rubi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(10, "a"), (5, "b"), (15, "c")]);
    /// map.validate().unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::InvariantViolation`](crate::Error::InvariantViolation)
    /// describing the first property found broken.
    pub fn validate(&self) -> Result<()> {
        self.raw.validate()
    }
}
