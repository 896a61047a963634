use core::borrow::Borrow;

use super::RBTreeMap;
use crate::error::{Error, Result};
use crate::raw::Side;

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rubi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rubi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// Draining elements in ascending order, while keeping a usable map each iteration.
    ///
    /// ```
    /// use rubi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// Draining elements in descending order, while keeping a usable map each iteration.
    ///
    /// ```
    /// use rubi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_last() {
    ///     assert!(map.iter().all(|(k, _v)| *k < key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Returns the entry with the smallest key strictly greater than `key`.
    ///
    /// `key` itself must be present. The two failure modes are distinct:
    /// [`Error::KeyNotFound`] when `key` is not in the map, and
    /// [`Error::NoNeighbor`] when `key` is the maximum and the ordering has
    /// no next entry.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rubi_tree::{Error, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(10, "a"), (20, "b"), (30, "c")]);
    /// assert_eq!(map.successor(&20), Ok((&30, &"c")));
    /// assert_eq!(map.successor(&30), Err(Error::NoNeighbor));
    /// assert_eq!(map.successor(&15), Err(Error::KeyNotFound));
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `key` is absent, [`Error::NoNeighbor`] if it
    /// is the maximum key.
    pub fn successor<Q>(&self, key: &Q) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.neighbor(key, Side::Right)
    }

    /// Returns the entry with the largest key strictly less than `key`.
    ///
    /// `key` itself must be present. The two failure modes are distinct:
    /// [`Error::KeyNotFound`] when `key` is not in the map, and
    /// [`Error::NoNeighbor`] when `key` is the minimum and the ordering has
    /// no previous entry.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rubi_tree::{Error, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(10, "a"), (20, "b"), (30, "c")]);
    /// assert_eq!(map.predecessor(&20), Ok((&10, &"a")));
    /// assert_eq!(map.predecessor(&10), Err(Error::NoNeighbor));
    /// assert_eq!(map.predecessor(&25), Err(Error::KeyNotFound));
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `key` is absent, [`Error::NoNeighbor`] if it
    /// is the minimum key.
    pub fn predecessor<Q>(&self, key: &Q) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.neighbor(key, Side::Left)
    }

    fn neighbor<Q>(&self, key: &Q, dir: Side) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.raw.search(key).ok_or(Error::KeyNotFound)?;
        let neighbor = self.raw.step(h, dir).ok_or(Error::NoNeighbor)?;
        Ok(self.raw.entry_at(neighbor))
    }
}
