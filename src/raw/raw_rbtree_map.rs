use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::format;
use alloc::vec::Vec;

use crate::error::Error;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};

/// The core red-black tree implementation backing `RBTreeMap`.
///
/// Invariants restored after every completed mutation:
/// 1. every node is RED or BLACK, and an absent child counts as BLACK;
/// 2. the root is BLACK (or the tree is empty);
/// 3. a RED node never has a RED child;
/// 4. every path from a node down to an absent child passes through the same
///    number of BLACK nodes;
/// 5. keys in a left subtree compare less than the node's key, keys in a
///    right subtree compare greater;
/// 6. `len` equals the number of nodes reachable from the root.
#[derive(Clone)]
pub(crate) struct RawRBTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values. Keeping values out of the node arena lets
    /// mutable value iteration rely on the two regions never aliasing.
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with the specified capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Clears all elements from the tree.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns a reference to a node by handle.
    #[inline]
    fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Returns a mutable reference to a node by handle.
    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    /// Returns a reference to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: We only access the `nodes` field through addr_of, avoiding
        // aliasing with the `values` field.
        unsafe { Arena::get_ptr(core::ptr::addr_of!((*ptr).nodes), handle) }
    }

    /// Returns a reference to a value by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    pub(crate) unsafe fn value_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a V {
        // SAFETY: We only access the `values` field through addr_of, avoiding
        // aliasing with the `nodes` field.
        unsafe { Arena::get_ptr(core::ptr::addr_of!((*ptr).values), handle) }
    }

    /// Returns a mutable reference to a value by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    /// - The caller must have logical exclusive access to the value at
    ///   `handle` and must not hold another reference to it.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: We only access the `values` field, avoiding aliasing with
        // the `nodes` field.
        unsafe { Arena::get_mut_ptr(core::ptr::addr_of_mut!((*ptr).values), handle) }
    }

    /// Returns the key and value stored at `handle`.
    pub(crate) fn entry_at(&self, handle: Handle) -> (&K, &V) {
        let node = self.node(handle);
        (node.key(), self.values.get(node.value()))
    }

    /// The color of a possibly-absent node. Absent children are BLACK.
    #[inline]
    fn color(&self, handle: Option<Handle>) -> Color {
        match handle {
            Some(h) => self.node(h).color(),
            None => Color::Black,
        }
    }

    /// Which child slot of `parent` holds `child`.
    #[inline]
    fn side_of(&self, parent: Handle, child: Handle) -> Side {
        if self.node(parent).child(Side::Left) == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Walks to the extreme node of the subtree at `h` on the given side
    /// (`Side::Left` for the minimum, `Side::Right` for the maximum).
    fn extreme_from(&self, mut h: Handle, side: Side) -> Handle {
        while let Some(next) = self.node(h).child(side) {
            h = next;
        }
        h
    }

    /// Handle of the node holding the smallest key, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|r| self.extreme_from(r, Side::Left))
    }

    /// Handle of the node holding the largest key, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|r| self.extreme_from(r, Side::Right))
    }

    /// Steps from `h` to its in-order neighbor (`Side::Right` for the
    /// successor, `Side::Left` for the predecessor).
    pub(crate) fn step(&self, h: Handle, dir: Side) -> Option<Handle> {
        // SAFETY: `self` is a valid reference to this tree.
        unsafe { Self::step_ptr(self, h, dir) }
    }

    /// Steps to the in-order neighbor of `h` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    /// - Only the `nodes` arena is read, so outstanding references into the
    ///   `values` arena remain undisturbed.
    pub(crate) unsafe fn step_ptr(ptr: *const Self, h: Handle, dir: Side) -> Option<Handle> {
        // SAFETY: Caller guarantees ptr is valid; all accesses go through the
        // projected `nodes` field only.
        unsafe {
            let nodes = core::ptr::addr_of!((*ptr).nodes);
            let node = Arena::get_ptr(nodes, h);
            if let Some(mut c) = node.child(dir) {
                // Neighbor is the near extreme of the subtree on that side.
                while let Some(next) = Arena::get_ptr(nodes, c).child(dir.opposite()) {
                    c = next;
                }
                return Some(c);
            }
            // Otherwise climb until the walk turns around.
            let mut cur = h;
            let mut parent = node.parent();
            while let Some(p) = parent {
                let parent_node = Arena::get_ptr(nodes, p);
                if parent_node.child(dir) != Some(cur) {
                    return Some(p);
                }
                cur = p;
                parent = parent_node.parent();
            }
            None
        }
    }
}

impl<K: Ord, V> RawRBTreeMap<K, V> {
    /// Searches for a key and returns its node handle if present.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cur = self.root;
        while let Some(h) = cur {
            let node = self.node(h);
            match key.cmp(node.key().borrow()) {
                Ordering::Equal => return Some(h),
                Ordering::Less => cur = node.child(Side::Left),
                Ordering::Greater => cur = node.child(Side::Right),
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.search(key)?;
        Some(self.values.get(self.node(h).value()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.search(key)?;
        let value_handle = self.node(h).value();
        Some(self.values.get_mut(value_handle))
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.search(key)?;
        Some(self.entry_at(h))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Returns the first (minimum-key) pair in the tree.
    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first().map(|h| self.entry_at(h))
    }

    /// Returns the last (maximum-key) pair in the tree.
    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last().map(|h| self.entry_at(h))
    }

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        // Descend to the attachment point, replacing in place on an equal
        // key (no structural change, so no fixup either).
        let mut parent: Option<Handle> = None;
        let mut side = Side::Left;
        let mut cur = self.root;
        while let Some(h) = cur {
            match key.cmp(self.node(h).key()) {
                Ordering::Equal => {
                    let value_handle = self.node(h).value();
                    return Some(core::mem::replace(self.values.get_mut(value_handle), value));
                }
                Ordering::Less => {
                    parent = Some(h);
                    side = Side::Left;
                    cur = self.node(h).child(Side::Left);
                }
                Ordering::Greater => {
                    parent = Some(h);
                    side = Side::Right;
                    cur = self.node(h).child(Side::Right);
                }
            }
        }

        let value_handle = self.values.alloc(value);
        let z = self.nodes.alloc(Node::new(key, value_handle, parent));
        match parent {
            None => self.root = Some(z),
            Some(p) => self.node_mut(p).set_child(side, Some(z)),
        }
        self.len += 1;
        self.insert_fixup(z);
        None
    }

    /// Removes a key from the tree and returns the value.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let z = self.search(key)?;
        Some(self.remove_node(z))
    }

    /// Removes and returns the first (minimum-key) pair.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let h = self.first()?;
        Some(self.remove_node(h))
    }

    /// Removes and returns the last (maximum-key) pair.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let h = self.last()?;
        Some(self.remove_node(h))
    }

    /// Drains all key-value pairs from the tree in ascending key order.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut handles = Vec::with_capacity(self.len);
        let mut cur = self.first();
        while let Some(h) = cur {
            handles.push(h);
            cur = self.step(h, Side::Right);
        }

        let mut result = Vec::with_capacity(self.len);
        for h in handles {
            let (key, value_handle) = self.nodes.take(h).into_parts();
            result.push((key, self.values.take(value_handle)));
        }

        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;

        result
    }
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Rotates the subtree at `h` in direction `dir` (`Side::Left` is the
    /// classic left-rotation). The child opposite `dir` becomes the new
    /// subtree root; the three affected parent links are all repointed.
    ///
    /// # Panics
    /// Panics if `h` has no child opposite `dir`. Correct fixup logic never
    /// rotates such a node, so tripping this means the rebalancing itself is
    /// broken, not the input.
    fn rotate(&mut self, h: Handle, dir: Side) {
        let up = self
            .node(h)
            .child(dir.opposite())
            .expect("`RawRBTreeMap::rotate()` - rotation requires a pivot child!");

        // The pivot's near subtree switches sides to preserve ordering.
        let inner = self.node(up).child(dir);
        self.node_mut(h).set_child(dir.opposite(), inner);
        if let Some(g) = inner {
            self.node_mut(g).set_parent(Some(h));
        }

        let parent = self.node(h).parent();
        self.node_mut(up).set_parent(parent);
        match parent {
            None => self.root = Some(up),
            Some(p) => {
                let side = self.side_of(p, h);
                self.node_mut(p).set_child(side, Some(up));
            }
        }

        self.node_mut(up).set_child(dir, Some(h));
        self.node_mut(h).set_parent(Some(up));
    }

    /// Restores the red-black properties after inserting the RED node `z`.
    ///
    /// The only possible violation is `z` being RED under a RED parent. A RED
    /// uncle pushes the violation two levels up by recoloring; a BLACK uncle
    /// ends the loop with at most two rotations around the grandparent.
    fn insert_fixup(&mut self, mut z: Handle) {
        loop {
            let Some(p) = self.node(z).parent() else { break };
            if self.node(p).color() == Color::Black {
                break;
            }
            // A RED parent is never the root, so the grandparent exists.
            let g = self
                .node(p)
                .parent()
                .expect("`RawRBTreeMap::insert_fixup()` - RED parent without a grandparent!");
            let side = self.side_of(g, p);
            let uncle = self.node(g).child(side.opposite());

            match uncle {
                Some(u) if self.node(u).color() == Color::Red => {
                    // Uncle RED: recolor and continue from the grandparent.
                    self.node_mut(p).set_color(Color::Black);
                    self.node_mut(u).set_color(Color::Black);
                    self.node_mut(g).set_color(Color::Red);
                    z = g;
                }
                _ => {
                    // Uncle BLACK. An inner grandchild is first rotated
                    // outward so the chain g-p-z is straight.
                    let top = if self.side_of(p, z) == side {
                        p
                    } else {
                        self.rotate(p, side);
                        z
                    };
                    // Straight chain: recolor and rotate the grandparent
                    // toward the uncle. This terminates the loop.
                    self.node_mut(top).set_color(Color::Black);
                    self.node_mut(g).set_color(Color::Red);
                    self.rotate(g, side.opposite());
                    break;
                }
            }
        }

        if let Some(root) = self.root {
            self.node_mut(root).set_color(Color::Black);
        }
    }

    /// Unlinks the node `z` from the tree, rebalances, and returns its key
    /// and value.
    pub(crate) fn remove_node(&mut self, z: Handle) -> (K, V) {
        let z_left = self.node(z).child(Side::Left);
        let z_right = self.node(z).child(Side::Right);

        // The node actually spliced out of its position: `z` itself, or its
        // in-order successor in the two-children case. Removing a BLACK node
        // shortens that path by one and must be repaired afterwards.
        let spliced_color;
        let focus: Option<Handle>;
        let focus_parent: Option<Handle>;

        match (z_left, z_right) {
            (None, _) => {
                spliced_color = self.node(z).color();
                focus = z_right;
                focus_parent = self.node(z).parent();
                self.transplant(z, z_right);
            }
            (Some(_), None) => {
                spliced_color = self.node(z).color();
                focus = z_left;
                focus_parent = self.node(z).parent();
                self.transplant(z, z_left);
            }
            (Some(l), Some(r)) => {
                // Splice the in-order successor into z's position. It
                // inherits z's color, so only its own old slot can come up
                // short a BLACK node.
                let y = self.extreme_from(r, Side::Left);
                spliced_color = self.node(y).color();
                focus = self.node(y).child(Side::Right);
                if self.node(y).parent() == Some(z) {
                    focus_parent = Some(y);
                } else {
                    focus_parent = self.node(y).parent();
                    let y_right = self.node(y).child(Side::Right);
                    self.transplant(y, y_right);
                    self.node_mut(y).set_child(Side::Right, Some(r));
                    self.node_mut(r).set_parent(Some(y));
                }
                self.transplant(z, Some(y));
                self.node_mut(y).set_child(Side::Left, Some(l));
                self.node_mut(l).set_parent(Some(y));
                let z_color = self.node(z).color();
                self.node_mut(y).set_color(z_color);
            }
        }

        self.len -= 1;

        if spliced_color == Color::Black {
            self.delete_fixup(focus, focus_parent);
        }

        let (key, value_handle) = self.nodes.take(z).into_parts();
        (key, self.values.take(value_handle))
    }

    /// Replaces the subtree rooted at `out` with the subtree rooted at
    /// `repl`, repointing the parent link on both sides.
    fn transplant(&mut self, out: Handle, repl: Option<Handle>) {
        let parent = self.node(out).parent();
        match parent {
            None => self.root = repl,
            Some(p) => {
                let side = self.side_of(p, out);
                self.node_mut(p).set_child(side, repl);
            }
        }
        if let Some(r) = repl {
            self.node_mut(r).set_parent(parent);
        }
    }

    /// Restores the red-black properties after splicing out a BLACK node.
    ///
    /// `x` is the node that moved into the spliced slot (possibly absent)
    /// and carries the conceptual extra black; `x_parent` makes the absent
    /// case walkable without a shared sentinel.
    fn delete_fixup(&mut self, mut x: Option<Handle>, mut x_parent: Option<Handle>) {
        while x != self.root && self.color(x) == Color::Black {
            let p = x_parent.expect("`RawRBTreeMap::delete_fixup()` - non-root focus without a parent!");
            // Which side of `p` the deficit sits on. When `x` is absent the
            // hole is the `None` child; its sibling cannot be absent, or the
            // black-heights were unequal before the removal.
            let side = if self.node(p).child(Side::Left) == x {
                Side::Left
            } else {
                Side::Right
            };
            let mut w = self
                .node(p)
                .child(side.opposite())
                .expect("`RawRBTreeMap::delete_fixup()` - missing sibling!");

            if self.node(w).color() == Color::Red {
                // Sibling RED: rotate it above the parent. The new sibling
                // is one of its old children, guaranteed BLACK.
                self.node_mut(w).set_color(Color::Black);
                self.node_mut(p).set_color(Color::Red);
                self.rotate(p, side);
                w = self
                    .node(p)
                    .child(side.opposite())
                    .expect("`RawRBTreeMap::delete_fixup()` - missing sibling after rotation!");
            }

            let near = self.node(w).child(side);
            let far = self.node(w).child(side.opposite());
            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                // Both of the sibling's children BLACK: strip one black off
                // both sides and move the deficit up.
                self.node_mut(w).set_color(Color::Red);
                x = Some(p);
                x_parent = self.node(p).parent();
            } else {
                if self.color(far) == Color::Black {
                    // Near child RED, far child BLACK: rotate the near child
                    // up to become the sibling, with a RED far child.
                    let n = near.expect("`RawRBTreeMap::delete_fixup()` - RED near child is absent!");
                    self.node_mut(n).set_color(Color::Black);
                    self.node_mut(w).set_color(Color::Red);
                    self.rotate(w, side.opposite());
                    w = self
                        .node(p)
                        .child(side.opposite())
                        .expect("`RawRBTreeMap::delete_fixup()` - missing sibling after rotation!");
                }
                // Far child RED: one rotation at the parent settles the
                // deficit. Recolor, rotate, and terminate.
                let p_color = self.node(p).color();
                self.node_mut(w).set_color(p_color);
                self.node_mut(p).set_color(Color::Black);
                let f = self
                    .node(w)
                    .child(side.opposite())
                    .expect("`RawRBTreeMap::delete_fixup()` - RED far child is absent!");
                self.node_mut(f).set_color(Color::Black);
                self.rotate(p, side);
                x = self.root;
                x_parent = None;
            }
        }

        if let Some(h) = x {
            self.node_mut(h).set_color(Color::Black);
        }
    }
}

impl<K: Ord, V> RawRBTreeMap<K, V> {
    /// Verifies the red-black and BST invariants, failing fast on the first
    /// violation. Diagnostic only; never called on the mutation paths.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let Some(root) = self.root else {
            if self.len != 0 {
                return Err(Error::InvariantViolation(format!(
                    "empty tree reports len {}",
                    self.len
                )));
            }
            return Ok(());
        };

        if self.node(root).color() == Color::Red {
            return Err(Error::InvariantViolation("root is not black".into()));
        }
        if self.node(root).parent().is_some() {
            return Err(Error::InvariantViolation("root has a parent link".into()));
        }

        let (_, count) = self.validate_node(root, None, None)?;
        if count != self.len {
            return Err(Error::InvariantViolation(format!(
                "stored len {} does not match reachable node count {count}",
                self.len
            )));
        }
        Ok(())
    }

    /// Checks the subtree at `h` against the open key interval (`min`, `max`)
    /// and returns its black-height and node count.
    fn validate_node(
        &self,
        h: Handle,
        min: Option<&K>,
        max: Option<&K>,
    ) -> Result<(usize, usize), Error> {
        let node = self.node(h);
        let key = node.key();

        if let Some(lo) = min {
            if key <= lo {
                return Err(Error::InvariantViolation(format!(
                    "BST ordering violated at node {}",
                    h.to_index()
                )));
            }
        }
        if let Some(hi) = max {
            if key >= hi {
                return Err(Error::InvariantViolation(format!(
                    "BST ordering violated at node {}",
                    h.to_index()
                )));
            }
        }

        let mut heights = [0usize; 2];
        let mut count = 1usize;
        for (slot, side) in heights.iter_mut().zip([Side::Left, Side::Right]) {
            match node.child(side) {
                None => *slot = 1,
                Some(c) => {
                    let child = self.node(c);
                    if child.parent() != Some(h) {
                        return Err(Error::InvariantViolation(format!(
                            "broken parent link at node {}",
                            c.to_index()
                        )));
                    }
                    if node.color() == Color::Red && child.color() == Color::Red {
                        return Err(Error::InvariantViolation(format!(
                            "red node {} has a red child",
                            h.to_index()
                        )));
                    }
                    let (min, max) = match side {
                        Side::Left => (min, Some(key)),
                        Side::Right => (Some(key), max),
                    };
                    let (height, child_count) = self.validate_node(c, min, max)?;
                    *slot = height;
                    count += child_count;
                }
            }
        }

        if heights[0] != heights[1] {
            return Err(Error::InvariantViolation(format!(
                "black-height mismatch under node {} ({} vs {})",
                h.to_index(),
                heights[0],
                heights[1]
            )));
        }

        let mut height = heights[0];
        if node.color() == Color::Black {
            height += 1;
        }
        Ok((height, count))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn tree_from(keys: &[i32]) -> RawRBTreeMap<i32, i32> {
        let mut tree = RawRBTreeMap::new();
        for &k in keys {
            tree.insert(k, k * 10);
        }
        tree
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = RawRBTreeMap::new();
        for k in 0..256 {
            tree.insert(k, ());
            tree.validate().unwrap();
        }
        assert_eq!(tree.len(), 256);
    }

    #[test]
    fn descending_inserts_stay_balanced() {
        let mut tree = RawRBTreeMap::new();
        for k in (0..256).rev() {
            tree.insert(k, ());
            tree.validate().unwrap();
        }
        assert_eq!(tree.len(), 256);
    }

    #[test]
    fn overwrite_keeps_structure() {
        let mut tree = tree_from(&[3, 1, 4, 1, 5, 9, 2, 6]);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.insert(4, 400), Some(40));
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.get(&4), Some(&400));
        tree.validate().unwrap();
    }

    #[test]
    fn remove_exercises_all_shapes() {
        // Hits the leaf, one-child, and two-children (near and far
        // successor) splice paths.
        let keys = [50, 25, 75, 12, 37, 62, 87, 6, 18, 31, 43, 56, 68, 81, 93];
        let mut tree = tree_from(&keys);
        for &k in &keys {
            assert_eq!(tree.remove(&k), Some(k * 10));
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn drain_is_sorted() {
        let mut tree = tree_from(&[9, 1, 8, 2, 7, 3, 6, 4, 5]);
        let drained: Vec<i32> = tree.drain_to_vec().into_iter().map(|(k, _)| k).collect();
        assert_eq!(drained, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(tree.is_empty());
        tree.validate().unwrap();
    }

    #[test]
    fn step_walks_in_order() {
        let tree = tree_from(&[10, 5, 15, 2, 7, 12, 20]);
        let mut keys = Vec::new();
        let mut cur = tree.first();
        while let Some(h) = cur {
            keys.push(*tree.entry_at(h).0);
            cur = tree.step(h, Side::Right);
        }
        assert_eq!(keys, [2, 5, 7, 10, 12, 15, 20]);

        let mut rev = Vec::new();
        let mut cur = tree.last();
        while let Some(h) = cur {
            rev.push(*tree.entry_at(h).0);
            cur = tree.step(h, Side::Left);
        }
        assert_eq!(rev, [20, 15, 12, 10, 7, 5, 2]);
    }

    #[test]
    #[should_panic(expected = "rotation requires a pivot child")]
    fn rotation_without_pivot_is_fatal() {
        let mut tree = tree_from(&[1]);
        let root = tree.root.unwrap();
        tree.rotate(root, Side::Left);
    }

    #[test]
    fn validate_reports_red_root() {
        let mut tree = tree_from(&[2, 1, 3]);
        let root = tree.root.unwrap();
        tree.node_mut(root).set_color(Color::Red);
        assert!(matches!(tree.validate(), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn validate_reports_black_height_mismatch() {
        let mut tree = tree_from(&[2, 1, 3]);
        let root = tree.root.unwrap();
        let left = tree.node(root).child(Side::Left).unwrap();
        tree.node_mut(left).set_color(Color::Black);
        assert!(matches!(tree.validate(), Err(Error::InvariantViolation(_))));
    }
}
