//! The B+tree itself: search, insert (with split), delete (with
//! rebalance), and the free-form pretty printer. Every function takes an
//! explicit `Tree` borrowing the pager and the two header fields it needs
//! to mutate (`root_page_num`, `next_free_page`) — there is no ambient
//! mutable state.

use super::cursor::{table_start, Cursor};
use super::node::{self, NodeType, LEAF_NODE_LEFT_SPLIT_COUNT, LEAF_NODE_MAX_CELLS,
    LEAF_NODE_MIN_CELLS, INTERNAL_NODE_MAX_CHILDREN, INTERNAL_NODE_MIN_KEYS, TABLE_MAX_PAGES};
use super::pager::Pager;
use super::row::{Row, ROW_SIZE};
use crate::err;
use crate::errors::Error;
use tracing::{debug, trace};

pub struct Tree<'a> {
    pub pager: &'a mut Pager,
    pub root_page_num: &'a mut u32,
    pub next_free_page: &'a mut u32,
}

impl<'a> Tree<'a> {
    fn allocate_page(&mut self) -> Result<u32, Error> {
        if *self.next_free_page as usize >= TABLE_MAX_PAGES {
            return Err(err!(Corrupt, "out of pages (max {})", TABLE_MAX_PAGES));
        }
        let page_num = *self.next_free_page;
        *self.next_free_page += 1;
        Ok(page_num)
    }

    /// The maximum key stored anywhere beneath `page_num`.
    fn max_key(&mut self, page_num: u32) -> Result<i32, Error> {
        let page = self.pager.get_page(page_num)?;
        match node::node_type(page) {
            NodeType::Leaf => {
                let n = node::leaf_num_cells(page);
                Ok(if n == 0 { 0 } else { node::leaf_key(page, n - 1) })
            }
            NodeType::Internal => {
                let right = node::internal_right_child(page);
                self.max_key(right)
            }
        }
    }

    // --- search (spec 4.3) ---

    fn internal_find_child(page: &node::PageBuf, key: i32) -> u32 {
        let num_keys = node::internal_num_keys(page);
        let (mut left, mut right) = (0u32, num_keys);
        while left < right {
            let mid = left + (right - left) / 2;
            if node::internal_key(page, mid) >= key {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        left
    }

    fn leaf_find(&mut self, page_num: u32, key: i32) -> Result<Cursor, Error> {
        let page = self.pager.get_page(page_num)?;
        let n = node::leaf_num_cells(page);
        let (mut left, mut right) = (0u32, n);
        while left < right {
            let mid = left + (right - left) / 2;
            let mid_key = node::leaf_key(page, mid);
            if mid_key == key {
                return Ok(Cursor {
                    page_num,
                    cell_num: mid,
                    end_of_table: false,
                });
            } else if mid_key < key {
                left = mid + 1;
            } else {
                right = mid;
            }
        }
        Ok(Cursor {
            page_num,
            cell_num: left,
            end_of_table: left >= n,
        })
    }

    pub fn table_find(&mut self, key: i32) -> Result<Cursor, Error> {
        let mut page_num = *self.root_page_num;
        loop {
            let page = self.pager.get_page(page_num)?;
            match node::node_type(page) {
                NodeType::Leaf => return self.leaf_find(page_num, key),
                NodeType::Internal => {
                    let child_index = Self::internal_find_child(page, key);
                    let num_keys = node::internal_num_keys(page);
                    page_num = if child_index == num_keys {
                        node::internal_right_child(page)
                    } else {
                        node::internal_child(page, child_index)
                    };
                }
            }
        }
    }

    pub fn table_start(&mut self) -> Result<Cursor, Error> {
        table_start(self.pager, *self.root_page_num)
    }

    // --- rebuild-from-children-list (spec 4.5, design notes 9) ---

    fn children_of(&mut self, internal_page: u32) -> Result<Vec<u32>, Error> {
        let page = self.pager.get_page(internal_page)?;
        let num_keys = node::internal_num_keys(page);
        let mut children = Vec::with_capacity(num_keys as usize + 1);
        for i in 0..num_keys {
            children.push(node::internal_child(page, i));
        }
        children.push(node::internal_right_child(page));
        Ok(children)
    }

    fn sort_children_by_max_key(&mut self, children: &mut [u32]) -> Result<(), Error> {
        // Small lists (at most INTERNAL_NODE_MAX_CHILDREN + 1); insertion sort.
        let mut keys = Vec::with_capacity(children.len());
        for &c in children.iter() {
            keys.push(self.max_key(c)?);
        }
        for i in 1..children.len() {
            let mut j = i;
            while j > 0 && keys[j - 1] > keys[j] {
                keys.swap(j - 1, j);
                children.swap(j - 1, j);
                j -= 1;
            }
        }
        Ok(())
    }

    /// Rebuilds `internal_page` from a sorted children list, preserving its
    /// `is_root`/`parent_page` and reparenting every child to this page.
    fn rebuild_internal(&mut self, internal_page: u32, children: &[u32]) -> Result<(), Error> {
        if children.len() < 2 {
            return Err(err!(
                Corrupt,
                "internal node rebuild needs at least 2 children, got {}",
                children.len()
            ));
        }
        if children.len() > INTERNAL_NODE_MAX_CHILDREN {
            return Err(err!(
                Corrupt,
                "internal node rebuild given {} children, max is {}",
                children.len(),
                INTERNAL_NODE_MAX_CHILDREN
            ));
        }

        let page = self.pager.get_page(internal_page)?;
        let root_flag = node::is_root(page);
        let parent_page = node::parent(page);
        node::initialize_internal(page);
        node::set_is_root(page, root_flag);
        node::set_parent(page, parent_page);

        let num_keys = (children.len() - 1) as u32;
        for (i, &child) in children.iter().enumerate() {
            if (i as u32) < num_keys {
                let max_key = self.max_key(child)?;
                let page = self.pager.get_page(internal_page)?;
                node::set_internal_child(page, i as u32, child);
                node::set_internal_key(page, i as u32, max_key);
            }
            let child_page = self.pager.get_page(child)?;
            node::set_parent(child_page, internal_page);
            if node::is_root(child_page) {
                node::set_is_root(child_page, false);
            }
        }
        let page = self.pager.get_page(internal_page)?;
        node::set_internal_num_keys(page, num_keys);
        node::set_internal_right_child(page, *children.last().unwrap());
        Ok(())
    }

    /// Finds `child_page`'s stored key slot in `parent_page` and refreshes
    /// it to `child_page`'s current max key. A no-op if `child_page` is the
    /// parent's `right_child` (no key is stored for it).
    fn update_key_for_child(&mut self, parent_page: u32, child_page: u32) -> Result<(), Error> {
        let page = self.pager.get_page(parent_page)?;
        let num_keys = node::internal_num_keys(page);
        let mut slot = None;
        for i in 0..num_keys {
            if node::internal_child(page, i) == child_page {
                slot = Some(i);
                break;
            }
        }
        if let Some(i) = slot {
            let max_key = self.max_key(child_page)?;
            let page = self.pager.get_page(parent_page)?;
            node::set_internal_key(page, i, max_key);
        }
        Ok(())
    }

    // --- insert (spec 4.5) ---

    pub fn insert(&mut self, row: &Row) -> Result<(), Error> {
        let cursor = self.table_find(row.id)?;
        let leaf = self.pager.get_page(cursor.page_num)?;
        let n = node::leaf_num_cells(leaf);

        if cursor.cell_num < n && node::leaf_key(leaf, cursor.cell_num) == row.id {
            return Err(Error::DuplicateKey(row.id));
        }

        let mut value = [0u8; ROW_SIZE];
        row.write_bytes(&mut value);

        if n < LEAF_NODE_MAX_CELLS as u32 {
            self.leaf_insert_no_split(&cursor, row.id, &value)?;
        } else {
            self.leaf_split_and_insert(&cursor, row.id, &value)?;
        }
        Ok(())
    }

    fn leaf_insert_no_split(
        &mut self,
        cursor: &Cursor,
        key: i32,
        value: &[u8],
    ) -> Result<(), Error> {
        let leaf = self.pager.get_page(cursor.page_num)?;
        let n = node::leaf_num_cells(leaf);
        node::leaf_shift_right(leaf, cursor.cell_num, n);
        node::set_leaf_cell(leaf, cursor.cell_num, key, value);
        node::set_leaf_num_cells(leaf, n + 1);
        Ok(())
    }

    fn leaf_split_and_insert(
        &mut self,
        cursor: &Cursor,
        key: i32,
        value: &[u8],
    ) -> Result<(), Error> {
        let old_page = cursor.page_num;
        let new_page = self.allocate_page()?;

        let old_n = node::leaf_num_cells(self.pager.get_page(old_page)?);
        let total = old_n + 1;
        let insert_at = cursor.cell_num.min(old_n);

        // Gather existing cells plus the new one into a temporary buffer,
        // in sorted order, then split into left/right halves.
        let mut keys = Vec::with_capacity(total as usize);
        let mut values = Vec::with_capacity(total as usize);
        {
            let old_leaf = self.pager.get_page(old_page)?;
            for i in 0..old_n {
                if i == insert_at {
                    keys.push(key);
                    values.push(value.to_vec());
                }
                keys.push(node::leaf_key(old_leaf, i));
                values.push(node::leaf_value(old_leaf, i).to_vec());
            }
            if insert_at == old_n {
                keys.push(key);
                values.push(value.to_vec());
            }
        }

        let left_count = LEAF_NODE_LEFT_SPLIT_COUNT as u32;
        let right_count = total - left_count;
        debug!(old_page, new_page, total, left_count, "splitting leaf");

        let next_after_old = node::leaf_next_leaf(self.pager.get_page(old_page)?);
        let old_parent = node::parent(self.pager.get_page(old_page)?);

        let new_leaf = self.pager.get_unused_page(new_page)?;
        node::initialize_leaf(new_leaf);
        node::set_leaf_next_leaf(new_leaf, next_after_old);
        node::set_parent(new_leaf, old_parent);
        for i in 0..right_count {
            let idx = (left_count + i) as usize;
            node::set_leaf_cell(new_leaf, i, keys[idx], &values[idx]);
        }
        node::set_leaf_num_cells(new_leaf, right_count);

        let old_leaf = self.pager.get_page(old_page)?;
        node::set_leaf_next_leaf(old_leaf, new_page);
        for i in 0..left_count {
            node::set_leaf_cell(old_leaf, i, keys[i as usize], &values[i as usize]);
        }
        node::set_leaf_num_cells(old_leaf, left_count);

        self.insert_into_parent(old_page, new_page)
    }

    fn insert_into_parent(&mut self, left_page: u32, right_page: u32) -> Result<(), Error> {
        let left = self.pager.get_page(left_page)?;
        if node::is_root(left) {
            return self.create_new_root(right_page);
        }

        let parent_page = node::parent(left);
        self.update_key_for_child(parent_page, left_page)?;
        self.internal_insert_child(parent_page, right_page)
    }

    /// Keeps `root_page_num` stable across a root split by copying the old
    /// root's bytes into a freshly allocated page (the new left child) and
    /// reinitializing the original page as the new internal root.
    fn create_new_root(&mut self, right_child_page: u32) -> Result<(), Error> {
        let root_page = *self.root_page_num;
        let left_page = self.allocate_page()?;

        let root_bytes = *self.pager.get_page(root_page)?;
        let left = self.pager.get_unused_page(left_page)?;
        *left = root_bytes;
        node::set_is_root(left, false);
        node::set_parent(left, root_page);

        // If the promoted node is itself internal, its own children still
        // point at `root_page` as parent; repoint them at `left_page`.
        if node::node_type(left) == NodeType::Internal {
            let children = self.children_of(left_page)?;
            for child in children {
                let child_page = self.pager.get_page(child)?;
                node::set_parent(child_page, left_page);
            }
        }

        let root = self.pager.get_page(root_page)?;
        node::initialize_internal(root);
        node::set_is_root(root, true);
        node::set_parent(root, 0);

        let mut children = [left_page, right_child_page];
        self.sort_children_by_max_key(&mut children)?;
        self.rebuild_internal(root_page, &children)?;
        debug!(root_page, left_page, right_child_page, "created new root");
        Ok(())
    }

    fn internal_insert_child(&mut self, parent_page: u32, new_child: u32) -> Result<(), Error> {
        let mut children = self.children_of(parent_page)?;
        children.push(new_child);
        self.sort_children_by_max_key(&mut children)?;

        if children.len() <= INTERNAL_NODE_MAX_CHILDREN {
            return self.rebuild_internal(parent_page, &children);
        }

        let new_internal_page = self.allocate_page()?;
        let left_count = children.len() / 2;
        let (left_children, right_children) = children.split_at(left_count);

        let parent = self.pager.get_page(parent_page)?;
        let parent_is_root = node::is_root(parent);
        let grandparent_page = node::parent(parent);

        {
            let new_internal = self.pager.get_unused_page(new_internal_page)?;
            node::initialize_internal(new_internal);
        }

        self.rebuild_internal(parent_page, left_children)?;
        self.rebuild_internal(new_internal_page, right_children)?;

        if parent_is_root {
            return self.create_new_root(new_internal_page);
        }

        if grandparent_page == 0 {
            return Err(err!(Corrupt, "non-root internal node has no parent"));
        }
        self.update_key_for_child(grandparent_page, parent_page)?;
        self.internal_insert_child(grandparent_page, new_internal_page)
    }

    // --- delete (spec 4.6) ---

    pub fn delete(&mut self, key: i32) -> Result<(), Error> {
        let cursor = self.table_find(key)?;
        let leaf = self.pager.get_page(cursor.page_num)?;
        let n = node::leaf_num_cells(leaf);

        if cursor.cell_num >= n || node::leaf_key(leaf, cursor.cell_num) != key {
            return Err(Error::KeyNotFound(key));
        }

        node::leaf_shift_left(leaf, cursor.cell_num, n);
        node::set_leaf_num_cells(leaf, n - 1);

        let leaf = self.pager.get_page(cursor.page_num)?;
        let min_cells = if node::is_root(leaf) {
            1
        } else {
            LEAF_NODE_MIN_CELLS as u32
        };
        if node::leaf_num_cells(leaf) < min_cells {
            self.rebalance_leaf(cursor.page_num)?;
        }
        Ok(())
    }

    fn find_siblings(&mut self, page_num: u32) -> Result<Option<(u32, u32, u32)>, Error> {
        let page = self.pager.get_page(page_num)?;
        if node::is_root(page) {
            return Ok(None);
        }
        let parent_page = node::parent(page);
        let parent = self.pager.get_page(parent_page)?;
        let num_keys = node::internal_num_keys(parent);

        for i in 0..=num_keys {
            let child = node::internal_child_at(parent, i);
            if child == page_num {
                let left = if i > 0 {
                    node::internal_child(parent, i - 1)
                } else {
                    0
                };
                let right = if i == num_keys {
                    0
                } else if i + 1 < num_keys {
                    node::internal_child(parent, i + 1)
                } else {
                    node::internal_right_child(parent)
                };
                return Ok(Some((left, right, parent_page)));
            }
        }
        Err(err!(
            Corrupt,
            "node {} not found among its parent {}'s children",
            page_num,
            parent_page
        ))
    }

    fn rebalance_leaf(&mut self, leaf_page: u32) -> Result<(), Error> {
        let Some((left, right, parent)) = self.find_siblings(leaf_page)? else {
            return Ok(());
        };

        if left != 0 && self.try_borrow_leaf_from_left(leaf_page, left, parent)? {
            return Ok(());
        }
        if right != 0 && self.try_borrow_leaf_from_right(leaf_page, right, parent)? {
            return Ok(());
        }

        if left != 0 {
            self.merge_leaves(left, leaf_page, parent)?;
        } else if right != 0 {
            self.merge_leaves(leaf_page, right, parent)?;
        }
        self.maybe_shrink_root()
    }

    fn try_borrow_leaf_from_left(
        &mut self,
        leaf_page: u32,
        left_page: u32,
        parent_page: u32,
    ) -> Result<bool, Error> {
        let left_n = node::leaf_num_cells(self.pager.get_page(left_page)?);
        if left_n <= LEAF_NODE_MIN_CELLS as u32 {
            return Ok(false);
        }

        let borrow_idx = left_n - 1;
        let borrowed_key = node::leaf_key(self.pager.get_page(left_page)?, borrow_idx);
        let borrowed_value = node::leaf_value(self.pager.get_page(left_page)?, borrow_idx).to_vec();

        let leaf = self.pager.get_page(leaf_page)?;
        let n = node::leaf_num_cells(leaf);
        node::leaf_shift_right(leaf, 0, n);
        node::set_leaf_cell(leaf, 0, borrowed_key, &borrowed_value);
        node::set_leaf_num_cells(leaf, n + 1);

        let left = self.pager.get_page(left_page)?;
        node::set_leaf_num_cells(left, left_n - 1);

        self.update_key_for_child(parent_page, left_page)?;
        trace!(leaf_page, left_page, "borrowed leaf cell from left sibling");
        Ok(true)
    }

    fn try_borrow_leaf_from_right(
        &mut self,
        leaf_page: u32,
        right_page: u32,
        parent_page: u32,
    ) -> Result<bool, Error> {
        let right_n = node::leaf_num_cells(self.pager.get_page(right_page)?);
        if right_n <= LEAF_NODE_MIN_CELLS as u32 {
            return Ok(false);
        }

        let right = self.pager.get_page(right_page)?;
        let borrowed_key = node::leaf_key(right, 0);
        let borrowed_value = node::leaf_value(right, 0).to_vec();

        let leaf = self.pager.get_page(leaf_page)?;
        let n = node::leaf_num_cells(leaf);
        node::set_leaf_cell(leaf, n, borrowed_key, &borrowed_value);
        node::set_leaf_num_cells(leaf, n + 1);

        let right = self.pager.get_page(right_page)?;
        node::leaf_shift_left(right, 0, right_n);
        node::set_leaf_num_cells(right, right_n - 1);

        self.update_key_for_child(parent_page, leaf_page)?;
        trace!(leaf_page, right_page, "borrowed leaf cell from right sibling");
        Ok(true)
    }

    fn merge_leaves(&mut self, left_page: u32, right_page: u32, parent_page: u32) -> Result<(), Error> {
        let right_n = node::leaf_num_cells(self.pager.get_page(right_page)?);
        let mut cells = Vec::with_capacity(right_n as usize);
        {
            let right = self.pager.get_page(right_page)?;
            for i in 0..right_n {
                cells.push((node::leaf_key(right, i), node::leaf_value(right, i).to_vec()));
            }
        }
        let next_leaf = node::leaf_next_leaf(self.pager.get_page(right_page)?);

        let left = self.pager.get_page(left_page)?;
        let left_n = node::leaf_num_cells(left);
        for (i, (key, value)) in cells.iter().enumerate() {
            node::set_leaf_cell(left, left_n + i as u32, *key, value);
        }
        node::set_leaf_num_cells(left, left_n + right_n);
        node::set_leaf_next_leaf(left, next_leaf);

        debug!(left_page, right_page, "merged leaf nodes");
        self.internal_remove_child(parent_page, right_page)
    }

    fn internal_remove_child(&mut self, parent_page: u32, removed_child: u32) -> Result<(), Error> {
        let children: Vec<u32> = self
            .children_of(parent_page)?
            .into_iter()
            .filter(|&c| c != removed_child)
            .collect();

        if children.len() >= 2 {
            self.rebuild_internal(parent_page, &children)?;
        } else if children.len() == 1 {
            let parent = self.pager.get_page(parent_page)?;
            node::set_internal_num_keys(parent, 0);
            node::set_internal_right_child(parent, children[0]);
            let child_page = self.pager.get_page(children[0])?;
            node::set_parent(child_page, parent_page);
        }

        let parent = self.pager.get_page(parent_page)?;
        let min_keys = if node::is_root(parent) {
            0
        } else {
            INTERNAL_NODE_MIN_KEYS as u32
        };
        if node::internal_num_keys(parent) < min_keys {
            self.rebalance_internal(parent_page)?;
        }
        Ok(())
    }

    fn rebalance_internal(&mut self, internal_page: u32) -> Result<(), Error> {
        let Some((left, right, parent)) = self.find_siblings(internal_page)? else {
            return Ok(());
        };

        if left != 0 && self.try_borrow_internal_from_left(internal_page, left, parent)? {
            return Ok(());
        }
        if right != 0 && self.try_borrow_internal_from_right(internal_page, right, parent)? {
            return Ok(());
        }

        if left != 0 {
            self.merge_internals(left, internal_page, parent)?;
        } else if right != 0 {
            self.merge_internals(internal_page, right, parent)?;
        }
        self.maybe_shrink_root()
    }

    fn try_borrow_internal_from_left(
        &mut self,
        internal_page: u32,
        left_page: u32,
        parent_page: u32,
    ) -> Result<bool, Error> {
        let left_page_buf = self.pager.get_page(left_page)?;
        if node::node_type(left_page_buf) != NodeType::Internal {
            return Ok(false);
        }
        if node::internal_num_keys(left_page_buf) <= INTERNAL_NODE_MIN_KEYS as u32 {
            return Ok(false);
        }

        let mut left_children = self.children_of(left_page)?;
        let borrowed = left_children.pop().unwrap();
        self.rebuild_internal(left_page, &left_children)?;

        let mut curr_children = self.children_of(internal_page)?;
        curr_children.insert(0, borrowed);
        self.rebuild_internal(internal_page, &curr_children)?;

        self.update_key_for_child(parent_page, left_page)?;
        self.update_key_for_child(parent_page, internal_page)?;
        trace!(internal_page, left_page, "borrowed internal child from left sibling");
        Ok(true)
    }

    fn try_borrow_internal_from_right(
        &mut self,
        internal_page: u32,
        right_page: u32,
        parent_page: u32,
    ) -> Result<bool, Error> {
        let right_page_buf = self.pager.get_page(right_page)?;
        if node::node_type(right_page_buf) != NodeType::Internal {
            return Ok(false);
        }
        if node::internal_num_keys(right_page_buf) <= INTERNAL_NODE_MIN_KEYS as u32 {
            return Ok(false);
        }

        let mut right_children = self.children_of(right_page)?;
        let borrowed = right_children.remove(0);
        self.rebuild_internal(right_page, &right_children)?;

        let mut curr_children = self.children_of(internal_page)?;
        curr_children.push(borrowed);
        self.rebuild_internal(internal_page, &curr_children)?;

        self.update_key_for_child(parent_page, internal_page)?;
        self.update_key_for_child(parent_page, right_page)?;
        trace!(internal_page, right_page, "borrowed internal child from right sibling");
        Ok(true)
    }

    fn merge_internals(&mut self, left_page: u32, right_page: u32, parent_page: u32) -> Result<(), Error> {
        let left_buf = self.pager.get_page(left_page)?;
        if node::node_type(left_buf) != NodeType::Internal {
            return Ok(());
        }
        let right_buf = self.pager.get_page(right_page)?;
        if node::node_type(right_buf) != NodeType::Internal {
            return Ok(());
        }

        let mut all_children = self.children_of(left_page)?;
        all_children.extend(self.children_of(right_page)?);
        self.rebuild_internal(left_page, &all_children)?;

        debug!(left_page, right_page, "merged internal nodes");
        self.internal_remove_child(parent_page, right_page)
    }

    /// Promotes the root's sole child to root if the root internal node has
    /// been emptied down to a single `right_child`.
    fn maybe_shrink_root(&mut self) -> Result<(), Error> {
        let root_page = *self.root_page_num;
        let root = self.pager.get_page(root_page)?;
        if node::node_type(root) != NodeType::Internal || node::internal_num_keys(root) != 0 {
            return Ok(());
        }

        let new_root = node::internal_right_child(root);
        let child = self.pager.get_page(new_root)?;
        node::set_is_root(child, true);
        node::set_parent(child, 0);

        *self.root_page_num = new_root;
        debug!(old_root = root_page, new_root, "shrank root, tree height decreased");
        Ok(())
    }

    // --- pretty printer (spec 4.8) ---

    pub fn pretty_print(&mut self) -> Result<String, Error> {
        let mut out = String::new();
        self.print_node(*self.root_page_num, 0, &mut out)?;
        Ok(out)
    }

    fn print_node(&mut self, page_num: u32, level: u32, out: &mut String) -> Result<(), Error> {
        let indent = "  ".repeat(level as usize);
        let page = self.pager.get_page(page_num)?;

        match node::node_type(page) {
            NodeType::Leaf => {
                let n = node::leaf_num_cells(page);
                out.push_str(&indent);
                out.push_str(&format!("- leaf (page {}, {} cells): ", page_num, n));
                for i in 0..n {
                    out.push_str(&node::leaf_key(page, i).to_string());
                    out.push(' ');
                }
                out.push('\n');
            }
            NodeType::Internal => {
                let num_keys = node::internal_num_keys(page);
                out.push_str(&indent);
                out.push_str(&format!("- internal (page {}, {} keys)\n", page_num, num_keys));

                for i in 0..num_keys {
                    let (child, key) = {
                        let page = self.pager.get_page(page_num)?;
                        (node::internal_child(page, i), node::internal_key(page, i))
                    };
                    self.print_node(child, level + 1, out)?;
                    out.push_str(&"  ".repeat(level as usize + 1));
                    out.push_str(&format!("key <= {}\n", key));
                }

                let right = node::internal_right_child(self.pager.get_page(page_num)?);
                self.print_node(right, level + 1, out)?;
            }
        }
        Ok(())
    }
}
