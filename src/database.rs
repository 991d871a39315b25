//! The header page and the single on-disk table it describes. `Database`
//! is the only thing above the tree that knows about page 0's layout; the
//! tree module never touches it directly.

use crate::err;
use crate::errors::Error;
use crate::storage::node::{self, TABLE_MAX_PAGES};
use crate::storage::pager::Pager;
use crate::storage::row::Row;
use crate::storage::tree::Tree;
use std::path::Path;
use tracing::{debug, info};

/// Page 0: three little-endian u32s, `(num_rows, root_page_num, next_free_page)`.
struct Header {
    num_rows: u32,
    root_page_num: u32,
    next_free_page: u32,
}

impl Header {
    fn read(page: &node::PageBuf) -> Header {
        Header {
            num_rows: u32::from_le_bytes(page[0..4].try_into().unwrap()),
            root_page_num: u32::from_le_bytes(page[4..8].try_into().unwrap()),
            next_free_page: u32::from_le_bytes(page[8..12].try_into().unwrap()),
        }
    }

    fn write(&self, page: &mut node::PageBuf) {
        page[0..4].copy_from_slice(&self.num_rows.to_le_bytes());
        page[4..8].copy_from_slice(&self.root_page_num.to_le_bytes());
        page[8..12].copy_from_slice(&self.next_free_page.to_le_bytes());
    }
}

pub struct Database {
    pager: Pager,
    header: Header,
}

impl Database {
    /// Opens `path`, initializing a fresh single-leaf-root database if the
    /// file is empty, otherwise loading and sanity-checking the header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut pager = Pager::open(&path)?;

        let header = if pager.num_pages() == 0 {
            info!(path = %path.as_ref().display(), "initializing new database");
            let root_page_num = 1u32;
            let next_free_page = 2u32;
            let root = pager.get_unused_page(root_page_num)?;
            node::initialize_leaf(root);
            node::set_is_root(root, true);
            Header {
                num_rows: 0,
                root_page_num,
                next_free_page,
            }
        } else {
            let page = pager.get_page(0)?;
            let header = Header::read(page);
            if header.root_page_num == 0 || header.root_page_num as usize >= TABLE_MAX_PAGES {
                return Err(err!(
                    Corrupt,
                    "header root_page_num {} out of bounds",
                    header.root_page_num
                ));
            }
            // `next_free_page == TABLE_MAX_PAGES` is valid (allocator exhausted,
            // matching `Tree::allocate_page`'s `>= TABLE_MAX_PAGES` rejection);
            // only a cursor past that bound is corrupt.
            if header.next_free_page == 0 || header.next_free_page as usize > TABLE_MAX_PAGES {
                return Err(err!(
                    Corrupt,
                    "header next_free_page {} out of bounds",
                    header.next_free_page
                ));
            }
            debug!(
                num_rows = header.num_rows,
                root_page_num = header.root_page_num,
                "loaded existing database"
            );
            header
        };

        Ok(Database { pager, header })
    }

    fn tree(&mut self) -> Tree<'_> {
        Tree {
            pager: &mut self.pager,
            root_page_num: &mut self.header.root_page_num,
            next_free_page: &mut self.header.next_free_page,
        }
    }

    pub fn insert(&mut self, row: &Row) -> Result<(), Error> {
        self.tree().insert(row)?;
        self.header.num_rows += 1;
        Ok(())
    }

    pub fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.tree().delete(id)?;
        self.header.num_rows -= 1;
        Ok(())
    }

    /// Every live record, in ascending key order.
    pub fn select_all(&mut self) -> Result<Vec<Row>, Error> {
        let mut cursor = self.tree().table_start()?;
        let mut rows = Vec::with_capacity(self.header.num_rows as usize);
        while !cursor.end_of_table {
            let bytes = cursor.value(&mut self.pager)?;
            rows.push(Row::from_bytes(bytes));
            cursor.advance(&mut self.pager)?;
        }
        Ok(rows)
    }

    pub fn pretty_print(&mut self) -> Result<String, Error> {
        self.tree().pretty_print()
    }

    /// Flushes the header and every dirty page, then closes the file.
    pub fn close(&mut self) -> Result<(), Error> {
        let page = self.pager.get_page(0)?;
        self.header.write(page);
        self.pager.close()?;
        info!(num_rows = self.header.num_rows, "database closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::row::Row;

    fn row(id: i32) -> Row {
        Row::new(id, &format!("user{id}"), &format!("user{id}@example.com")).unwrap()
    }

    #[test]
    fn insert_then_select_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(dir.path().join("t.db")).unwrap();
        for id in [3, 1, 2] {
            db.insert(&row(id)).unwrap();
        }
        let rows = db.select_all().unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(dir.path().join("t.db")).unwrap();
        db.insert(&row(1)).unwrap();
        assert!(matches!(db.insert(&row(1)), Err(Error::DuplicateKey(1))));
    }

    #[test]
    fn delete_missing_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(dir.path().join("t.db")).unwrap();
        assert!(matches!(db.delete(42), Err(Error::KeyNotFound(42))));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");
        {
            let mut db = Database::open(&path).unwrap();
            for id in 0..50 {
                db.insert(&row(id)).unwrap();
            }
            db.close().unwrap();
        }
        {
            let mut db = Database::open(&path).unwrap();
            let rows = db.select_all().unwrap();
            assert_eq!(rows.len(), 50);
            assert_eq!(rows[0].id, 0);
            assert_eq!(rows[49].id, 49);
        }
    }

    #[test]
    fn delete_causes_rebalance_and_stays_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(dir.path().join("t.db")).unwrap();
        for id in 0..200 {
            db.insert(&row(id)).unwrap();
        }
        for id in 0..150 {
            db.delete(id).unwrap();
        }
        let rows = db.select_all().unwrap();
        assert_eq!(rows.len(), 50);
        assert_eq!(rows[0].id, 150);
        assert_eq!(rows[49].id, 199);
    }
}
