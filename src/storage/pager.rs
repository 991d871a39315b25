//! The page cache. Mediates every access to the database file: pages are
//! read through on first touch and held resident until `close`; nothing is
//! evicted and nothing is written back except by explicit `flush`/`close`.

use super::node::{new_page, PageBuf, PAGE_SIZE, TABLE_MAX_PAGES};
use crate::err;
use crate::errors::Error;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, trace};

pub struct Pager {
    file: File,
    pages: Vec<Option<Box<PageBuf>>>,
    /// Highest page number touched so far, plus one. Grows as pages beyond
    /// the on-disk end are first fetched; used only to tell a brand-new
    /// database apart from an existing one.
    num_pages: u32,
    /// Number of pages actually present in the file, fixed at the value
    /// observed when the file was opened. `get_page` must only attempt to
    /// read pages below this bound — pages at or beyond it don't exist on
    /// disk yet, no matter how large `num_pages` has since grown in memory.
    on_disk_pages: u32,
}

impl Pager {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;

        let file_len = file.metadata()?.len();
        if file_len % PAGE_SIZE as u64 != 0 {
            return Err(err!(
                Corrupt,
                "database file length {} is not a multiple of the page size {}",
                file_len,
                PAGE_SIZE
            ));
        }
        let num_pages = (file_len / PAGE_SIZE as u64) as u32;

        debug!(path = %path.as_ref().display(), num_pages, "pager opened");

        let mut pages = Vec::with_capacity(TABLE_MAX_PAGES);
        pages.resize_with(TABLE_MAX_PAGES, || None);

        Ok(Pager {
            file,
            pages,
            num_pages,
            on_disk_pages: num_pages,
        })
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Returns the page buffer for `page_num`, reading it from disk on
    /// first touch. A page beyond the current end of file is a fresh,
    /// zeroed buffer that extends the file once flushed.
    pub fn get_page(&mut self, page_num: u32) -> Result<&mut PageBuf, Error> {
        if page_num as usize >= TABLE_MAX_PAGES {
            return Err(err!(
                Corrupt,
                "page {} is out of bounds (max {})",
                page_num,
                TABLE_MAX_PAGES
            ));
        }

        if self.pages[page_num as usize].is_none() {
            let mut buf = new_page();

            if page_num < self.on_disk_pages {
                trace!(page_num, "reading page from disk");
                self.file
                    .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))?;
                self.file.read_exact(buf.as_mut())?;
            }

            self.pages[page_num as usize] = Some(buf);

            if page_num >= self.num_pages {
                self.num_pages = page_num + 1;
            }
        }

        Ok(self.pages[page_num as usize].as_mut().unwrap())
    }

    /// Allocates and zeroes a brand-new page, installing it in the cache.
    pub fn get_unused_page(&mut self, page_num: u32) -> Result<&mut PageBuf, Error> {
        debug_assert!(self.pages[page_num as usize].is_none());
        self.get_page(page_num)
    }

    pub fn flush(&mut self, page_num: u32) -> Result<(), Error> {
        let Some(buf) = self.pages[page_num as usize].as_ref() else {
            return Ok(());
        };
        trace!(page_num, "flushing page to disk");
        self.file
            .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))?;
        self.file.write_all(buf.as_ref())?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), Error> {
        for page_num in 0..TABLE_MAX_PAGES as u32 {
            if self.pages[page_num as usize].is_some() {
                self.flush(page_num)?;
                self.pages[page_num as usize] = None;
            }
        }
        self.file.flush()?;
        debug!("pager closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::node::{initialize_leaf, set_leaf_num_cells};

    #[test]
    fn fresh_file_has_zero_pages() {
        let dir = tempfile::tempdir().unwrap();
        let pager = Pager::open(dir.path().join("t.db")).unwrap();
        assert_eq!(pager.num_pages(), 0);
    }

    #[test]
    fn get_page_extends_and_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");

        {
            let mut pager = Pager::open(&path).unwrap();
            let page = pager.get_page(1).unwrap();
            initialize_leaf(page);
            set_leaf_num_cells(page, 3);
            pager.close().unwrap();
        }

        {
            let mut pager = Pager::open(&path).unwrap();
            assert_eq!(pager.num_pages(), 2);
            let page = pager.get_page(1).unwrap();
            assert_eq!(crate::storage::node::leaf_num_cells(page), 3);
        }
    }

    #[test]
    fn rejects_misaligned_file_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");
        std::fs::write(&path, vec![0u8; 100]).unwrap();
        assert!(Pager::open(&path).is_err());
    }

    #[test]
    fn out_of_bounds_page_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("t.db")).unwrap();
        let err = pager.get_page(TABLE_MAX_PAGES as u32).unwrap_err();
        assert!(err.is_fatal());
    }
}
