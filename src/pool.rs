//! Tracked heap arena with bounded lifetime and leak-checking.
//!
//! Grounded on `examples/original_source/pdfras_writer/PdfAlloc.c`: the C
//! original threads every allocation through a pool so that the whole
//! document graph can be torn down in one call. Rust's ownership model
//! makes the per-block free-list unnecessary for safety, but the pool
//! still needs to track `alloc_count`/`alloc_bytes` precisely and support
//! the same "pool wide teardown regardless of who still holds a handle"
//! behavior the C original has, so blocks are `Rc<RefCell<_>>`-backed
//! rather than owned outright.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct PoolInner {
    alloc_count: usize,
    alloc_bytes: usize,
    live: Vec<LiveEntry>,
}

struct LiveEntry {
    data: Rc<RefCell<Vec<u8>>>,
    freed: Rc<Cell<bool>>,
    size: usize,
}

/// A lifetime-bounded memory arena. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Pool {
    inner: Rc<RefCell<PoolInner>>,
}

impl Pool {
    pub fn new() -> Self {
        Pool {
            inner: Rc::new(RefCell::new(PoolInner {
                alloc_count: 0,
                alloc_bytes: 0,
                live: Vec::new(),
            })),
        }
    }

    /// Allocates a zero-filled block of exactly `n_bytes`. Zero is a valid size.
    pub fn alloc(&self, n_bytes: usize) -> Block {
        let data = Rc::new(RefCell::new(vec![0u8; n_bytes]));
        let freed = Rc::new(Cell::new(false));
        {
            let mut inner = self.inner.borrow_mut();
            inner.live.push(LiveEntry {
                data: data.clone(),
                freed: freed.clone(),
                size: n_bytes,
            });
            inner.alloc_count += 1;
            inner.alloc_bytes += n_bytes;
        }
        Block {
            pool: self.clone(),
            data,
            freed,
            size: n_bytes,
        }
    }

    /// Returns a block to the pool immediately rather than waiting for `Drop`.
    pub fn free(&self, block: Block) {
        self.release(&block);
    }

    pub fn block_count(&self) -> usize {
        self.inner.borrow().alloc_count
    }

    pub fn bytes_in_use(&self) -> usize {
        self.inner.borrow().alloc_bytes
    }

    /// Frees every block still live in this pool, regardless of whether a
    /// caller is still holding a [`Block`] handle to it.
    pub fn clean(&self) {
        let mut inner = self.inner.borrow_mut();
        for entry in inner.live.drain(..) {
            entry.freed.set(true);
            for b in entry.data.borrow_mut().iter_mut() {
                *b = 0;
            }
        }
        inner.alloc_count = 0;
        inner.alloc_bytes = 0;
    }

    fn release(&self, block: &Block) {
        if block.freed.get() {
            return;
        }
        block.freed.set(true);
        for b in block.data.borrow_mut().iter_mut() {
            *b = 0;
        }
        let mut inner = self.inner.borrow_mut();
        inner.alloc_count -= 1;
        inner.alloc_bytes -= block.size;
        inner.live.retain(|e| !Rc::ptr_eq(&e.freed, &block.freed));
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

/// A single allocation from a [`Pool`]. Dropping it returns the memory to
/// its pool; calling [`Pool::free`] does the same thing earlier.
pub struct Block {
    pool: Pool,
    data: Rc<RefCell<Vec<u8>>>,
    freed: Rc<Cell<bool>>,
    size: usize,
}

impl Block {
    pub fn size(&self) -> usize {
        if self.freed.get() { 0 } else { self.size }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn bytes(&self) -> std::cell::Ref<'_, Vec<u8>> {
        self.data.borrow()
    }

    pub fn bytes_mut(&self) -> std::cell::RefMut<'_, Vec<u8>> {
        self.data.borrow_mut()
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        let pool = self.pool.clone();
        pool.release(self);
    }
}

/// Allocates from `pool`, or returns `None` if `pool` is absent.
///
/// Matches the C contract that `pd_alloc(NULL, n)` returns `NULL` rather
/// than panicking.
pub fn alloc(pool: Option<&Pool>, n_bytes: usize) -> Option<Block> {
    pool.map(|p| p.alloc(n_bytes))
}

/// Frees `block`, or does nothing if absent.
pub fn free(block: Option<Block>) {
    if let Some(b) = block {
        let pool = b.pool.clone();
        pool.release(&b);
    }
}

/// Returns the owning pool of `block`, or `None` if absent.
pub fn get_pool(block: Option<&Block>) -> Option<Pool> {
    block.map(|b| b.pool.clone())
}

/// Returns the size of `block`, or `0` if absent or already freed.
pub fn block_size(block: Option<&Block>) -> usize {
    block.map(|b| b.size()).unwrap_or(0)
}
