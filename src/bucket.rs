use std::collections::TryReserveError;

use crate::error::{FasError, Result};

const NIL: usize = usize::MAX;

/// A bucket priority queue over the vertices `0..n`.
///
/// For every possible score we have a bucket holding all vertices of that score as an intrusive
/// doubly linked list. Links live in flat per-vertex arrays, `NIL` marks a missing link, so no
/// list node is ever allocated. Each vertex remembers the bucket it sits in, which makes removal
/// by handle O(1).
///
/// `top` is an upper bound on the highest nonempty bucket: every bucket above it is empty. It is
/// raised by inserts and lowered lazily by `pop_highest`.
#[derive(Debug, Clone)]
pub struct BucketQueue {
    head: Vec<usize>,
    tail: Vec<usize>,
    prev: Vec<usize>,
    next: Vec<usize>,
    key: Vec<usize>,
    top: usize,
    len: usize,
}

impl BucketQueue {
    /// Creates an empty queue with `num_buckets` buckets for vertices `0..n`. Fails instead of
    /// aborting when the arrays cannot be allocated.
    pub fn new(num_buckets: usize, n: usize) -> Result<BucketQueue> {
        let alloc_err = |_| FasError::BucketAllocation { buckets: num_buckets };
        Ok(BucketQueue {
            head: nil_vec(num_buckets).map_err(alloc_err)?,
            tail: nil_vec(num_buckets).map_err(alloc_err)?,
            prev: nil_vec(n).map_err(alloc_err)?,
            next: nil_vec(n).map_err(alloc_err)?,
            key: nil_vec(n).map_err(alloc_err)?,
            top: 0,
            len: 0,
        })
    }

    pub fn num_buckets(&self) -> usize {
        self.head.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bucket currently holding `v`, if any.
    pub fn key_of(&self, v: usize) -> Option<usize> {
        match self.key[v] {
            NIL => None,
            k => Some(k),
        }
    }

    /// Vertices of bucket `k` from head to tail.
    pub fn bucket(&self, k: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = self.head[k];
        while cur != NIL {
            out.push(cur);
            cur = self.next[cur];
        }
        out
    }

    /// Makes `v` the new head of bucket `k`. `v` must not currently be queued.
    pub fn insert_front(&mut self, k: usize, v: usize) -> Result<()> {
        if k >= self.head.len() {
            return Err(FasError::BucketOutOfRange { key: k, buckets: self.head.len() });
        }
        debug_assert_eq!(self.key[v], NIL, "vertex {v} is already queued");
        let old = self.head[k];
        self.next[v] = old;
        self.prev[v] = NIL;
        if old == NIL {
            self.tail[k] = v;
        } else {
            self.prev[old] = v;
        }
        self.head[k] = v;
        self.key[v] = k;
        self.top = self.top.max(k);
        self.len += 1;
        Ok(())
    }

    /// Appends `v` at the tail of bucket `k`. Only used while seeding, so that vertices of equal
    /// score start out in index order.
    pub fn push_back(&mut self, k: usize, v: usize) -> Result<()> {
        if k >= self.head.len() {
            return Err(FasError::BucketOutOfRange { key: k, buckets: self.head.len() });
        }
        debug_assert_eq!(self.key[v], NIL, "vertex {v} is already queued");
        let old = self.tail[k];
        self.prev[v] = old;
        self.next[v] = NIL;
        if old == NIL {
            self.head[k] = v;
        } else {
            self.next[old] = v;
        }
        self.tail[k] = v;
        self.key[v] = k;
        self.top = self.top.max(k);
        self.len += 1;
        Ok(())
    }

    /// Unlinks `v` from whichever bucket holds it and returns that bucket's key. Returns `None`
    /// if `v` is not queued.
    pub fn remove(&mut self, v: usize) -> Option<usize> {
        let k = self.key_of(v)?;
        let (p, nx) = (self.prev[v], self.next[v]);
        if p == NIL {
            self.head[k] = nx;
        } else {
            self.next[p] = nx;
        }
        if nx == NIL {
            self.tail[k] = p;
        } else {
            self.prev[nx] = p;
        }
        self.prev[v] = NIL;
        self.next[v] = NIL;
        self.key[v] = NIL;
        self.len -= 1;
        Some(k)
    }

    /// Removes and returns the head of the highest nonempty bucket, or `None` if the queue is
    /// empty.
    pub fn pop_highest(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        while self.head[self.top] == NIL {
            // len > 0 guarantees a nonempty bucket at or below top
            self.top -= 1;
        }
        let v = self.head[self.top];
        self.remove(v);
        Some(v)
    }
}

fn nil_vec(len: usize) -> std::result::Result<Vec<usize>, TryReserveError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, NIL);
    Ok(v)
}
