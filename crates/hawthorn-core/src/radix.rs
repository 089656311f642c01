//! Fixed-depth radix index
//!
//! A 16-way trie keyed by a fixed-width unsigned integer. A key's path is
//! its big-endian nibble decomposition, so every stored value sits exactly
//! `BITS / 4` levels below the root and a full walk yields keys in
//! ascending order.
//!
//! Removal clears the terminal slot only. Ancestors left empty by a removal
//! stay allocated until the index is dropped.

use std::fmt;
use std::marker::PhantomData;

const FANOUT: usize = 16;
const NIBBLE_MASK: u64 = 0x0F;

/// Fixed-width integer usable as a radix index key
pub trait RadixKey: Copy + Eq + fmt::Debug {
    /// Key width in bits, a multiple of 4
    const BITS: u32;

    /// Number of trie levels between the root and a stored value
    const DEPTH: usize = (Self::BITS / 4) as usize;

    fn to_bits(self) -> u64;

    fn from_bits(bits: u64) -> Self;
}

impl RadixKey for u64 {
    const BITS: u32 = 64;

    fn to_bits(self) -> u64 {
        self
    }

    fn from_bits(bits: u64) -> Self {
        bits
    }
}

impl RadixKey for u16 {
    const BITS: u32 = 16;

    fn to_bits(self) -> u64 {
        u64::from(self)
    }

    fn from_bits(bits: u64) -> Self {
        bits as u16
    }
}

/// Branching slot for `key` at `level`, most significant nibble first
fn nibble_at<K: RadixKey>(key: K, level: usize) -> usize {
    let shift = K::BITS - 4 * (level as u32 + 1);
    ((key.to_bits() >> shift) & NIBBLE_MASK) as usize
}

struct RadixNode<V> {
    nibble: u8,
    content: Option<V>,
    children: [Option<Box<RadixNode<V>>>; FANOUT],
}

impl<V> RadixNode<V> {
    fn new(nibble: u8) -> Self {
        Self {
            nibble,
            content: None,
            children: std::array::from_fn(|_| None),
        }
    }

    /// Depth-first walk of the subtree rooted at `self`, which sits at
    /// `level` with the key bits `key` accumulated so far.
    fn collect<'a, K: RadixKey>(
        &'a self,
        level: usize,
        key: u64,
        keep: &dyn Fn(u64) -> bool,
        out: &mut Vec<(K, &'a V)>,
    ) {
        if level == K::DEPTH {
            if let Some(value) = self.content.as_ref() {
                if keep(key) {
                    out.push((K::from_bits(key), value));
                }
            }
            return;
        }

        for child in self.children.iter().flatten() {
            let child_key = (key << 4) | u64::from(child.nibble);
            child.collect(level + 1, child_key, keep, out);
        }
    }
}

/// Radix index map: key to owned value
pub struct RadixMap<K, V> {
    root: RadixNode<V>,
    len: usize,
    _key: PhantomData<K>,
}

impl<K: RadixKey, V> RadixMap<K, V> {
    /// Create an empty map (a bare root with no children)
    pub fn new() -> Self {
        Self {
            root: RadixNode::new(0),
            len: 0,
            _key: PhantomData,
        }
    }

    /// Store `value` under `key`, creating any missing path nodes.
    ///
    /// Returns the value previously stored under `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut current = &mut self.root;
        for level in 0..K::DEPTH {
            let slot = nibble_at(key, level);
            current = &mut **current.children[slot]
                .get_or_insert_with(|| Box::new(RadixNode::new(slot as u8)));
        }

        let previous = current.content.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    fn terminal(&self, key: K) -> Option<&RadixNode<V>> {
        let mut current = &self.root;
        for level in 0..K::DEPTH {
            current = current.children[nibble_at(key, level)].as_deref()?;
        }
        Some(current)
    }

    fn terminal_mut(&mut self, key: K) -> Option<&mut RadixNode<V>> {
        let mut current = &mut self.root;
        for level in 0..K::DEPTH {
            current = current.children[nibble_at(key, level)].as_deref_mut()?;
        }
        Some(current)
    }

    pub fn fetch(&self, key: K) -> Option<&V> {
        self.terminal(key)?.content.as_ref()
    }

    pub fn fetch_mut(&mut self, key: K) -> Option<&mut V> {
        self.terminal_mut(key)?.content.as_mut()
    }

    pub fn contains(&self, key: K) -> bool {
        self.fetch(key).is_some()
    }

    /// Detach the terminal node for `key` and return its value.
    ///
    /// A key that was never inserted is a no-op.
    pub fn remove(&mut self, key: K) -> Option<V> {
        let last = K::DEPTH - 1;
        let mut current = &mut self.root;
        for level in 0..last {
            current = current.children[nibble_at(key, level)].as_deref_mut()?;
        }

        let leaf = current.children[nibble_at(key, last)].take()?;
        let RadixNode { content, .. } = *leaf;
        if content.is_some() {
            self.len -= 1;
        }
        content
    }

    /// Every entry whose key contains all bits of `mask`.
    ///
    /// This is a subset test, `(mask & key) == mask`, not an equality test
    /// on any key field. A zero mask returns the whole map.
    pub fn scan(&self, mask: K) -> Vec<(K, &V)> {
        let mask = mask.to_bits();
        let mut out = Vec::new();
        self.root.collect(0, 0, &|key| mask & key == mask, &mut out);
        out
    }

    /// Every entry whose top `bits` bits equal those of `prefix`.
    ///
    /// `bits` is rounded down to a nibble boundary and capped at the key
    /// width. Only the subtree under the prefix is walked.
    pub fn scan_prefix(&self, prefix: K, bits: u32) -> Vec<(K, &V)> {
        let levels = ((bits / 4) as usize).min(K::DEPTH);
        let mut out = Vec::new();

        let mut current = &self.root;
        let mut key = 0u64;
        for level in 0..levels {
            match current.children[nibble_at(prefix, level)].as_deref() {
                Some(child) => {
                    key = (key << 4) | u64::from(child.nibble);
                    current = child;
                }
                None => return out,
            }
        }

        current.collect(levels, key, &|_| true, &mut out);
        out
    }

    /// All entries in ascending key order
    pub fn entries(&self) -> Vec<(K, &V)> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect(0, 0, &|_| true, &mut out);
        out
    }

    pub fn keys(&self) -> Vec<K> {
        self.entries().into_iter().map(|(key, _)| key).collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<K: RadixKey, V> Default for RadixMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RadixKey, V: fmt::Debug> fmt::Debug for RadixMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

/// Radix index set: key presence only
pub struct RadixSet<K> {
    map: RadixMap<K, ()>,
}

impl<K: RadixKey> RadixSet<K> {
    pub fn new() -> Self {
        Self {
            map: RadixMap::new(),
        }
    }

    /// Add `key`; returns `true` if it was not already present
    pub fn insert(&mut self, key: K) -> bool {
        self.map.insert(key, ()).is_none()
    }

    pub fn contains(&self, key: K) -> bool {
        self.map.contains(key)
    }

    /// Returns `true` if `key` was present
    pub fn remove(&mut self, key: K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Keys containing all bits of `mask`, see [`RadixMap::scan`]
    pub fn scan(&self, mask: K) -> Vec<K> {
        self.map.scan(mask).into_iter().map(|(key, _)| key).collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: RadixKey> Default for RadixSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RadixKey> fmt::Debug for RadixSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.scan(K::from_bits(0))).finish()
    }
}
