use crate::Id;
use alloc::vec::Vec;
use core::{
    fmt,
    iter::Enumerate,
    marker::PhantomData,
    ops::{Index, IndexMut},
    slice,
};

/// An index-based arena.
///
/// [`Arena`] stores values in insertion order and hands out strongly-typed
/// keys. Values are never removed, so a key stays valid for the lifetime of
/// the arena.
pub struct Arena<K: Id, V> {
    data: Vec<V>,
    phantom: PhantomData<K>,
}

impl<K: Id, V> Arena<K, V> {
    /// Creates a new empty arena.
    ///
    /// # Examples
    ///
    /// ```
    /// # use arena::Arena;
    /// let arena: Arena<u32, i32> = Arena::new();
    /// assert!(arena.is_empty());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            phantom: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocates a value and returns its key.
    ///
    /// # Examples
    ///
    /// ```
    /// # use arena::Arena;
    /// let mut arena = Arena::<u32, _>::new();
    /// let foo = arena.alloc("foo");
    /// let bar = arena.alloc("bar");
    /// assert_eq!((foo, bar), (0, 1));
    /// assert_eq!(arena[bar], "bar");
    /// ```
    #[inline]
    pub fn alloc(&mut self, value: V) -> K {
        let key = self.next_key();
        self.data.push(value);
        key
    }

    /// The key the next call to [`Arena::alloc`] will return.
    #[inline]
    pub fn next_key(&self) -> K {
        K::from_usize(self.data.len())
    }

    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        self.data.get(key.into_usize())
    }

    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.data.get_mut(key.into_usize())
    }

    #[inline]
    pub fn contains_key(&self, key: K) -> bool {
        key.into_usize() < self.data.len()
    }

    /// Iterates over key/value pairs in allocation order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use arena::Arena;
    /// let mut arena = Arena::<u8, _>::new();
    /// arena.alloc('a');
    /// arena.alloc('b');
    /// let pairs: Vec<_> = arena.iter().collect();
    /// assert_eq!(pairs, vec![(0, &'a'), (1, &'b')]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.data.iter().enumerate(),
            phantom: PhantomData,
        }
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = K> + use<K, V> {
        (0..self.data.len()).map(K::from_usize)
    }

    /// Converts every value, stopping at the first failure.
    pub fn try_map<U, E>(self, mut f: impl FnMut(K, V) -> Result<U, E>) -> Result<Arena<K, U>, E> {
        let mut data = Vec::with_capacity(self.data.len());

        for (i, value) in self.data.into_iter().enumerate() {
            data.push(f(K::from_usize(i), value)?);
        }

        Ok(Arena {
            data,
            phantom: PhantomData,
        })
    }
}

impl<K: Id, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Id, V> Index<K> for Arena<K, V> {
    type Output = V;

    #[inline]
    fn index(&self, key: K) -> &Self::Output {
        &self.data[key.into_usize()]
    }
}

impl<K: Id, V> IndexMut<K> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        &mut self.data[key.into_usize()]
    }
}

impl<K: Id, V: Clone> Clone for Arena<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            phantom: PhantomData,
        }
    }
}

impl<K: Id, V: fmt::Debug> fmt::Debug for Arena<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K: Id, V> IntoIterator for &'a Arena<K, V> {
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, K: Id, V> {
    inner: Enumerate<slice::Iter<'a, V>>,
    phantom: PhantomData<K>,
}

impl<'a, K: Id, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(i, value)| (K::from_usize(i), value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
