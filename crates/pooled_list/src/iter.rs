use std::iter::FusedIterator;

use crate::{NodeHandle, PooledList};

/// Live nodes in sequence order, paired with their handles.
///
/// Created by [`PooledList::entries`]. Walks from both ends so `.rev()`
/// yields tail to head.
pub struct Entries<'a, T> {
    list: &'a PooledList<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Entries<'a, T> {
    pub(crate) fn new(list: &'a PooledList<T>) -> Self {
        Self {
            list,
            front: list.head,
            back: list.tail,
            remaining: list.len,
        }
    }
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (NodeHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let slot = self.front?;
        let node = list.node(slot);
        self.front = node.next;
        self.remaining -= 1;
        Some((list.handle(slot), &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Entries<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let slot = self.back?;
        let node = list.node(slot);
        self.back = node.prev;
        self.remaining -= 1;
        Some((list.handle(slot), &node.value))
    }
}

impl<T> ExactSizeIterator for Entries<'_, T> {}
impl<T> FusedIterator for Entries<'_, T> {}

impl<T> Clone for Entries<'_, T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// Live values in sequence order. Created by [`PooledList::iter`].
pub struct Iter<'a, T> {
    entries: Entries<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(list: &'a PooledList<T>) -> Self {
        Self {
            entries: Entries::new(list),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back().map(|(_, value)| value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PooledList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
