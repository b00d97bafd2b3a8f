use std::fmt;
use std::mem;

use super::SequenceError;

/// A slot in the chain. `Vacant` marks the end of the chain, so an empty
/// sequence is simply a vacant head.
enum Link<T> {
    Vacant,
    Occupied(Box<Node<T>>),
}

struct Node<T> {
    value: T,
    next: Link<T>,
}

/// Sorted, duplicate-free, singly linked sequence.
///
/// Elements are kept in ascending `Ord` order. An element that compares equal
/// to one already present is rejected, so `Ord` and `Eq` must agree.
///
/// `len` walks the chain and is O(n); indexed access is a forward walk.
pub struct OrderedSequence<T> {
    head: Link<T>,
}

impl<T> OrderedSequence<T> {
    pub const fn new() -> Self {
        Self { head: Link::Vacant }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.head, Link::Vacant)
    }

    /// Fresh read-only cursor positioned before the first element.
    pub fn iter(&self) -> Cursor<'_, T> {
        Cursor { link: &self.head }
    }

    pub fn get(&self, index: usize) -> Result<&T, SequenceError> {
        self.iter()
            .nth(index)
            .ok_or_else(|| SequenceError::IndexOutOfRange { index, len: self.len() })
    }

    /// Mutable access to the element at `index`.
    ///
    /// Callers must not change the fields the element is ordered by.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, SequenceError> {
        let len = self.len();
        CursorMut::new(&mut self.head)
            .seek(index)
            .and_then(CursorMut::into_current)
            .ok_or(SequenceError::IndexOutOfRange { index, len })
    }

    /// Unlink the element at `index`; later elements shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<T, SequenceError> {
        let len = self.len();
        if index >= len {
            return Err(SequenceError::IndexOutOfRange { index, len });
        }
        CursorMut::new(&mut self.head)
            .seek(index)
            .and_then(|mut cursor| cursor.unlink())
            .ok_or(SequenceError::IndexOutOfRange { index, len })
    }

    /// Split at `start`: elements `[start, len)` move, nodes and all, into the
    /// returned sequence and the receiver keeps `[0, start)`.
    ///
    /// `start == len` is a valid split point and yields an empty tail.
    pub fn truncate(&mut self, start: usize) -> Result<OrderedSequence<T>, SequenceError> {
        let len = self.len();
        if start > len {
            return Err(SequenceError::IndexOutOfRange { index: start, len });
        }
        let mut cursor = CursorMut::new(&mut self.head)
            .seek(start)
            .ok_or(SequenceError::IndexOutOfRange { index: start, len })?;
        Ok(OrderedSequence { head: cursor.split_off() })
    }

    pub fn clear(&mut self) {
        // Unlink node by node; dropping a long chain recursively would
        // overflow the stack.
        let mut link = mem::replace(&mut self.head, Link::Vacant);
        while let Link::Occupied(mut node) = link {
            link = mem::replace(&mut node.next, Link::Vacant);
        }
    }
}

impl<T: PartialEq> OrderedSequence<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|existing| existing == value)
    }

    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.iter().position(|existing| existing == value)
    }
}

impl<T: Ord> OrderedSequence<T> {
    /// Insert `value` after every element that is not greater than it.
    pub fn add(&mut self, value: T) -> Result<(), SequenceError> {
        if self.contains(&value) {
            return Err(SequenceError::DuplicateElement);
        }
        let position = self.iter().take_while(|existing| **existing <= value).count();
        let len = self.len();
        let mut cursor = CursorMut::new(&mut self.head)
            .seek(position)
            .ok_or(SequenceError::IndexOutOfRange { index: position, len })?;
        cursor.insert(value);
        Ok(())
    }
}

impl<T> Default for OrderedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OrderedSequence<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSequence<T> {
    type Item = &'a T;
    type IntoIter = Cursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Cursors ──────────────────────────────────────────────────────

/// Read-only walker over an [`OrderedSequence`]. Consumed as it advances.
pub struct Cursor<'a, T> {
    link: &'a Link<T>,
}

impl<T> Cursor<'_, T> {
    pub fn has_next(&self) -> bool {
        matches!(self.link, Link::Occupied(_))
    }
}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        match self.link {
            Link::Occupied(node) => {
                self.link = &node.next;
                Some(&node.value)
            }
            Link::Vacant => None,
        }
    }
}

/// Privileged walker that owns a mutable borrow of one link in the chain.
/// Position `len` is the trailing vacant link.
struct CursorMut<'a, T> {
    link: &'a mut Link<T>,
    index: usize,
}

impl<'a, T> CursorMut<'a, T> {
    fn new(head: &'a mut Link<T>) -> Self {
        Self { link: head, index: 0 }
    }

    fn advance(self) -> Option<Self> {
        match self.link {
            Link::Occupied(node) => Some(Self {
                link: &mut node.next,
                index: self.index + 1,
            }),
            Link::Vacant => None,
        }
    }

    fn seek(mut self, index: usize) -> Option<Self> {
        while self.index < index {
            self = self.advance()?;
        }
        Some(self)
    }

    fn into_current(self) -> Option<&'a mut T> {
        match self.link {
            Link::Occupied(node) => Some(&mut node.value),
            Link::Vacant => None,
        }
    }

    /// Link a new node in front of the current position.
    fn insert(&mut self, value: T) {
        let rest = mem::replace(self.link, Link::Vacant);
        *self.link = Link::Occupied(Box::new(Node { value, next: rest }));
    }

    fn unlink(&mut self) -> Option<T> {
        match mem::replace(self.link, Link::Vacant) {
            Link::Occupied(node) => {
                let Node { value, next } = *node;
                *self.link = next;
                Some(value)
            }
            Link::Vacant => None,
        }
    }

    /// Detach everything from the current position onward.
    fn split_off(&mut self) -> Link<T> {
        mem::replace(self.link, Link::Vacant)
    }
}
