use super::SequenceError;

const INITIAL_CAPACITY: usize = 10;

/// Slots added each time the list runs out of room.
const GROWTH: usize = 12;

/// Insertion-ordered, duplicate-free growable list.
#[derive(Debug, Clone)]
pub struct UnorderedList<E> {
    items: Vec<E>,
}

impl<E> UnorderedList<E> {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn get(&self, index: usize) -> Result<&E, SequenceError> {
        self.items.get(index).ok_or(SequenceError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut E, SequenceError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(SequenceError::IndexOutOfRange { index, len })
    }

    /// Remove the element at `index`, shifting later elements left.
    pub fn remove(&mut self, index: usize) -> Result<E, SequenceError> {
        if index >= self.items.len() {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    fn grow_if_full(&mut self) {
        if self.items.len() == self.items.capacity() {
            self.items.reserve_exact(GROWTH);
        }
    }
}

impl<E: PartialEq> UnorderedList<E> {
    pub fn contains(&self, value: &E) -> bool {
        self.items.contains(value)
    }

    pub fn index_of(&self, value: &E) -> Option<usize> {
        self.items.iter().position(|e| e == value)
    }

    /// Append to the end.
    pub fn add(&mut self, value: E) -> Result<(), SequenceError> {
        if self.contains(&value) {
            return Err(SequenceError::DuplicateElement);
        }
        self.grow_if_full();
        self.items.push(value);
        Ok(())
    }

    /// Insert at `pos` (`0..=len`), shifting later elements right.
    pub fn insert(&mut self, pos: usize, value: E) -> Result<(), SequenceError> {
        if self.contains(&value) {
            return Err(SequenceError::DuplicateElement);
        }
        if pos > self.items.len() {
            return Err(SequenceError::IndexOutOfRange {
                index: pos,
                len: self.items.len(),
            });
        }
        self.grow_if_full();
        self.items.insert(pos, value);
        Ok(())
    }
}

impl<E> Default for UnorderedList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E> IntoIterator for &'a UnorderedList<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
