use std::cmp::Ordering;

/// Ordering used by a [PriorityQueue]. The item comparing [Ordering::Less] comes out first.
pub trait Comparator<T> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}

/// Orders items by their [Ord] implementation, smallest first.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self(lhs, rhs)
    }
}

/// Binary min-heap over a growable array with a pluggable [Comparator].
#[derive(Clone, Debug)]
pub struct PriorityQueue<T, C = NaturalOrder> {
    cmp: C,
    heap: Vec<T>,
}

impl<T: Ord> PriorityQueue<T, NaturalOrder> {
    pub fn new() -> Self {
        PriorityQueue::with_comparator(NaturalOrder)
    }
}

impl<T: Ord> Default for PriorityQueue<T, NaturalOrder> {
    fn default() -> Self {
        PriorityQueue::new()
    }
}

impl<T, C: Comparator<T>> PriorityQueue<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        PriorityQueue::with_capacity(0, cmp)
    }

    pub fn with_capacity(capacity: usize, cmp: C) -> Self {
        PriorityQueue {
            cmp,
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Backing storage grows by doubling once full.
    pub fn push(&mut self, item: T) {
        if self.heap.len() == self.heap.capacity() {
            self.heap.reserve(self.heap.len().max(1));
        }
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes the smallest item.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Drops every item but keeps the allocation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.heap.iter()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.cmp.compare(&self.heap[index], &self.heap[parent]) != Ordering::Less {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = index * 2 + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len
                && self.cmp.compare(&self.heap[right], &self.heap[left]) == Ordering::Less
            {
                right
            } else {
                left
            };
            if self.cmp.compare(&self.heap[child], &self.heap[index]) != Ordering::Less {
                break;
            }
            self.heap.swap(index, child);
            index = child;
        }
    }
}
