//! Recycled storage for search nodes.
//!
//! Nodes live in one arena and refer to their predecessor by [NodeId]. Releasing the pool
//! bumps a generation counter instead of touching the slots, which invalidates every id handed
//! out during the previous search.
use grid_util::point::Point;
use log::trace;
use std::ops::{Index, IndexMut};

use crate::SearchError;

/// Handle to a node, valid only for the generation it was acquired in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// One cell's search record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    pub cell: Point,
    /// Cost of the best known route from the start.
    pub g: i32,
    /// Estimated remaining cost to the goal.
    pub h: i32,
    /// `g + h`.
    pub f: i32,
    pub parent: Option<NodeId>,
    pub closed: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        SearchNode {
            cell: Point::new(0, 0),
            g: 0,
            h: 0,
            f: 0,
            parent: None,
            closed: false,
        }
    }
}

impl SearchNode {
    fn reset(&mut self, cell: Point) {
        *self = SearchNode {
            cell,
            ..Default::default()
        };
    }
}

#[derive(Clone, Debug)]
pub struct NodePool {
    slots: Vec<SearchNode>,
    in_use: usize,
    max_size: usize,
    generation: u32,
}

impl NodePool {
    pub fn new(initial_size: usize, max_size: usize) -> NodePool {
        let initial_size = initial_size.min(max_size);
        NodePool {
            slots: vec![SearchNode::default(); initial_size],
            in_use: 0,
            max_size,
            generation: 0,
        }
    }

    /// Hands out a zeroed node for `cell`. Slots released by [release_all](Self::release_all)
    /// are reused before the arena grows.
    pub fn acquire(&mut self, cell: Point) -> Result<NodeId, SearchError> {
        if self.in_use >= self.max_size {
            return Err(SearchError::PoolExhausted {
                capacity: self.max_size,
            });
        }
        let index = self.in_use;
        if index < self.slots.len() {
            self.slots[index].reset(cell);
        } else {
            self.slots.push(SearchNode {
                cell,
                ..Default::default()
            });
        }
        self.in_use += 1;
        Ok(NodeId {
            index: index as u32,
            generation: self.generation,
        })
    }

    /// Returns every node acquired since the last release. Outstanding ids become stale.
    pub fn release_all(&mut self) {
        trace!(
            "Releasing {} nodes (generation {})",
            self.in_use,
            self.generation
        );
        self.in_use = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        self.is_live(id).then(|| &self.slots[id.index()])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SearchNode> {
        if self.is_live(id) {
            Some(&mut self.slots[id.index()])
        } else {
            None
        }
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        id.generation == self.generation && id.index() < self.in_use
    }

    /// Nodes acquired in the current generation.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Slots allocated so far, live or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Index<NodeId> for NodePool {
    type Output = SearchNode;

    /// Panics on a stale id.
    fn index(&self, id: NodeId) -> &SearchNode {
        assert!(self.is_live(id), "stale node id {:?}", id);
        &self.slots[id.index()]
    }
}

impl IndexMut<NodeId> for NodePool {
    fn index_mut(&mut self, id: NodeId) -> &mut SearchNode {
        assert!(self.is_live(id), "stale node id {:?}", id);
        &mut self.slots[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquired_nodes_are_zeroed() {
        let mut pool = NodePool::new(2, usize::MAX);
        let a = pool.acquire(Point::new(3, 4)).unwrap();
        pool[a].g = 7;
        pool[a].h = 3;
        pool[a].f = 10;
        pool[a].parent = Some(a);
        pool[a].closed = true;
        pool.release_all();
        let b = pool.acquire(Point::new(1, 1)).unwrap();
        assert_eq!(a.index(), b.index());
        let node = &pool[b];
        assert_eq!(node.cell, Point::new(1, 1));
        assert_eq!((node.g, node.h, node.f), (0, 0, 0));
        assert!(node.parent.is_none());
        assert!(!node.closed);
    }

    #[test]
    fn release_invalidates_ids() {
        let mut pool = NodePool::new(0, usize::MAX);
        let a = pool.acquire(Point::new(0, 0)).unwrap();
        assert!(pool.get(a).is_some());
        pool.release_all();
        assert!(pool.get(a).is_none());
        assert!(pool.get_mut(a).is_none());
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.generation(), 1);
    }

    #[test]
    #[should_panic]
    fn indexing_with_stale_id_panics() {
        let mut pool = NodePool::new(0, usize::MAX);
        let a = pool.acquire(Point::new(0, 0)).unwrap();
        pool.release_all();
        let _ = &pool[a];
    }

    #[test]
    fn warm_pool_does_not_grow() {
        let mut pool = NodePool::new(4, usize::MAX);
        for round in 0..3 {
            for i in 0..4 {
                pool.acquire(Point::new(i, round)).unwrap();
            }
            pool.release_all();
        }
        assert_eq!(pool.capacity(), 4);
        pool.acquire(Point::new(0, 0)).unwrap();
        assert_eq!(pool.capacity(), 4);
    }

    #[test]
    fn grows_past_initial_size() {
        let mut pool = NodePool::new(1, usize::MAX);
        for i in 0..10 {
            pool.acquire(Point::new(i, 0)).unwrap();
        }
        assert_eq!(pool.in_use(), 10);
        assert_eq!(pool.capacity(), 10);
    }

    #[test]
    fn cap_is_enforced() {
        let mut pool = NodePool::new(1, 3);
        for i in 0..3 {
            pool.acquire(Point::new(i, 0)).unwrap();
        }
        assert_eq!(
            pool.acquire(Point::new(9, 9)),
            Err(SearchError::PoolExhausted { capacity: 3 })
        );
        pool.release_all();
        assert!(pool.acquire(Point::new(9, 9)).is_ok());
    }
}
