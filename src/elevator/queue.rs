use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::request::Request;

/// Heap entry. Ordered by destination floor, then by arrival.
#[derive(Debug)]
struct Entry {
    floor: i32,
    seq: u64,
    request: Request,
}

impl Entry {
    fn key(&self) -> (i32, u64) {
        (self.floor, self.seq)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/**
 * Pending requests for one travel direction.
 *
 * Pops the request with the lowest destination floor first; requests for the same floor
 * come out in the order they were pushed.
 */
#[derive(Debug, Default)]
pub struct DirectionQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl DirectionQueue {
    pub fn new() -> DirectionQueue {
        DirectionQueue::default()
    }

    pub fn push(&mut self, request: Request) {
        let entry = Entry {
            floor: request.destination(),
            seq: self.next_seq,
            request,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(entry));
    }

    pub fn pop(&mut self) -> Option<Request> {
        self.heap.pop().map(|Reverse(entry)| entry.request)
    }

    pub fn peek(&self) -> Option<&Request> {
        self.heap.peek().map(|Reverse(entry)| &entry.request)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every pending request and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.heap.len();
        self.heap.clear();
        dropped
    }
}
