//! Augmented interval tree for conflict detection.
//!
//! A binary search tree keyed on interval start (ties go right). Every node
//! also records the greatest `end` in its subtree, which lets overlap queries
//! skip left subtrees that finish before the query starts. The tree is never
//! rebalanced, so its shape follows insertion order; one scheduling run only
//! holds a few dozen intervals.

/// Half-open interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// `[a1, a2)` and `[b1, b2)` overlap iff `a1 < b2 && b1 < a2`.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start < end && start < self.end
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

#[derive(Debug)]
struct Node<P> {
    interval: Interval,
    payload: P,
    max_end: u32,
    left: Option<Box<Node<P>>>,
    right: Option<Box<Node<P>>>,
}

impl<P> Node<P> {
    fn leaf(interval: Interval, payload: P) -> Box<Self> {
        Box::new(Self {
            interval,
            payload,
            max_end: interval.end,
            left: None,
            right: None,
        })
    }

    fn refresh_max(&mut self) {
        let left = self.left.as_ref().map_or(0, |n| n.max_end);
        let right = self.right.as_ref().map_or(0, |n| n.max_end);
        self.max_end = self.interval.end.max(left).max(right);
    }
}

/// Interval index answering "does `[start, end)` overlap anything indexed?".
#[derive(Debug)]
pub struct ConflictIndex<P> {
    root: Option<Box<Node<P>>>,
    len: usize,
}

impl<P> ConflictIndex<P> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Insert an interval. Overlap with existing entries is not checked.
    pub fn insert(&mut self, start: u32, end: u32, payload: P) {
        let interval = Interval::new(start, end);
        Self::insert_at(&mut self.root, interval, payload);
        self.len += 1;
    }

    fn insert_at(slot: &mut Option<Box<Node<P>>>, interval: Interval, payload: P) {
        match slot {
            None => *slot = Some(Node::leaf(interval, payload)),
            Some(node) => {
                if interval.start < node.interval.start {
                    Self::insert_at(&mut node.left, interval, payload);
                } else {
                    Self::insert_at(&mut node.right, interval, payload);
                }
                node.refresh_max();
            }
        }
    }

    /// All indexed intervals overlapping `[start, end)`, as `(start, end)` pairs.
    pub fn query_overlaps(&self, start: u32, end: u32) -> Vec<(u32, u32)> {
        let mut overlaps = Vec::new();
        Self::query_at(self.root.as_deref(), start, end, &mut |node| {
            overlaps.push((node.interval.start, node.interval.end));
        });
        overlaps
    }

    /// Overlapping intervals together with their payloads.
    pub fn query_entries(&self, start: u32, end: u32) -> Vec<(Interval, &P)> {
        let mut entries = Vec::new();
        Self::query_at(self.root.as_deref(), start, end, &mut |node| {
            entries.push((node.interval, &node.payload));
        });
        entries
    }

    // The right subtree is always visited: its starts are >= this node's start
    // but nothing bounds them from above.
    fn query_at<'a>(
        node: Option<&'a Node<P>>,
        start: u32,
        end: u32,
        visit: &mut dyn FnMut(&'a Node<P>),
    ) {
        let Some(node) = node else {
            return;
        };

        if node.interval.overlaps(start, end) {
            visit(node);
        }

        if let Some(left) = node.left.as_deref() {
            if left.max_end > start {
                Self::query_at(Some(left), start, end, visit);
            }
        }

        Self::query_at(node.right.as_deref(), start, end, visit);
    }

    /// Whether anything overlaps `[start, end)`.
    pub fn has_overlap(&self, start: u32, end: u32) -> bool {
        !self.query_overlaps(start, end).is_empty()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl<P> Default for ConflictIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}
