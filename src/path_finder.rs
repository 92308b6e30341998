//! Incremental A* pathfinding over the visibility graph.
//!
//! Grounded on `Jig::PathFinder` (`original_source/Jig/PathFinder.cpp`):
//! rather than running to completion in the constructor, the search is
//! driven one `step()` at a time so a caller can budget per-frame work.
//! `start`/`end` don't need to be mesh verts -- their visible sets are
//! computed once up front and treated as virtual neighbours of every
//! vert they see.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use cgmath::MetricSpace;

use crate::geom::Pt2;
use crate::ids::VertId;
use crate::mesh::EdgeMesh;
use crate::visibility::{get_visible_points, is_visible};

#[derive(Clone, Copy, PartialEq)]
struct QueueEntry {
    priority: f64, // g + h
    vert: VertId,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: reverse the natural float order.
        other.priority.partial_cmp(&self.priority).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Done {
    g: f64,
    prev: Option<VertId>,
}

/// Step-driven A* search from `start` to `end` over `mesh`'s visibility
/// graph. Construct, then call `step()` until `is_finished()`, or `go()`
/// to run to completion in one call.
pub struct PathFinder<'a> {
    mesh: &'a EdgeMesh,
    start: Pt2,
    end: Pt2,
    end_visible: HashSet<VertId>,
    done: HashMap<VertId, Done>,
    queue: BinaryHeap<QueueEntry>,
    finished: bool,
    direct: bool,
    result: Vec<Pt2>,
    length: f64,
}

impl<'a> PathFinder<'a> {
    pub fn new(mesh: &'a EdgeMesh, start: Pt2, end: Pt2) -> Self {
        let mut finder = PathFinder { mesh, start, end, end_visible: HashSet::new(), done: HashMap::new(), queue: BinaryHeap::new(), finished: false, direct: false, result: Vec::new(), length: 0.0 };

        if is_visible(mesh, start, end) {
            finder.direct = true;
            finder.finished = true;
            finder.result = vec![start, end];
            finder.length = start.distance(end);
            return finder;
        }

        finder.end_visible = get_visible_points(mesh, end).into_iter().collect();
        let start_visible = get_visible_points(mesh, start);
        if start_visible.is_empty() {
            finder.finished = true;
            return finder;
        }
        for v in start_visible {
            finder.add_vert(v, None);
        }
        finder
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Straight-line length of `start`/`end` to the closest point along
    /// `mesh.vert(v).pos`, used to seed `g` for vert `v` reached directly
    /// from `start`, and the heuristic `h` toward `end`.
    fn g_for(&self, v: VertId, prev: Option<VertId>) -> f64 {
        let pos = self.mesh.vert(v).unwrap().pos;
        match prev {
            None => self.start.distance(pos),
            Some(p) => self.done[&p].g + self.mesh.vert(p).unwrap().pos.distance(pos),
        }
    }

    fn add_vert(&mut self, v: VertId, prev: Option<VertId>) {
        let g = self.g_for(v, prev);
        let improves = match self.done.get(&v) {
            Some(d) => g < d.g,
            None => true,
        };
        if !improves {
            return;
        }
        self.done.insert(v, Done { g, prev });
        let h = self.mesh.vert(v).unwrap().pos.distance(self.end);
        self.queue.push(QueueEntry { priority: g + h, vert: v });
    }

    /// Expands the lowest-priority open vert. Returns `true` once the
    /// search is finished (path found or queue exhausted).
    pub fn step(&mut self) -> bool {
        if self.finished {
            return true;
        }
        let entry = match self.queue.pop() {
            Some(e) => e,
            None => {
                self.finished = true;
                return true;
            }
        };

        self.set_current_best(entry.vert);

        if self.end_visible.contains(&entry.vert) {
            self.result.push(self.end);
            self.length += self.mesh.vert(entry.vert).unwrap().pos.distance(self.end);
            self.finished = true;
            return true;
        }

        let neighbours = crate::visibility::get_visible_points(self.mesh, self.mesh.vert(entry.vert).unwrap().pos);
        for n in neighbours {
            self.add_vert(n, Some(entry.vert));
        }
        false
    }

    /// Runs `step()` until the search finishes.
    pub fn go(&mut self) {
        while !self.step() {}
    }

    /// Rebuilds `result`/`length` as the chain from `start` to `last`
    /// along the `done` map's back-pointers. Called on every pop so that
    /// a caller reading `get_path()`/`get_length()` mid-search sees the
    /// best chain back to `start` from the most recently expanded vert,
    /// not a stale or empty path.
    fn set_current_best(&mut self, last: VertId) {
        let mut chain = Vec::new();
        let mut cur = Some(last);
        while let Some(v) = cur {
            chain.push(v);
            cur = self.done[&v].prev;
        }
        chain.reverse();

        let mut points = vec![self.start];
        points.extend(chain.iter().map(|&v| self.mesh.vert(v).unwrap().pos));

        let mut length = 0.0;
        for w in points.windows(2) {
            length += w[0].distance(w[1]);
        }

        self.result = points;
        self.length = length;
    }

    /// The path found so far, as a polyline from `start` toward `end`.
    /// While the search is still running this is the current best chain
    /// back to `start` from the most recently expanded vert, not the
    /// final path; once `is_finished()` it ends at `end` (or is empty if
    /// the search exhausted the queue without reaching it).
    pub fn get_path(&self) -> &[Pt2] {
        &self.result
    }

    pub fn get_length(&self) -> f64 {
        self.length
    }

    pub fn is_direct(&self) -> bool {
        self.direct
    }
}
