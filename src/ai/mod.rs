use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use smallvec::SmallVec;

use crate::map::CaveMap;

const CARDINALS: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

struct FrontierNode {
    point: Point,
    f_score: f64,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    // Reversed so the BinaryHeap pops the lowest f-score first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
    }
}

/// Grid A* with one deliberate quirk: nodes are marked visited when pushed
/// onto the frontier, not when popped, and visited nodes are skipped
/// outright. A cheaper route to a node already on the frontier is ignored
/// entirely. Enemy pathing depends on this behavior, so it stays.
pub struct AStar {
    width: i32,
    height: i32,
    visited: Vec<bool>,
    came_from: Vec<Point>,
    g_score: Vec<f64>,
    f_score: Vec<f64>,
}

impl AStar {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            visited: vec![false; size],
            came_from: vec![Point::zero(); size],
            g_score: vec![f64::INFINITY; size],
            f_score: vec![f64::INFINITY; size],
        }
    }

    fn reset(&mut self) {
        self.visited.fill(false);
        self.came_from.fill(Point::zero());
        self.g_score.fill(f64::INFINITY);
        self.f_score.fill(f64::INFINITY);
    }

    fn idx(&self, point: Point) -> usize {
        (point.y * self.width + point.x) as usize
    }

    fn heuristic(a: Point, b: Point) -> f64 {
        DistanceAlg::Pythagoras.distance2d(a, b) as f64
    }

    fn open_exits(&self, map: &CaveMap, point: Point) -> SmallVec<[Point; 4]> {
        let mut exits = SmallVec::new();
        for (dx, dy) in CARDINALS {
            let next = Point::new(point.x + dx, point.y + dy);
            if next.x < 0 || next.x >= self.width || next.y < 0 || next.y >= self.height {
                continue;
            }
            if let Some(cell) = map.cell_at(next) {
                if !cell.blocking {
                    exits.push(next);
                }
            }
        }
        exits
    }

    /// Searches from scratch every call. Returns the step sequence from
    /// just after `start` through `goal` inclusive; empty when the goal is
    /// unreachable or equals the start.
    pub fn find_path(&mut self, map: &CaveMap, start: Point, goal: Point) -> Vec<Point> {
        self.reset();

        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierNode {
            point: start,
            f_score: 0.0,
        });
        let start_idx = self.idx(start);
        self.visited[start_idx] = true;
        self.g_score[start_idx] = 0.0;
        self.f_score[start_idx] = Self::heuristic(start, goal);

        while let Some(node) = frontier.pop() {
            let current = node.point;
            if current == goal {
                return self.reconstruct(start, goal);
            }

            for next in self.open_exits(map, current) {
                let next_idx = self.idx(next);
                if self.visited[next_idx] {
                    continue;
                }
                let tentative = self.g_score[self.idx(current)] + 1.0;
                if tentative < self.g_score[next_idx] {
                    self.came_from[next_idx] = current;
                    self.g_score[next_idx] = tentative;
                    self.f_score[next_idx] = tentative + Self::heuristic(next, goal);
                    if !self.visited[next_idx] {
                        frontier.push(FrontierNode {
                            point: next,
                            f_score: self.f_score[next_idx],
                        });
                        self.visited[next_idx] = true;
                    }
                }
            }
        }

        Vec::new()
    }

    fn reconstruct(&self, start: Point, goal: Point) -> Vec<Point> {
        let mut path = Vec::new();
        let mut cursor = goal;
        while cursor != start {
            path.push(cursor);
            cursor = self.came_from[self.idx(cursor)];
        }
        path.reverse();
        path
    }
}
