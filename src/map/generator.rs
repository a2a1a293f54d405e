use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use bracket_geometry::prelude::{Point, Rect};
use bracket_pathfinding::prelude::DistanceAlg;
use bracket_random::prelude::RandomNumberGenerator;
use thiserror::Error;

use super::{CaveMap, Terrain};

const ROOM_MIN: i32 = 6;
const ROOM_MAX: i32 = 12;
const ROOM_BUFFER: i32 = 2;
const PLACEMENT_ATTEMPTS: usize = 1024;
const EXTRA_EDGE_ATTEMPTS: usize = 64;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("map {width}x{height} cannot host rooms up to {ROOM_MAX} wide")]
    MapTooSmall { width: i32, height: i32 },
    #[error("placed {placed} of {requested} rooms before exhausting attempts")]
    RoomPlacement { requested: usize, placed: usize },
}

/// Carves a connected cave into a fresh map: square rooms, an MST tunnel
/// backbone over room centroids, then a handful of extra loop tunnels.
pub fn generate(
    width: i32,
    height: i32,
    room_count: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<CaveMap, GenerationError> {
    let mut map = CaveMap::solid_rock(width, height);
    let rooms = place_rooms(&mut map, room_count, rng)?;
    connect_rooms(&mut map, &rooms, rng);
    Ok(map)
}

fn place_rooms(
    map: &mut CaveMap,
    room_count: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<Rect>, GenerationError> {
    let anchor_max_x = map.width - ROOM_MAX - 2;
    let anchor_max_y = map.height - ROOM_MAX - 2;
    if anchor_max_x <= 3 || anchor_max_y <= 3 {
        return Err(GenerationError::MapTooSmall {
            width: map.width,
            height: map.height,
        });
    }

    let mut rooms: Vec<Rect> = Vec::with_capacity(room_count);
    let mut attempts = 0;
    while rooms.len() < room_count {
        if attempts >= PLACEMENT_ATTEMPTS {
            return Err(GenerationError::RoomPlacement {
                requested: room_count,
                placed: rooms.len(),
            });
        }
        attempts += 1;

        let side = rng.range(ROOM_MIN, ROOM_MAX + 1);
        let left = rng.range(3, anchor_max_x);
        let top = rng.range(3, anchor_max_y);
        let candidate = Rect::with_exact(left, top, left + side, top + side);

        if rooms.iter().any(|room| overlaps(room, &candidate)) {
            continue;
        }

        map.dig(candidate, Terrain::Cave);
        rooms.push(candidate);
    }
    Ok(rooms)
}

/// Buffered overlap test: rooms closer than `ROOM_BUFFER` cells on either
/// axis count as overlapping.
fn overlaps(a: &Rect, b: &Rect) -> bool {
    if a.x1 > b.x2 + ROOM_BUFFER || b.x1 > a.x2 + ROOM_BUFFER {
        return false;
    }
    if a.y1 > b.y2 + ROOM_BUFFER || b.y1 > a.y2 + ROOM_BUFFER {
        return false;
    }
    true
}

struct FrontierEdge {
    from: Option<usize>,
    to: usize,
    weight: f32,
}

impl PartialEq for FrontierEdge {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

impl Eq for FrontierEdge {}

impl PartialOrd for FrontierEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEdge {
    // Reversed so the BinaryHeap pops the lowest-weight edge first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .partial_cmp(&self.weight)
            .unwrap_or(Ordering::Equal)
    }
}

fn connect_rooms(map: &mut CaveMap, rooms: &[Rect], rng: &mut RandomNumberGenerator) {
    let n = rooms.len();
    if n < 2 {
        return;
    }

    // Prim's MST over room centroids, Euclidean edge weights.
    let mut carved_graph: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut connected = vec![false; n];
    let mut frontier = BinaryHeap::new();
    frontier.push(FrontierEdge {
        from: None,
        to: 0,
        weight: 0.0,
    });

    while let Some(edge) = frontier.pop() {
        let u = edge.to;
        if connected[u] {
            continue;
        }
        connected[u] = true;

        if let Some(from) = edge.from {
            carve_tunnel(map, rooms[from].center(), rooms[u].center());
            carved_graph[from].push(u);
            carved_graph[u].push(from);
        }

        for v in 0..n {
            if !connected[v] {
                frontier.push(FrontierEdge {
                    from: Some(u),
                    to: v,
                    weight: DistanceAlg::Pythagoras
                        .distance2d(rooms[u].center(), rooms[v].center()),
                });
            }
        }
    }

    // Extra loop tunnels between rooms that are far apart in the carved
    // graph. Pairs closer than three hops are resampled; an edge whose
    // attempt budget runs out is skipped.
    let extra_edges = n * 3 / 4;
    for _ in 0..extra_edges {
        for _ in 0..EXTRA_EDGE_ATTEMPTS {
            let u = rng.range(0, n as i32) as usize;
            let v = rng.range(0, n as i32) as usize;
            if u == v {
                continue;
            }
            if hop_distance(&carved_graph, u, v) > 2 {
                carve_tunnel(map, rooms[u].center(), rooms[v].center());
                carved_graph[u].push(v);
                carved_graph[v].push(u);
                break;
            }
        }
    }
}

/// BFS edge count between two rooms over the tunnels carved so far.
fn hop_distance(graph: &[Vec<usize>], start: usize, goal: usize) -> usize {
    let mut distance = vec![usize::MAX; graph.len()];
    let mut queue = VecDeque::new();
    distance[start] = 0;
    queue.push_back(start);
    while let Some(current) = queue.pop_front() {
        if current == goal {
            return distance[current];
        }
        for &next in &graph[current] {
            if distance[next] == usize::MAX {
                distance[next] = distance[current] + 1;
                queue.push_back(next);
            }
        }
    }
    usize::MAX
}

/// L-shaped tunnel: horizontal leg first, then vertical.
fn carve_tunnel(map: &mut CaveMap, start: Point, end: Point) {
    let mut cursor = start;
    map.carve_point(cursor, Terrain::Tunnel);
    while cursor.x != end.x {
        cursor.x += if end.x > cursor.x { 1 } else { -1 };
        map.carve_point(cursor, Terrain::Tunnel);
    }
    while cursor.y != end.y {
        cursor.y += if end.y > cursor.y { 1 } else { -1 };
        map.carve_point(cursor, Terrain::Tunnel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> RandomNumberGenerator {
        RandomNumberGenerator::seeded(seed)
    }

    #[test]
    fn rooms_respect_the_buffer() {
        let mut map = CaveMap::solid_rock(100, 50);
        let rooms = place_rooms(&mut map, 12, &mut seeded(42)).unwrap();
        assert_eq!(rooms.len(), 12);
        for (i, a) in rooms.iter().enumerate() {
            for b in rooms.iter().skip(i + 1) {
                assert!(!overlaps(a, b));
            }
        }
    }

    #[test]
    fn all_room_centroids_are_mutually_reachable() {
        let mut rng = seeded(99);
        let mut map = CaveMap::solid_rock(100, 50);
        let rooms = place_rooms(&mut map, 12, &mut rng).unwrap();
        connect_rooms(&mut map, &rooms, &mut rng);

        // Flood fill over walkable cells from the first centroid.
        let start = rooms[0].center();
        let mut seen = vec![false; (map.width * map.height) as usize];
        let mut queue = VecDeque::new();
        seen[(start.y * map.width + start.x) as usize] = true;
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let next = Point::new(current.x + dx, current.y + dy);
                if !map.is_walkable(next) {
                    continue;
                }
                let idx = (next.y * map.width + next.x) as usize;
                if !seen[idx] {
                    seen[idx] = true;
                    queue.push_back(next);
                }
            }
        }

        for room in &rooms {
            let center = room.center();
            assert!(seen[(center.y * map.width + center.x) as usize]);
        }
    }

    #[test]
    fn too_small_map_fails_fast() {
        let result = generate(16, 16, 4, &mut seeded(1));
        assert!(matches!(result, Err(GenerationError::MapTooSmall { .. })));
    }

    #[test]
    fn impossible_room_count_reports_placement_failure() {
        let result = generate(24, 24, 50, &mut seeded(3));
        assert!(matches!(
            result,
            Err(GenerationError::RoomPlacement { .. })
        ));
    }

    #[test]
    fn generated_map_keeps_its_border() {
        let map = generate(100, 50, 15, &mut seeded(7)).unwrap();
        for x in 0..map.width {
            assert!(map.is_blocking(Point::new(x, 0)));
        }
        for y in 0..map.height {
            assert!(map.is_blocking(Point::new(0, y)));
        }
    }

    #[test]
    fn hop_distance_counts_edges() {
        let graph = vec![vec![1], vec![0, 2], vec![1, 3], vec![2]];
        assert_eq!(hop_distance(&graph, 0, 3), 3);
        assert_eq!(hop_distance(&graph, 0, 1), 1);
        assert_eq!(hop_distance(&graph, 2, 2), 0);
    }
}
