use crate::collections::FxIndexSet;
use super::path::backtrack;
use super::SearchRecords;

use std::{collections::BinaryHeap, hash::Hash, cmp::Ordering};
use num_traits::Zero;
use indexmap::map::Entry::{Occupied, Vacant};




/// Find the cheapest path from the start to any node accepted by `is_target`
/// using uniform-cost search (Dijkstra's algorithm)
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
///
/// `successors` enumerates the (neighbor, edge cost) pairs reachable from a
/// node in one step; edge costs must be non-negative. The search sweeps the
/// whole component reachable from the start and only then picks the accepted
/// node with the lowest recorded cost, so a predicate matching several nodes
/// selects the cheapest match rather than the first one discovered. Equally
/// cheap targets resolve to the one discovered first.
///
/// Returns the path and its total cost, or None when no reachable node is
/// accepted. The path excludes the start node: it begins with the first step
/// taken and ends at the chosen target. A start that is itself accepted
/// yields an empty path with zero cost.
pub fn shortest_path<N, C, IT, NN, G>(start: N, successors: NN, is_target: G) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    NN: Fn(&N) -> IT, // returns iterator of successors + costs
    IT: IntoIterator<Item = (N, C)>, // Iterator of successors + edge cost to successor node
    C: Zero + Ord + Copy,
    G: Fn(&N) -> bool, // node qualifier for targets
    {

    // Sweep the whole reachable component, collecting accepted nodes
    let (records, targets) = sweep(start, successors, is_target);

    // Cheapest accepted node wins; min_by_key keeps the first of equals,
    // and the target set iterates in discovery order
    let target_index = targets.iter().copied().min_by_key(|&index| records[index].1)?;

    let total = records[target_index].1;
    let path = backtrack(&records, target_index)?;
    Some((path, total))
}


/// Returns a full map of the search space: every node reachable from the
/// start with its cheapest cost and predecessor
///
/// The start is always present at cost zero; other nodes carry the same
/// costs `shortest_path` would report for them.
pub fn distance_map<N, C, IT, NN>(start: N, successors: NN) -> SearchRecords<N, C>
where
    N: Eq + Hash + Clone,
    NN: Fn(&N) -> IT, // returns iterator of successors + costs
    IT: IntoIterator<Item = (N, C)>, // Iterator of successors + edge cost to successor node
    C: Zero + Ord + Copy,
    {

    sweep(start, successors, |_| false).0
}


/// Traverses the search space from the start until the frontier is exhausted
/// Returns the record map along with the record indices of accepted nodes
fn sweep<N, C, IT, NN, G>(start: N, successors: NN, is_target: G) -> (SearchRecords<N, C>, FxIndexSet<usize>)
where
    N: Eq + Hash + Clone,
    NN: Fn(&N) -> IT, // returns iterator of successors + costs
    IT: IntoIterator<Item = (N, C)>, // Iterator of successors + edge cost to successor node
    C: Zero + Ord + Copy,
    G: Fn(&N) -> bool, // Returns true for accepted nodes
    {

    // Frontier of nodes to expand - the reversed ordering on FrontierNode
    // turns the max-heap into a min-heap, so the cheapest pending node pops first
    let mut frontier: BinaryHeap<FrontierNode<C>> = BinaryHeap::new();

    // Record per node - (parent_index, cost), best route found so far
    // usize is the index in the records map
    let mut records: SearchRecords<N, C> = SearchRecords::default();

    // Accepted nodes, by record index, in discovery order
    let mut targets: FxIndexSet<usize> = FxIndexSet::default();

    // Targets are normally noticed when an edge produces them, so a start
    // that is itself accepted has to be checked up front
    let start_accepted = is_target(&start);
    let start_index = records.insert_full(start, (usize::MAX, Zero::zero())).0;
    if start_accepted {
        targets.insert(start_index);
    }
    frontier.push(FrontierNode {
        index: start_index,
        cost: Zero::zero(), // This is the cost from the start node
    });

    // Loop over the frontier, removing the cheapest node first
    while let Some(FrontierNode { cost, index }) = frontier.pop() {

        // fetch current best cost for node
        let (node, &(_, best)) = records.get_index(index).unwrap();

        // If the cost from the heap is higher than the best cost, skip it
        // This implies we've already found a better path to this node
        if cost > best {
            continue;
        }

        // loop over successors
        for (successor, edge_cost) in successors(node).into_iter() {

            let accepted = is_target(&successor);

            // new cost to reach this node = edge cost + node cost
            let new_cost = best + edge_cost;

            // Check if we've found a better path to this successor
            let (successor_index, improved) = match records.entry(successor) {
                Vacant(e) => {
                    // This is the first time we're seeing this successor
                    let successor_index = e.index();
                    e.insert((index, new_cost));
                    (successor_index, true)
                }
                Occupied(mut e) => {
                    let successor_index = e.index();
                    if e.get().1 > new_cost {
                        // We've found a better path to this successor
                        e.insert((index, new_cost));
                        (successor_index, true)
                    } else {
                        // The existing path is better, keep it
                        (successor_index, false)
                    }
                }
            };

            // An accepted node does not end the sweep: a cheaper route to
            // it, or to another accepted node, may still turn up
            if accepted {
                targets.insert(successor_index);
            }

            // Only add to the frontier if we've found a better path
            if improved {
                frontier.push(FrontierNode {
                    index: successor_index,
                    cost: new_cost,
                });
            }
        }
    }

    (records, targets)
}


/// Frontier entry
/// - for ordering we only need cost and a way to identify the node
/// - Nodes can contain additional data, but we only need to identify them
#[derive(Debug)]
struct FrontierNode<T> {
    index: usize,
    cost: T
}

impl<T: Ord> Ord for FrontierNode<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost)
    }
}
impl<T: Ord> PartialOrd for FrontierNode<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: PartialEq> PartialEq for FrontierNode<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl<T: PartialEq> Eq for FrontierNode<T> {}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, GridMap, MoveSet};
    use proptest::prelude::*;
    use std::collections::HashMap;

    // Helper function to create a test graph
    fn create_test_graph() -> HashMap<String, Vec<(String, u32)>> {
        let mut graph = HashMap::new();

        // Diamond-shaped graph: A -> B -> D and A -> C -> D
        graph.insert("A".to_string(), vec![
            ("B".to_string(), 1),
            ("C".to_string(), 3),
        ]);

        graph.insert("B".to_string(), vec![
            ("D".to_string(), 5),
        ]);

        graph.insert("C".to_string(), vec![
            ("D".to_string(), 1),
        ]);

        graph.insert("D".to_string(), vec![]);

        graph
    }

    // Helper function to create a successor function from a graph
    fn create_successor_fn(graph: &HashMap<String, Vec<(String, u32)>>) -> impl Fn(&String) -> Vec<(String, u32)> + '_ {
        move |node: &String| {
            graph.get(node).unwrap_or(&vec![]).clone()
        }
    }

    // Helper for unit-cost 4-connected moves on a 3x3 grid with blocked cells
    fn unit_grid(blocked: &[Cell]) -> impl Fn(&Cell) -> Vec<(Cell, i32)> + '_ {
        move |cell: &Cell| {
            [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .map(|(dx, dy)| Cell::new(cell.x + dx, cell.y + dy))
                .filter(|c| (0..3).contains(&c.x) && (0..3).contains(&c.y) && !blocked.contains(c))
                .map(|c| (c, 1))
                .collect()
        }
    }

    #[test]
    fn test_finds_cheapest_route() {
        let graph = create_test_graph();
        let successors = create_successor_fn(&graph);

        let (path, cost) = shortest_path(
            "A".to_string(),
            successors,
            |node| node == "D"
        ).unwrap();

        // The cheapest route is A -> C -> D; the start stays out of the path
        assert_eq!(path, vec!["C", "D"].into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(cost, 4);
    }

    #[test]
    fn test_start_matching_the_predicate() {
        let graph = create_test_graph();
        let successors = create_successor_fn(&graph);

        let (path, cost) = shortest_path(
            "A".to_string(),
            successors,
            |node| node == "A"
        ).unwrap();

        assert!(path.is_empty());
        assert_eq!(cost, 0);
    }

    #[test]
    fn test_unreachable_target() {
        // Create a graph with no path to the target
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![("B".to_string(), 1)]);
        graph.insert("B".to_string(), vec![("C".to_string(), 1)]);
        graph.insert("C".to_string(), vec![]);
        graph.insert("D".to_string(), vec![]); // D is not connected

        let successors = create_successor_fn(&graph);

        let result = shortest_path("A".to_string(), successors, |node| node == "D");

        assert_eq!(result, None);
    }

    #[test]
    fn test_no_successors_at_all() {
        let successors = |_: &u32| Vec::<(u32, u32)>::new();

        assert_eq!(shortest_path(7, successors, |&n| n == 8), None);
        assert_eq!(shortest_path(7, successors, |&n| n == 7), Some((vec![], 0)));
    }

    #[test]
    fn test_nearest_of_several_targets_wins() {
        // C is discovered first but D is the cheaper of the two targets
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![
            ("B".to_string(), 1),
            ("C".to_string(), 10),
        ]);
        graph.insert("B".to_string(), vec![("D".to_string(), 1)]);
        graph.insert("C".to_string(), vec![]);
        graph.insert("D".to_string(), vec![]);

        let successors = create_successor_fn(&graph);

        let (path, cost) = shortest_path(
            "A".to_string(),
            successors,
            |node| node == "C" || node == "D"
        ).unwrap();

        assert_eq!(path, vec!["B", "D"].into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(cost, 2);
    }

    #[test]
    fn test_equally_cheap_targets_resolve_to_the_first_discovered() {
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![
            ("B".to_string(), 5),
            ("C".to_string(), 5),
        ]);
        graph.insert("B".to_string(), vec![]);
        graph.insert("C".to_string(), vec![]);

        let successors = create_successor_fn(&graph);

        let (path, cost) = shortest_path(
            "A".to_string(),
            successors,
            |node| node == "B" || node == "C"
        ).unwrap();

        // B comes off A's edge list first
        assert_eq!(path, vec!["B".to_string()]);
        assert_eq!(cost, 5);
    }

    #[test]
    fn test_target_cost_improves_after_discovery() {
        // T is first reached directly for 100, then for 2 via B
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![
            ("T".to_string(), 100),
            ("B".to_string(), 1),
        ]);
        graph.insert("B".to_string(), vec![("T".to_string(), 1)]);
        graph.insert("T".to_string(), vec![]);

        let successors = create_successor_fn(&graph);

        let (path, cost) = shortest_path(
            "A".to_string(),
            successors,
            |node| node == "T"
        ).unwrap();

        assert_eq!(path, vec!["B", "T"].into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(cost, 2);
    }

    #[test]
    fn test_relaxation_replaces_the_predecessor() {
        // B is first recorded via A directly, then cheaper via C
        let mut graph = HashMap::new();
        graph.insert("A".to_string(), vec![
            ("B".to_string(), 10),
            ("C".to_string(), 1),
        ]);
        graph.insert("B".to_string(), vec![]);
        graph.insert("C".to_string(), vec![("B".to_string(), 1)]);

        let successors = create_successor_fn(&graph);

        let (path, cost) = shortest_path(
            "A".to_string(),
            successors,
            |node| node == "B"
        ).unwrap();

        assert_eq!(path, vec!["C", "B"].into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(cost, 2);
    }

    #[test]
    fn test_distance_map_handles_cycles() {
        // Create a graph with a cycle: A -> B -> C -> A
        let mut graph = HashMap::new();

        graph.insert("A".to_string(), vec![("B".to_string(), 1)]);
        graph.insert("B".to_string(), vec![("C".to_string(), 1)]);
        graph.insert("C".to_string(), vec![("A".to_string(), 1), ("D".to_string(), 2)]);
        graph.insert("D".to_string(), vec![]);

        let successors = create_successor_fn(&graph);

        let records = distance_map("A".to_string(), successors);

        // Verify costs
        let costs: HashMap<_, _> = records.iter().map(|(node, (_, cost))| (node.clone(), *cost)).collect();

        assert_eq!(costs.get("A").unwrap(), &0);
        assert_eq!(costs.get("B").unwrap(), &1);
        assert_eq!(costs.get("C").unwrap(), &2);
        assert_eq!(costs.get("D").unwrap(), &4);
    }

    #[test]
    fn test_distance_map_covers_the_reachable_component() {
        let graph = create_test_graph();
        let successors = create_successor_fn(&graph);

        let records = distance_map("A".to_string(), successors);

        assert_eq!(records.len(), 4);
        assert_eq!(records.get("A"), Some(&(usize::MAX, 0)));
        assert_eq!(records.get("D").map(|&(_, cost)| cost), Some(4)); // via A->C->D
    }

    #[test]
    fn test_complex_graph() {
        // Create a more complex graph with multiple paths
        let mut graph = HashMap::new();

        graph.insert("A".to_string(), vec![("B".to_string(), 4), ("C".to_string(), 2)]);
        graph.insert("B".to_string(), vec![("C".to_string(), 1), ("D".to_string(), 5)]);
        graph.insert("C".to_string(), vec![("D".to_string(), 8), ("E".to_string(), 10)]);
        graph.insert("D".to_string(), vec![("E".to_string(), 2), ("F".to_string(), 6)]);
        graph.insert("E".to_string(), vec![("F".to_string(), 3)]);
        graph.insert("F".to_string(), vec![]);

        let successors = create_successor_fn(&graph);

        let (path, cost) = shortest_path("A".to_string(), successors, |node| node == "F").unwrap();

        // The cheapest route is A -> B -> D -> E -> F
        assert_eq!(path, vec!["B", "D", "E", "F"].into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(cost, 14);
    }

    #[test]
    fn test_reruns_are_identical() {
        let graph = create_test_graph();

        let first = shortest_path("A".to_string(), create_successor_fn(&graph), |node| node == "D");
        let second = shortest_path("A".to_string(), create_successor_fn(&graph), |node| node == "D");

        assert_eq!(first, second);
    }

    #[test]
    fn test_unit_grid_corner_to_corner() {
        let end = Cell::new(2, 2);
        let (path, cost) = shortest_path(
            Cell::new(0, 0),
            unit_grid(&[]),
            |c| *c == end
        ).unwrap();

        assert_eq!(cost, 4);
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&end));
    }

    #[test]
    fn test_unit_grid_detours_around_a_blocked_cell() {
        let blocked = [Cell::new(1, 1)];
        let end = Cell::new(2, 2);
        let (path, cost) = shortest_path(
            Cell::new(0, 0),
            unit_grid(&blocked),
            |c| *c == end
        ).unwrap();

        // Blocking the center leaves the perimeter routes, still 4 steps
        assert_eq!(cost, 4);
        assert!(!path.contains(&Cell::new(1, 1)));
        assert_eq!(path.last(), Some(&end));
    }

    proptest! {
        /// On random occupancy grids the record map must be a certificate of
        /// optimality: the start sits at cost zero, every recorded route is
        /// consistent with its predecessor, and no single edge out of any
        /// recorded node can undercut a recorded cost.
        #[test]
        fn test_grid_records_admit_no_shortcut(
            width in 1i32..7,
            height in 1i32..7,
            blocked in prop::collection::vec(prop::bool::weighted(0.3), 49),
            goal_x in 0i32..7,
            goal_y in 0i32..7,
        ) {
            let moves = MoveSet::kings();
            let mut grid = GridMap::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    if blocked[(y * 7 + x) as usize] && !(x == 0 && y == 0) {
                        grid.block(Cell::new(x, y));
                    }
                }
            }

            let start = Cell::new(0, 0);
            let records = distance_map(start, grid.successors(&moves));

            prop_assert_eq!(records.get(&start), Some(&(usize::MAX, 0)));

            for (node, &(parent_index, cost)) in records.iter() {
                // every recorded route steps from its predecessor by one move
                if parent_index != usize::MAX {
                    let (parent, &(_, parent_cost)) = records.get_index(parent_index).unwrap();
                    let step = moves
                        .moves()
                        .iter()
                        .find(|m| m.dx == node.x - parent.x && m.dy == node.y - parent.y);
                    prop_assert!(step.is_some());
                    prop_assert_eq!(cost, parent_cost + step.unwrap().cost);
                }

                // no edge out of a recorded node may improve on a recorded cost
                for (neighbor, edge_cost) in grid.successors(&moves)(node) {
                    let recorded = records.get(&neighbor);
                    prop_assert!(recorded.is_some());
                    prop_assert!(recorded.unwrap().1 <= cost + edge_cost);
                }
            }

            // shortest_path agrees with the record map
            let goal = Cell::new(goal_x, goal_y);
            let found = shortest_path(start, grid.successors(&moves), |c| *c == goal);
            match records.get(&goal) {
                Some(&(_, cost)) => {
                    prop_assert!(found.is_some());
                    let (path, total) = found.unwrap();
                    prop_assert_eq!(total, cost);
                    if goal == start {
                        prop_assert!(path.is_empty());
                    } else {
                        prop_assert_eq!(path.last(), Some(&goal));
                    }

                    // the total equals the independent sum of step costs
                    let mut from = start;
                    let mut summed = 0;
                    for &step_cell in &path {
                        let step = moves
                            .moves()
                            .iter()
                            .find(|m| m.dx == step_cell.x - from.x && m.dy == step_cell.y - from.y);
                        prop_assert!(step.is_some());
                        summed += step.unwrap().cost;
                        from = step_cell;
                    }
                    prop_assert_eq!(summed, total);
                }
                None => prop_assert!(found.is_none()),
            }
        }
    }
}
