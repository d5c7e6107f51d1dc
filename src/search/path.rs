use super::SearchRecords;

/// Construct the path from the start node to the target node
/// Returns the ordered path as a vector of nodes ending at the target
/// records: SearchRecords<N, C> - map of nodes with their parent index and cost
/// target_index: usize - index of the target node in the records
///
/// The walk follows parent indices from the target back to the start. The
/// start node has no parent and stays out of the result, so a target equal
/// to the start comes back as an empty path.
pub(crate) fn backtrack<N, C>(records: &SearchRecords<N, C>, target_index: usize) -> Option<Vec<N>>
where
    N: Clone,
{

    let mut path = Vec::new();
    let mut current_index = target_index;

    // Trace back from target to start
    while let Some((node, &(parent_index, _))) = records.get_index(current_index) {
        if parent_index == usize::MAX {
            // Reached the start - the path is in reverse order, so reverse it
            path.reverse();
            return Some(path);
        }
        path.push(node.clone());
        current_index = parent_index;
    }

    // the index does not belong to this record map
    None
}
