use crate::error::Result;

/// Emits every non-empty combination of the nodes on a single-path tree,
/// each extended by `suffix`.
///
/// Counters along a path never increase, so a combination's support is the
/// counter of its deepest node.
pub fn generate_combinations_from_path<F>(path: &[(usize, usize)], suffix: &[usize], mut emit: F) -> Result<()>
where
    F: FnMut(Vec<usize>, usize) -> Result<()>,
{
    let mut callback = |combination: &[usize]| -> Result<()> {
        let Some(&deepest) = combination.last() else {
            return Ok(());
        };
        let mut pattern = suffix.to_vec();
        pattern.extend(combination.iter().map(|&idx| path[idx].0));
        emit(pattern, path[deepest].1)
    };
    generate_combinations_recursive(path.len(), 0, &mut Vec::new(), &mut callback)
}

/// Visits every non-empty subset of `0..len` in lexicographic order.
pub fn generate_combinations_recursive<F>(len: usize, start: usize, current: &mut Vec<usize>, callback: &mut F) -> Result<()>
where
    F: FnMut(&[usize]) -> Result<()>,
{
    for i in start..len {
        current.push(i);
        callback(current.as_slice())?;
        generate_combinations_recursive(len, i + 1, current, callback)?;
        current.pop();
    }
    Ok(())
}

/// Closed combinations of a single path: each prefix of the path ending at a
/// node whose counter is strictly above the next one.
pub fn closed_prefixes_of_path(path: &[(usize, usize)]) -> Vec<(Vec<usize>, usize)> {
    path.iter()
        .enumerate()
        .filter(|&(idx, &(_, count))| path.get(idx + 1).map_or(true, |&(_, next)| next < count))
        .map(|(idx, &(_, count))| (path[..=idx].iter().map(|&(item, _)| item).collect(), count))
        .collect()
}
