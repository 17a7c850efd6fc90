//! Stitching of continuation captions.

/// Combine `existing` with `incoming` without repeating the shared part.
///
/// A suffix/prefix overlap is only used as a stitch point when it is longer
/// than `min_stitch_len` chars; shorter coincidences are joined with a space.
pub fn combine_with(existing: &str, incoming: &str, min_stitch_len: usize) -> String {
    if existing.contains(incoming) {
        return existing.to_string();
    }
    if incoming.contains(existing) {
        return incoming.to_string();
    }

    let (k, split) = longest_suffix_prefix(existing, incoming);
    if k > min_stitch_len {
        let mut out = String::with_capacity(existing.len() + incoming.len() - split);
        out.push_str(existing);
        out.push_str(&incoming[split..]);
        return out;
    }

    format!("{existing} {incoming}")
}

/// [`combine_with`] using the default stitch length of 3.
pub fn combine(existing: &str, incoming: &str) -> String {
    combine_with(existing, incoming, 3)
}

/// Longest `k` (in chars) where the last `k` chars of `existing` equal the first
/// `k` chars of `incoming`, with the byte offset in `incoming` just past them.
fn longest_suffix_prefix(existing: &str, incoming: &str) -> (usize, usize) {
    let prefix_ends: Vec<usize> = incoming
        .char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .chain(std::iter::once(incoming.len()))
        .collect();

    for (n, &end) in prefix_ends.iter().enumerate().rev() {
        if end <= existing.len() && existing.ends_with(&incoming[..end]) {
            return (n + 1, end);
        }
    }
    (0, 0)
}

/// Collapse text that is one phrase stated twice (`"X X"` to `"X"`).
pub fn collapse_self_repeat(text: &str) -> &str {
    let mut current = text;
    loop {
        let len = current.len();
        if len < 3 || len % 2 == 0 {
            return current;
        }
        let mid = len / 2;
        if !current.is_char_boundary(mid) || current.as_bytes()[mid] != b' ' {
            return current;
        }
        let (left, right) = (&current[..mid], &current[mid + 1..]);
        if left != right {
            return current;
        }
        current = left;
    }
}
