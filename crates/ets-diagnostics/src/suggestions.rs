// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Did-you-mean suggestions for misspelled names.

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, a_ch) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &b_ch) in b.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// The candidate closest to `name`, if any is close enough to be a typo.
///
/// Ties keep the earliest candidate.
pub fn closest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let max_distance = match name.chars().count() {
        0..=2 => 1,
        3..=5 => 2,
        _ => 3,
    };

    let mut best: Option<(&str, usize)> = None;
    for candidate in candidates {
        if name.len().abs_diff(candidate.len()) > max_distance {
            continue;
        }
        let dist = edit_distance(name, candidate);
        if dist <= max_distance && best.map_or(true, |(_, d)| dist < d) {
            best = Some((candidate, dist));
        }
    }
    best.map(|(closest, _)| closest)
}

/// `did you mean `X`?` for the closest candidate.
pub fn did_you_mean<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    closest(name, candidates).map(|c| format!("did you mean `{}`?", c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_decorator_names() {
        let candidates = ["Component", "ComponentV2", "State", "Styles"];
        assert_eq!(did_you_mean("Componnt", candidates), Some("did you mean `Component`?".to_string()));
        assert_eq!(did_you_mean("Stat", candidates), Some("did you mean `State`?".to_string()));
        assert_eq!(did_you_mean("Reusable", candidates), None);
    }

    #[test]
    fn edit_distances() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "hello"), 5);
        assert_eq!(edit_distance("abc", "abc"), 0);
    }
}
