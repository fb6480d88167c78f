//! Gestalt (Ratcliff/Obershelp) string similarity

/// Similarity of two strings in `[0, 1]`.
///
/// Computed as `2 * M / T`, where `T` is the total number of characters in
/// both strings and `M` the number of characters in matching blocks, found by
/// taking the longest common substring and recursing on both sides of it.
/// Two empty strings are fully similar.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_match(a, b);
    if size == 0 {
        return 0;
    }

    size + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + size..], &b[j + size..])
}

/// Longest common substring as `(start_a, start_b, len)`.
/// Among equally long blocks the one starting earliest in `a`, then in `b`, wins.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                cur[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = cur;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_and_empty() {
        assert!(approx(ratio("ventas", "ventas"), 1.0));
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("abc", ""), 0.0));
        assert!(approx(ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_partial_overlap() {
        // "bcd" matches: 2 * 3 / 8
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        // one substituted character out of twelve
        assert!(approx(ratio("ventas_enero", "ventas_enera"), 22.0 / 24.0));
    }

    #[test]
    fn test_recurses_on_both_sides() {
        // "ab" then "d" on the right: 2 * 3 / 8
        assert!(approx(ratio("abxd", "abyd"), 0.75));
    }

    #[test]
    fn test_symmetric_for_simple_inputs() {
        assert!(approx(ratio("informe_2023", "informe_2024"), ratio("informe_2024", "informe_2023")));
    }
}
