//! Approximate "same content" test between two caption texts.

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

/// Tunables for [`OverlapPolicy::has_significant_overlap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapPolicy {
    /// Below this many chars only exact equality counts.
    pub min_fuzzy_len: usize,
    /// `shorter < longer * floor` is never a continuation.
    pub length_ratio_floor: f64,
    /// Shorter strings under this length use `short_threshold`.
    pub short_len: usize,
    pub short_threshold: f64,
    pub long_threshold: f64,
    /// Full edit distance only when the longer text is under this many chars.
    pub full_distance_cap: usize,
    /// Head/tail window size for the approximation above the cap.
    pub window: usize,
}

impl Default for OverlapPolicy {
    fn default() -> Self {
        Self {
            min_fuzzy_len: 5,
            length_ratio_floor: 0.3,
            short_len: 20,
            short_threshold: 0.2,
            long_threshold: 0.3,
            full_distance_cap: 500,
            window: 100,
        }
    }
}

impl OverlapPolicy {
    pub fn has_significant_overlap(&self, a: &str, b: &str) -> bool {
        let a = a.trim().to_lowercase();
        let b = b.trim().to_lowercase();

        if a.is_empty() || b.is_empty() {
            return false;
        }
        if a == b {
            return true;
        }

        let a_len = a.chars().count();
        let b_len = b.chars().count();
        if a_len < self.min_fuzzy_len || b_len < self.min_fuzzy_len {
            return false;
        }

        let ((shorter, shorter_len), (longer, longer_len)) = if a_len <= b_len {
            ((&a, a_len), (&b, b_len))
        } else {
            ((&b, b_len), (&a, a_len))
        };

        if longer.contains(shorter.as_str()) {
            return true;
        }

        if (shorter_len as f64) < (longer_len as f64) * self.length_ratio_floor {
            return false;
        }

        let threshold = if shorter_len < self.short_len {
            self.short_threshold
        } else {
            self.long_threshold
        };

        self.distance_ratio(longer, longer_len, shorter, shorter_len) < threshold
    }

    /// Edit distance normalized by the longer length; bounded cost above the cap.
    fn distance_ratio(
        &self,
        longer: &str,
        longer_len: usize,
        shorter: &str,
        shorter_len: usize,
    ) -> f64 {
        if longer_len < self.full_distance_cap {
            return levenshtein(longer, shorter) as f64 / longer_len as f64;
        }

        let window = self.window.max(1);
        let head = levenshtein(head_chars(longer, window), head_chars(shorter, window));
        let tail = levenshtein(tail_chars(longer, window), tail_chars(shorter, window));
        let compared = window.min(longer_len) * 2;
        let penalty = (longer_len - shorter_len) as f64 / longer_len as f64;

        tracing::trace!(longer_len, shorter_len, head, tail, "approximate overlap distance");

        (head + tail) as f64 / compared as f64 + penalty
    }
}

/// [`OverlapPolicy::has_significant_overlap`] with default tunables.
pub fn has_significant_overlap(a: &str, b: &str) -> bool {
    OverlapPolicy::default().has_significant_overlap(a, b)
}

fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_never_overlaps() {
        assert!(!has_significant_overlap("", "hello"));
        assert!(!has_significant_overlap("  ", "  "));
    }

    #[test]
    fn equality_ignores_case_and_padding() {
        assert!(has_significant_overlap("Hello World", "  hello world "));
        assert!(has_significant_overlap("ok", "OK"));
    }

    #[test]
    fn short_tokens_need_exact_match() {
        assert!(!has_significant_overlap("the", "then we go"));
        assert!(!has_significant_overlap("abcd", "abce"));
    }

    #[test]
    fn containment_counts() {
        assert!(has_significant_overlap("we're going to", "so today we're going to talk"));
    }

    #[test]
    fn size_mismatch_short_circuits() {
        assert!(!has_significant_overlap(
            "hello",
            "a very long sentence that has nothing to do with it"
        ));
    }

    #[test]
    fn near_duplicates_match() {
        // one substitution over 24 chars
        assert!(has_significant_overlap(
            "the quick brown fox runs",
            "the quick brown fox rung"
        ));
        assert!(!has_significant_overlap("hello world", "world wide"));
    }

    #[test]
    fn short_strings_use_stricter_threshold() {
        // 2 edits over 10 chars: 0.2 is not below the short threshold
        assert!(!has_significant_overlap("abcdefghij", "abcdefghXY"));
        let policy = OverlapPolicy {
            short_threshold: 0.25,
            ..OverlapPolicy::default()
        };
        assert!(policy.has_significant_overlap("abcdefghij", "abcdefghXY"));
    }

    #[test]
    fn long_strings_use_looser_threshold() {
        // 5 edits over 20 chars: 0.25 passes at 20 chars and up
        assert!(has_significant_overlap(
            "abcdefghijklmnopqrst",
            "abcdefghijklmnoVWXYZ"
        ));
        // 6 edits over 20 chars sits on the threshold
        assert!(!has_significant_overlap(
            "abcdefghijklmnopqrst",
            "abcdefghijklmnUVWXYZ"
        ));
        // the same 0.25 ratio below 20 chars fails
        assert!(!has_significant_overlap("abcdefgh", "abcdefXY"));
        // shifted caption window, 12 edits over 43 chars
        assert!(has_significant_overlap(
            "hello everyone and welcome back to the show",
            "everyone and welcome back to the show today"
        ));
    }

    #[test]
    fn large_inputs_use_windowed_approximation() {
        let base: String = "lorem ipsum dolor sit amet ".repeat(40);
        let mut edited = base.clone();
        edited.replace_range(500..505, "XXXXX");
        assert!(has_significant_overlap(&base, &edited));

        let other: String = "completely different words ".repeat(40);
        assert!(!has_significant_overlap(&base, &other));
    }

    #[test]
    fn window_helpers_respect_char_boundaries() {
        assert_eq!(head_chars("héllo", 2), "hé");
        assert_eq!(tail_chars("héllo", 4), "éllo");
        assert_eq!(tail_chars("ab", 10), "ab");
        assert_eq!(head_chars("ab", 10), "ab");
    }
}
