/// Similarity of two bounded scores (0-100 each)
///
/// `100 - |a - b|`, clamped to [0, 100]. Identical values score 100.
#[inline]
pub fn similarity(a: u8, b: u8) -> f64 {
    let diff = (a as i16 - b as i16).abs() as f64;
    (100.0 - diff).clamp(0.0, 100.0)
}

/// Region overlap as Jaccard similarity: |intersection| / |union| * 100
///
/// Two empty sets are treated as perfect agreement (100), so a pair of
/// minimal profiles never scores worse than an identical pair.
pub fn region_overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    let shared = a.iter().filter(|r| b.contains(r)).count();
    let union = {
        let mut total = a.len();
        total += b.iter().filter(|r| !a.contains(r)).count();
        total
    };
    if union == 0 {
        return 100.0;
    }
    (shared as f64 / union as f64) * 100.0
}

/// Tag overlap: |intersection| / max(len) * 100
///
/// Both empty -> 100 (no evidence of disagreement).
pub fn tag_overlap(a: &[String], b: &[String]) -> f64 {
    let total = a.len().max(b.len());
    if total == 0 {
        return 100.0;
    }
    let shared = a.iter().filter(|t| b.contains(t)).count();
    (shared as f64 / total as f64) * 100.0
}

/// Tags present in both lists, in `a`'s order.
pub fn shared_tags(a: &[String], b: &[String]) -> Vec<String> {
    a.iter().filter(|t| b.contains(t)).cloned().collect()
}

/// Symmetric category-pair lookup table with a per-table default
///
/// Entries are stored once per unordered pair; lookup tries both orderings,
/// so `lookup(a, b) == lookup(b, a)` holds for any entry set.
pub struct CompatibilityMatrix<C: Copy + PartialEq + 'static> {
    entries: &'static [((C, C), u8)],
    default: u8,
}

impl<C: Copy + PartialEq + 'static> CompatibilityMatrix<C> {
    pub const fn new(entries: &'static [((C, C), u8)], default: u8) -> Self {
        Self { entries, default }
    }

    pub fn lookup(&self, a: C, b: C) -> u8 {
        for &((x, y), score) in self.entries {
            if (x == a && y == b) || (x == b && y == a) {
                return score;
            }
        }
        self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity(70, 70), 100.0);
        assert_eq!(similarity(100, 0), 0.0);
        assert_eq!(similarity(80, 60), 80.0);
        assert_eq!(similarity(60, 80), 80.0);
    }

    #[test]
    fn test_region_overlap_jaccard() {
        let a = tags(&["norte", "lisboa"]);
        let b = tags(&["norte", "algarve"]);
        // intersection 1, union 3
        assert!((region_overlap(&a, &b) - 33.333).abs() < 0.01);

        assert_eq!(region_overlap(&a, &a), 100.0);
        assert_eq!(region_overlap(&[], &[]), 100.0);
        assert_eq!(region_overlap(&a, &[]), 0.0);
    }

    #[test]
    fn test_tag_overlap() {
        let a = tags(&["fado", "cuisine", "festivals"]);
        let b = tags(&["fado", "cuisine"]);
        assert!((tag_overlap(&a, &b) - 66.666).abs() < 0.01);
        assert_eq!(tag_overlap(&a, &a), 100.0);
        assert_eq!(tag_overlap(&[], &[]), 100.0);
    }

    #[test]
    fn test_shared_tags() {
        let a = tags(&["fado", "cuisine", "festivals"]);
        let b = tags(&["festivals", "fado"]);
        assert_eq!(shared_tags(&a, &b), tags(&["fado", "festivals"]));
    }

    #[test]
    fn test_matrix_symmetry_and_default() {
        #[derive(Clone, Copy, PartialEq)]
        enum Style {
            A,
            B,
            C,
        }
        static TABLE: &[((Style, Style), u8)] =
            &[((Style::A, Style::A), 95), ((Style::A, Style::B), 60)];
        let matrix: CompatibilityMatrix<Style> = CompatibilityMatrix::new(TABLE, 70);

        assert_eq!(matrix.lookup(Style::A, Style::B), matrix.lookup(Style::B, Style::A));
        assert_eq!(matrix.lookup(Style::A, Style::A), 95);
        assert_eq!(matrix.lookup(Style::B, Style::C), 70);
    }
}
