//! Heaviest common subsequence by dynamic programming.
//!
//! Every element carries a weight and the table holds, for every pair of prefixes, the
//! largest total weight of a common subsequence. With unit weights that is the classic
//! LCS length. The line differ weighs each line by its length in chars, so a long shared
//! line beats several short ones. The subsequence is recovered by walking back from the
//! bottom-right cell. Time and space are both O(|A|·|B|), so this is only meant for
//! moderately sized files.

/// Prefix table: cell (i, j) is the heaviest common subsequence weight of `a[..i]` and
/// `b[..j]`.
#[derive(Debug)]
pub struct LcsTable {
    cols: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    /// Fill the (|a|+1)×(|b|+1) table, weighing each matched element with `weight`.
    pub fn build<T, F>(a: &[T], b: &[T], weight: F) -> Self
    where
        T: PartialEq,
        F: Fn(&T) -> usize,
    {
        let cols = b.len() + 1;
        let mut cells = vec![0; (a.len() + 1) * cols];
        for (i, x) in a.iter().enumerate() {
            for (j, y) in b.iter().enumerate() {
                let here = (i + 1) * cols + j + 1;
                cells[here] = if x == y {
                    cells[i * cols + j] + weight(x)
                } else {
                    cells[here - 1].max(cells[here - cols])
                };
            }
        }
        Self { cols, cells }
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    /// Total weight of the common subsequence of the full sequences.
    pub fn len(&self) -> usize {
        self.cells.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recover the common subsequence, in order, as references into `a`.
    ///
    /// On a tie between dropping the last element of `b` and dropping the last element
    /// of `a`, the former wins, so the output is deterministic.
    pub fn backtrack<'a, T: PartialEq>(&self, a: &'a [T], b: &[T]) -> Vec<&'a T> {
        let (mut i, mut j) = (a.len(), b.len());
        let mut common = Vec::new();
        while i > 0 && j > 0 {
            if a[i - 1] == b[j - 1] {
                common.push(&a[i - 1]);
                i -= 1;
                j -= 1;
            } else if self.get(i, j - 1) >= self.get(i - 1, j) {
                j -= 1;
            } else {
                i -= 1;
            }
        }
        common.reverse();
        common
    }
}

/// Heaviest common subsequence of `a` and `b` under `weight`.
pub fn lcs<'a, T, F>(a: &'a [T], b: &[T], weight: F) -> Vec<&'a T>
where
    T: PartialEq,
    F: Fn(&T) -> usize,
{
    LcsTable::build(a, b, weight).backtrack(a, b)
}

#[cfg(test)]
mod test {
    use super::{lcs, LcsTable};
    use pretty_assertions::assert_eq;

    fn unit<T>(_: &T) -> usize {
        1
    }

    fn chars(line: &&str) -> usize {
        line.chars().count()
    }

    #[test]
    fn classic_example() {
        let a: Vec<char> = "ABCBDAB".chars().collect();
        let b: Vec<char> = "BDCABA".chars().collect();
        let table = LcsTable::build(&a, &b, unit);
        assert_eq!(table.len(), 4);
        let common: String = table.backtrack(&a, &b).into_iter().collect();
        assert_eq!(common.len(), 4);
    }

    #[test]
    fn tie_prefers_dropping_from_b() {
        // "ab" vs "ba": both "a" and "b" are valid; dropping b's tail first keeps "b".
        let a = ["a", "b"];
        let b = ["b", "a"];
        assert_eq!(lcs(&a, &b, unit), vec![&"b"]);
    }

    #[test]
    fn heavier_line_beats_more_lines() {
        let a = ["\n", "\n", "ab\n"];
        let b = ["ab\n", "\n", "\n"];
        assert_eq!(lcs(&a, &b, chars), vec![&"ab\n"]);
        assert_eq!(LcsTable::build(&a, &b, chars).len(), 3);
        assert_eq!(lcs(&a, &b, unit), vec![&"\n", &"\n"]);
    }

    #[test]
    fn empty_sides() {
        let a: [&str; 0] = [];
        let b = ["x"];
        assert!(lcs(&a, &b, chars).is_empty());
        assert!(lcs(&b, &a, chars).is_empty());
        assert!(LcsTable::build(&a, &a, chars).is_empty());
    }

    #[test]
    fn identical_sequences() {
        let a = ["a\n", "b\n", "c\n"];
        assert_eq!(lcs(&a, &a, chars), vec![&"a\n", &"b\n", &"c\n"]);
        assert_eq!(LcsTable::build(&a, &a, chars).len(), 6);
    }
}
