//! Classical dynamic time warping over a precomputed cost matrix.
//!
//! Backtracking tie-break order is diagonal → up → left: when two or more
//! predecessors share the minimum cumulative cost, the diagonal predecessor
//! wins, then the predecessor directly above, then the one to the left.

/// A single step of the warping path, `(row, col)`.
pub type Step = (usize, usize);

/// Runs DTW over `cost`, a rectangular `n x m` matrix with every entry
/// finite and non-negative. Returns the aggregate path cost and the
/// warping path from `(0, 0)` to `(n-1, m-1)`.
///
/// `cost` must have `n >= 1` rows each of the same length `m >= 1`, except
/// for the `n == 0` edge case, which returns `(0.0, vec![])`.
pub fn dtw(cost: &[Vec<f64>]) -> (f64, Vec<Step>) {
    let n = cost.len();
    if n == 0 {
        log::trace!("dtw on empty matrix, returning zero cost");
        return (0.0, Vec::new());
    }
    let m = cost[0].len();
    log::trace!("dtw over a {n}x{m} cost matrix");

    let mut d = vec![vec![f64::INFINITY; m]; n];
    d[0][0] = cost[0][0];

    for i in 1..n {
        d[i][0] = cost[i][0] + d[i - 1][0];
    }
    for j in 1..m {
        d[0][j] = cost[0][j] + d[0][j - 1];
    }

    for i in 1..n {
        for j in 1..m {
            d[i][j] = cost[i][j] + min3(d[i - 1][j], d[i][j - 1], d[i - 1][j - 1]);
        }
    }

    let mut i = n - 1;
    let mut j = m - 1;
    let mut path = vec![(i, j)];

    while i > 0 || j > 0 {
        if i == 0 {
            j -= 1;
        } else if j == 0 {
            i -= 1;
        } else {
            let diag = d[i - 1][j - 1];
            let up = d[i - 1][j];
            let left = d[i][j - 1];

            if diag <= up && diag <= left {
                i -= 1;
                j -= 1;
            } else if up <= left {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        path.push((i, j));
    }

    path.reverse();
    (d[n - 1][m - 1], path)
}

fn min3(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).min(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matrix_returns_zero_cost_and_empty_path() {
        let (cost, path) = dtw(&[]);
        assert_eq!(cost, 0.0);
        assert!(path.is_empty());
    }

    #[test]
    fn single_cell_matrix() {
        let (cost, path) = dtw(&[vec![0.0]]);
        assert_eq!(cost, 0.0);
        assert_eq!(path, vec![(0, 0)]);
    }

    #[test]
    fn hand_rolled_3x3_diagonal_preference() {
        let c = vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ];
        let (cost, path) = dtw(&c);
        assert_eq!(cost, 15.0);
        assert_eq!(path, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn path_is_monotone_and_bounded() {
        let c = vec![
            vec![0.0, 1.0, 4.0, 9.0],
            vec![1.0, 0.0, 1.0, 4.0],
            vec![4.0, 1.0, 0.0, 1.0],
        ];
        let (_, path) = dtw(&c);

        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(2, 3)));

        for w in path.windows(2) {
            let (i0, j0) = w[0];
            let (i1, j1) = w[1];
            let step = (i1 as isize - i0 as isize, j1 as isize - j0 as isize);
            assert!(
                step == (1, 0) || step == (0, 1) || step == (1, 1),
                "illegal step {step:?}"
            );
        }
    }

    #[test]
    fn rectangular_matrix_n_less_than_m() {
        let c = vec![vec![0.0, 1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0, 0.0]];
        let (cost, path) = dtw(&c);
        assert!(cost.is_finite());
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(1, 3)));
    }
}
