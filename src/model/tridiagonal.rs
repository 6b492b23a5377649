/// Symmetric tridiagonal matrix: `diagonal[i] = H[i, i]` and
/// `off_diagonal[i] = H[i, i + 1] = H[i + 1, i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricTridiagonal {
    pub diagonal: Vec<f64>,
    pub off_diagonal: Vec<f64>
}

impl SymmetricTridiagonal {
    pub fn new(diagonal: Vec<f64>, off_diagonal: Vec<f64>) -> Self {
        debug_assert_eq!(off_diagonal.len() + 1, diagonal.len().max(1));
        SymmetricTridiagonal { diagonal, off_diagonal }
    }

    pub fn len(&self) -> usize {
        self.diagonal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagonal.is_empty()
    }

    /// Forward elimination pivots `d` and multipliers `a` (`a[0]` is unused).
    fn forward_sweep(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.len();
        let mut a = vec![0.0; n];
        let mut d = vec![0.0; n];

        d[0] = self.diagonal[0];
        for i in 1..n {
            a[i] = self.off_diagonal[i - 1] / d[i - 1];
            d[i] = self.diagonal[i] - a[i] * self.off_diagonal[i - 1];
        }

        (a, d)
    }

    /// Solves `H·x = rhs` with the Thomas algorithm.
    pub fn solve(&self, rhs: &[f64]) -> Vec<f64> {
        let n = self.len();
        if n == 0 {
            return Vec::new();
        }

        let (a, d) = self.forward_sweep();

        let mut y = vec![0.0; n];
        y[0] = rhs[0];
        for i in 1..n {
            y[i] = rhs[i] - a[i] * y[i - 1];
        }

        let mut x = vec![0.0; n];
        x[n - 1] = y[n - 1] / d[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = (y[i] - self.off_diagonal[i] * x[i + 1]) / d[i];
        }

        x
    }

    /// Diagonal of `H⁻¹`, combining a forward and a backward elimination.
    pub fn inverse_diagonal(&self) -> Vec<f64> {
        let n = self.len();
        if n == 0 {
            return Vec::new();
        }

        let (_, d) = self.forward_sweep();

        let mut dp = vec![0.0; n];
        dp[n - 1] = self.diagonal[n - 1];
        for i in (0..n - 1).rev() {
            let ap = self.off_diagonal[i] / dp[i + 1];
            dp[i] = self.diagonal[i] - ap * self.off_diagonal[i];
        }

        let mut inverse = vec![0.0; n];
        for i in 0..n - 1 {
            let b = self.off_diagonal[i];
            inverse[i] = dp[i + 1] / (d[i] * dp[i + 1] - b * b);
        }
        inverse[n - 1] = 1.0 / d[n - 1];

        inverse
    }
}
