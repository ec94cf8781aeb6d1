use marray_lsolver::{
    algorithms::{GaussianElimination, SolveAlgorithm},
    product, DenseMatrix, PivotStrategy, Tolerance,
};
use std::time::Instant;

/// Creates a dense pentadiagonal matrix A of size n x n.
/// Diagonals:
/// - Main: 4.0
/// - Adjacent (+1, -1): -1.0
/// - Outer (+2, -2): -0.5
fn create_pentadiagonal_matrix(n: usize) -> DenseMatrix {
    let mut a = DenseMatrix::zeros(n, n).expect("Failed to allocate matrix");

    for i in 0..n {
        a[(i, i)] = 4.0;
        if i >= 1 {
            a[(i, i - 1)] = -1.0;
        }
        if i >= 2 {
            a[(i, i - 2)] = -0.5;
        }
        if i + 1 < n {
            a[(i, i + 1)] = -1.0;
        }
        if i + 2 < n {
            a[(i, i + 2)] = -0.5;
        }
    }

    a
}

/// Creates a column vector b of size n with b[i] = sin(i / n).
fn create_sin_vector(n: usize) -> DenseMatrix {
    let values: Vec<f64> = (0..n).map(|i| (i as f64 / n as f64).sin()).collect();
    DenseMatrix::column_vector(&values).expect("Failed to allocate vector")
}

fn main() {
    // Initialize logging based on RUST_LOG environment variable
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n = 256;
    log::info!(
        "Setting up {}x{} pentadiagonal matrix A and sin vector b...",
        n,
        n
    );

    let a = create_pentadiagonal_matrix(n);
    let b = create_sin_vector(n);

    for strategy in [PivotStrategy::LargestValue, PivotStrategy::LargestMagnitude] {
        let algorithm = GaussianElimination::with_params(strategy);

        log::info!("Running Gaussian elimination ({:?} pivoting)...", strategy);
        let start_time = Instant::now();
        let x_result = algorithm.solve(&a, &b);
        let duration = start_time.elapsed();

        match x_result {
            Ok(result) => {
                log::info!("Solver finished successfully!");
                log::info!("  Row swaps: {}", result.metadata.row_swaps);
                log::info!("  Time elapsed: {:?}", duration);

                // Check the residual with the product engine.
                match product(&a, &result.x) {
                    Ok(ax) => log::info!(
                        "  A x reproduces b: {}",
                        Tolerance::default().close_all(&ax, &b)
                    ),
                    Err(e) => log::error!("Residual check failed: {}", e),
                }
                log::debug!(
                    "Solution vector x (first 10 elements): {:?}",
                    &result.x.data()[..10.min(n)]
                );
            }
            Err(e) => {
                log::error!("Solver failed: {}", e);
            }
        }
    }

    // The block-recursive product kicks in for even square operands.
    let start_time = Instant::now();
    match product(&a, &a) {
        Ok(a2) => log::info!(
            "A * A computed in {:?} (trace = {:.3})",
            start_time.elapsed(),
            (0..n).map(|i| a2[(i, i)]).sum::<f64>()
        ),
        Err(e) => log::error!("Product failed: {}", e),
    }
}
