// Checks against the MNIST reference dataset (2000 × 784).
//
// The dataset is read from DIGIT_PCA_DATASET (default: mnist.npy). Every test returns early
// with a message when the file is not present.

use digit_pca::{
    get_covariance, get_eig, get_eig_perc, get_eig_share, load_and_center_dataset, project_image,
    DatasetConfig,
};
use float_cmp::assert_approx_eq;
use ndarray::{array, Array2};
use std::sync::OnceLock;

const N_SAMPLES: usize = 2000;
const N_FEATURES: usize = 784;
const TOP_EIGENVALUES: [f64; 2] = [350880.76329673, 245632.27295307];

struct Reference {
    x: Array2<f64>,
    s: Array2<f64>,
}

static REFERENCE: OnceLock<Option<Reference>> = OnceLock::new();

fn reference() -> Option<&'static Reference> {
    REFERENCE
        .get_or_init(|| {
            let config = DatasetConfig::from_env();
            if !config.dataset_available() {
                eprintln!(
                    "Skipping reference test: dataset {:?} not found (set DIGIT_PCA_DATASET)",
                    config.path
                );
                return None;
            }
            let x = load_and_center_dataset(&config.path).expect("failed to load reference dataset");
            let s = get_covariance(&x).expect("failed to build reference covariance");
            Some(Reference { x, s })
        })
        .as_ref()
}

/// numpy.isclose with its default tolerances (rtol = 1e-5, atol = 1e-8).
fn all_close(a: &Array2<f64>, b: &Array2<f64>) -> bool {
    a.dim() == b.dim()
        && a
            .iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).abs() <= 1e-8 + 1e-5 * y.abs())
}

fn assert_diagonal_and_descending(lambda: &Array2<f64>) {
    let off_diagonal_nonzero = lambda
        .indexed_iter()
        .filter(|((i, j), v)| i != j && **v != 0.0)
        .count();
    assert_eq!(off_diagonal_nonzero, 0);

    let diag = lambda.diag().to_vec();
    let mut sorted = diag.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(diag, sorted);
}

#[test]
fn test_load() {
    let Some(reference) = reference() else { return };
    let x = &reference.x;

    assert_eq!(x.dim(), (N_SAMPLES, N_FEATURES));

    let max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = x.iter().cloned().fold(f64::INFINITY, f64::min);
    assert!((max - min).abs() > 1e-7, "dataset should not be constant-valued");
}

#[test]
fn test_center() {
    let Some(reference) = reference() else { return };
    for (i, column) in reference.x.columns().into_iter().enumerate() {
        assert!(column.sum().abs() < 1e-6, "column {} sums to {}", i, column.sum());
    }
}

#[test]
fn test_covariance_shape_and_values() {
    let Some(reference) = reference() else { return };
    let s = &reference.s;

    assert_eq!(s.dim(), (N_FEATURES, N_FEATURES));
    assert!(all_close(s, &s.t().to_owned()));
    let min_diag = s.diag().iter().cloned().fold(f64::INFINITY, f64::min);
    assert!(min_diag >= 0.0);
}

#[test]
fn test_get_eig_small() {
    let Some(reference) = reference() else { return };
    let s = &reference.s;
    let (lambda, u) = get_eig(s, 2).unwrap();

    assert_eq!(lambda.dim(), (2, 2));
    let expected = array![[TOP_EIGENVALUES[0], 0.0], [0.0, TOP_EIGENVALUES[1]]];
    assert!(all_close(&lambda, &expected), "got {:?}", lambda);

    assert_eq!(u.dim(), (N_FEATURES, 2));
    assert!(all_close(&s.dot(&u), &u.dot(&lambda)));
}

#[test]
fn test_get_eig_large() {
    let Some(reference) = reference() else { return };
    let s = &reference.s;
    let (lambda, u) = get_eig(s, N_FEATURES).unwrap();

    assert_eq!(lambda.dim(), (N_FEATURES, N_FEATURES));
    assert_diagonal_and_descending(&lambda);
    assert_eq!(u.dim(), (N_FEATURES, N_FEATURES));
    assert!(all_close(&s.dot(&u), &u.dot(&lambda)));
}

#[test]
fn test_get_eig_perc_selects_everything_for_negative_percentage() {
    let Some(reference) = reference() else { return };
    let s = &reference.s;
    let (lambda, u) = get_eig_perc(s, -1.0).unwrap();

    assert_eq!(lambda.dim(), (N_FEATURES, N_FEATURES));
    assert_diagonal_and_descending(&lambda);
    assert_eq!(u.dim(), (N_FEATURES, N_FEATURES));
    assert!(all_close(&s.dot(&u), &u.dot(&lambda)));

    let (lambda_all, u_all) = get_eig(s, N_FEATURES).unwrap();
    assert_eq!(lambda, lambda_all);
    assert_eq!(u, u_all);
}

#[test]
fn test_get_eig_share_small() {
    let Some(reference) = reference() else { return };
    let s = &reference.s;
    let (lambda, u) = get_eig_share(s, 0.07).unwrap();

    assert_eq!(lambda.dim(), (2, 2));
    let expected = array![[TOP_EIGENVALUES[0], 0.0], [0.0, TOP_EIGENVALUES[1]]];
    assert!(all_close(&lambda, &expected), "got {:?}", lambda);
    assert_eq!(u.dim(), (N_FEATURES, 2));
    assert!(all_close(&s.dot(&u), &u.dot(&lambda)));
}

#[test]
fn test_project_image() {
    let Some(reference) = reference() else { return };
    let (_, u) = get_eig(&reference.s, 2).unwrap();
    // Sample 3 is an image of a "9".
    let sample = reference.x.row(3);
    let projected = project_image(&sample, &u).unwrap();

    assert_eq!(projected.len(), N_FEATURES);
    let min = projected.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = projected.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert_approx_eq!(f64, min, -113.79455198736488, epsilon = 1e-6);
    assert_approx_eq!(f64, max, 120.0658469887994, epsilon = 1e-6);
}

#[test]
fn test_repeated_calls_are_identical() {
    let Some(reference) = reference() else { return };
    let first = get_eig(&reference.s, 2).unwrap();
    let second = get_eig(&reference.s, 2).unwrap();
    assert_eq!(first, second);

    let sample = reference.x.row(3);
    assert_eq!(
        project_image(&sample, &first.1).unwrap(),
        project_image(&sample, &second.1).unwrap()
    );
}
