use digit_pca::diagnostics::{max_abs_column_sum, EigenDiagnostics};
use digit_pca::{
    decompose, get_covariance, load_and_center_dataset, project_image, DatasetConfig, Selection,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatasetConfig::from_env();
    println!("Reading dataset from {:?}", config.path);

    let x = load_and_center_dataset(&config.path)?;
    println!(
        "Centered dataset shape: {:?}, max |column sum|: {:.3e}",
        x.dim(),
        max_abs_column_sum(&x.view())
    );

    let s = get_covariance(&x)?;
    println!("Covariance shape: {:?}", s.dim());

    let top = decompose(&s, Selection::TopK(2))?;
    println!("Top 2 eigenvalues: {:?}", top.eigenvalues());
    println!("{:#?}", EigenDiagnostics::collect(&s, &top));

    for p in [0.5, 0.9, 0.95] {
        let basis = decompose(&s, Selection::CumulativeVariance(p))?;
        println!(
            "Cumulative variance {:.2}: {} eigenpairs explain {:.4}",
            p,
            basis.len(),
            basis.explained_variance_ratio().sum()
        );
    }
    let shares = decompose(&s, Selection::IndividualShare(0.07))?;
    println!("Eigenpairs above 7% each: {}", shares.len());

    if x.nrows() > 3 {
        let projected = project_image(&x.row(3), top.eigenvectors())?;
        let min = projected.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = projected.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "Sample 3 projected onto 2 eigenvectors: length {}, min {:.6}, max {:.6}",
            projected.len(),
            min,
            max
        );
    }
    Ok(())
}
