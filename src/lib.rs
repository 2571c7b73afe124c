// Principal component analysis (PCA) over image datasets

#![doc = include_str!("../README.md")]

pub mod config;
pub mod covariance;
pub mod dataset;
pub mod diagnostics;
pub mod eigen;
pub mod error;
pub mod linalg_backends;
pub mod projection;

pub use config::DatasetConfig;
pub use covariance::get_covariance;
pub use dataset::{center_columns, load_and_center_dataset, load_dataset};
pub use eigen::{decompose, decompose_with, get_eig, get_eig_perc, get_eig_share, Eigenbasis, Selection};
pub use error::PcaError;
pub use projection::{project_coordinates, project_image};
