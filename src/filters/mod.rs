pub mod scalar_kalman;

pub use scalar_kalman::{Estimate, Prediction, ScalarKalman};
