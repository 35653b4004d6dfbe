//! The additive forecasting model and its design-matrix internals.

mod additive;
mod design;

pub use additive::{AdditiveModel, FittedModel};
