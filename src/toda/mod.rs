//! Toda module - Lax pair evolution of small open Toda chains.

mod lax;
mod flow;
mod tau;

pub use lax::{eigenvalues, LaxPair, TodaState};
pub use flow::{evolve, flaschka_b, LaxFlow, LaxTrajectory};
pub use tau::TwoParticleTau;
