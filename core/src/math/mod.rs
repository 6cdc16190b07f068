pub mod kinematics;
pub mod random;

pub use kinematics::KinematicsHelper;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
