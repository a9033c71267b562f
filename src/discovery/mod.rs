mod walker;

pub use walker::{CandidateFile, TreeWalker};
