pub mod candidate;
pub mod posting;
