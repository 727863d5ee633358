mod estimate;

pub use estimate::estimate;
