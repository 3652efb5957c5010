pub mod background;
pub mod categories;
pub mod layers;
pub mod thresholds;
