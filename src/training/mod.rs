pub mod history;

pub use history::TrainingHistory;
