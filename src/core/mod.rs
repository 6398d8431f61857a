pub mod language_model;
pub mod recommender;

pub use language_model::LanguageModel;
pub use recommender::Recommender;
