pub mod hotel;
pub mod recommendation;
pub mod response;
pub mod search;

pub use hotel::{HotelProjection, HotelRecord};
pub use recommendation::{
    validate_demand, RankedResult, Recommendation, RecommendationRequest,
    RecommendationResponse, Strategy,
};
pub use response::{decode_model_answer, deserialize_structured_response, parse_model_content};
pub use search::{ExtractedParameters, MatchedIds, ParameterExtraction};
