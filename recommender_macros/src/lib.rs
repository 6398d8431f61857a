mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Implements `hotel_recommender::schema::CompletionSchema` for a struct with
/// named fields.
///
/// The generated impl caches the `schemars` JSON schema of the struct and a
/// JSON response template built from the field doc comments, which the
/// prompts embed verbatim so the model knows which keys to return.
///
/// Optional arguments: `name = "..."` overrides the schema name and
/// `description = "..."` overrides the struct doc comment.
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
