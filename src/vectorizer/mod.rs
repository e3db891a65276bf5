pub mod corpus;
pub mod dictionary;
pub mod tfidf;
pub mod token;
