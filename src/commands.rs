pub mod resource;
pub mod retrieve_token;
