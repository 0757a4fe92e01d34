use crate::token::Token;
use crate::{TokenRetriever, TokenRetrieverError};

pub struct RetrieveTokenCommand<R>
where
    R: TokenRetriever,
{
    token_retriever: R,
}

impl<R> RetrieveTokenCommand<R>
where
    R: TokenRetriever,
{
    pub fn new(token_retriever: R) -> Self {
        Self { token_retriever }
    }

    pub fn retrieve_token(self) -> Result<Token, TokenRetrieverError> {
        self.token_retriever
            .retrieve()
            .map_err(|e| TokenRetrieverError::TokenRetrieverError(e.to_string()))
    }
}
