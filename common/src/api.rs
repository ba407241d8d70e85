use crate::error::Result;
use crate::network::Connection;
use crate::{
    BetsResponse, CurrencyResponse, EndBetRequest, FormFields, GreetingResponse, MatchesResponse,
    MessageResponse, PlaceBetRequest, UsersResponse,
};

pub mod endpoints {
    pub const CREATE_USER: &str = "/api/create_user";
    pub const GET_USERS: &str = "/api/get_users";
    pub const GET_USER_CURRENCY: &str = "/api/get_user_currency";
    pub const GET_USER_BETS: &str = "/api/get_user_bets";
    pub const PLACE_BET: &str = "/api/place_bet";
    pub const END_BET: &str = "/api/end_bet";
    pub const UPCOMING_MATCHES: &str = "/api/upcoming_matches";
    pub const HELLO: &str = "/api/hello";
}

/// The backend operations the page controllers depend on.
#[allow(async_fn_in_trait)]
pub trait BettingApi {
    async fn create_user(&self, fields: &FormFields) -> Result<MessageResponse>;

    async fn get_users(&self) -> Result<UsersResponse>;

    async fn get_user_currency(&self, username: &str) -> Result<CurrencyResponse>;

    async fn get_user_bets(&self, username: &str) -> Result<BetsResponse>;

    async fn place_bet(&self, bet: &PlaceBetRequest) -> Result<MessageResponse>;

    async fn end_bet(&self, request: &EndBetRequest) -> Result<MessageResponse>;

    async fn upcoming_matches(&self) -> Result<MatchesResponse>;

    async fn hello(&self) -> Result<GreetingResponse>;
}

impl BettingApi for Connection {
    async fn create_user(&self, fields: &FormFields) -> Result<MessageResponse> {
        self.post(endpoints::CREATE_USER, fields).await
    }

    async fn get_users(&self) -> Result<UsersResponse> {
        self.get(endpoints::GET_USERS, &[]).await
    }

    async fn get_user_currency(&self, username: &str) -> Result<CurrencyResponse> {
        self.get(endpoints::GET_USER_CURRENCY, &[("username", username)]).await
    }

    async fn get_user_bets(&self, username: &str) -> Result<BetsResponse> {
        self.get(endpoints::GET_USER_BETS, &[("username", username)]).await
    }

    async fn place_bet(&self, bet: &PlaceBetRequest) -> Result<MessageResponse> {
        self.post(endpoints::PLACE_BET, bet).await
    }

    async fn end_bet(&self, request: &EndBetRequest) -> Result<MessageResponse> {
        self.post(endpoints::END_BET, request).await
    }

    async fn upcoming_matches(&self) -> Result<MatchesResponse> {
        self.get(endpoints::UPCOMING_MATCHES, &[]).await
    }

    async fn hello(&self) -> Result<GreetingResponse> {
        self.get(endpoints::HELLO, &[]).await
    }
}
