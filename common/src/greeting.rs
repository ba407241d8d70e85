use tracing::error;

use crate::api::BettingApi;
use crate::error::Result;

pub async fn greet<A: BettingApi>(api: &A) -> Result<String> {
    match api.hello().await {
        Ok(response) => Ok(response.message),
        Err(e) => {
            error!("Error fetching greeting: {e}");
            Err(e)
        }
    }
}
