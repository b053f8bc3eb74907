//! Todo Authorizer - API Gateway TOKEN authorizer Lambda

use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;
use todo_gateway::auth::{handle_authorizer_event, TokenAuthorizerEvent};
use todo_gateway::{telemetry, Authorizer, GatewayConfig};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing(false, true);

    let config = GatewayConfig::load(None)?;
    let authorizer = Arc::new(Authorizer::from_config(&config)?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<TokenAuthorizerEvent>| {
        let authorizer = Arc::clone(&authorizer);
        async move { Ok::<_, Error>(handle_authorizer_event(&authorizer, event.payload)) }
    }))
    .await
}
