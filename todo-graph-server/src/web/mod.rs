use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQL, GraphQLSubscription};
use axum::Router;
use axum::response::{Html, IntoResponse};
use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::events::EventBus;
use crate::graphql::{TaskSchema, build_schema};

/// Creates the router exposing the GraphQL endpoint: POST `/graphql` for
/// queries and mutations, GET `/graphql` for the GraphiQL playground,
/// and `/graphql/ws` for subscriptions over WebSocket.
pub fn create_graphql_router(schema: TaskSchema) -> Router {
    Router::new()
        .route(
            "/graphql",
            axum::routing::get(graphiql_handler).post_service(GraphQL::new(schema.clone())),
        )
        .route_service("/graphql/ws", GraphQLSubscription::new(schema))
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let events = EventBus::new();
    let schema = build_schema(Arc::new(db), events);

    let app = Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_graphql_router(schema))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

async fn graphiql_handler() -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint("/graphql")
            .subscription_endpoint("/graphql/ws")
            .finish(),
    )
}
