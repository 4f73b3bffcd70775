#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod openapi;
mod route;
mod trace;

use std::{sync::Arc, time::Duration};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{
	extract::Request,
	response::Response,
	Extension, Router, ServiceExt,
};
use sqlx::postgres::PgPoolOptions;
use tower::Layer;
use tower_http::{
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::config::Config;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// The pool is created once at startup and closed after the server has
/// drained its connections.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
}

/// Builds the full application router, including the documentation routes
/// and the request middleware.
pub fn app(state: State, config: &Config) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/posts", route::post::routes())
		.nest("/profiles", route::profile::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, |api| openapi::docs(api, config))
		.layer(Extension(Arc::new(api)))
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(
			TraceLayer::new_for_http()
				.make_span_with(|request: &Request| {
					let request_id = request
						.headers()
						.get("x-request-id")
						.and_then(|value| value.to_str().ok())
						.unwrap_or_default();

					tracing::info_span!(
						"request",
						method = %request.method(),
						uri = %request.uri(),
						request_id,
					)
				})
				.on_response(|response: &Response, latency: Duration, _: &tracing::Span| {
					tracing::info!(
						histogram.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
						status = response.status().as_u16(),
						"finished processing request"
					);
				}),
		)
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(CorsLayer::permissive())
		.with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	dotenvy::dotenv().ok();

	let config = Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(&config)?;

	let database = PgPoolOptions::new()
		.max_connections(config.max_connections)
		.connect(&config.database_url)
		.await?;

	let app = app(
		State {
			database: database.clone(),
		},
		&config,
	);

	// Trailing slashes must be trimmed before routing, so this wraps the router.
	let app = NormalizePathLayer::trim_trailing_slash().layer(app);

	let listener = tokio::net::TcpListener::bind((config.host, config.port)).await?;

	tracing::info!(
		address = %listener.local_addr()?,
		environment = %config.environment,
		"listening"
	);

	axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	database.close().await;
	tracing::info!("shut down");

	Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM on Unix.
async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(error) = tokio::signal::ctrl_c().await {
			tracing::error!(%error, "failed to listen for Ctrl-C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let sigterm = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(error) => {
				tracing::error!(%error, "failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let sigterm = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {}
		() = sigterm => {}
	}

	tracing::info!("shutdown signal received, draining connections");
}
