use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::{extract::Json, AppState};

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new()
		.api_route(
			"/",
			get_with(
				Scalar::new("/docs/api.json")
					.with_title("Blog Posts API")
					.axum_handler(),
				|op| op.description("This documentation page."),
			),
		)
		.route("/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_openapi_document() {
		let app = app(lazy_pool());

		let response = app.get("/docs/api.json").await;

		assert_eq!(response.status_code(), 200);

		let document = response.json::<serde_json::Value>();

		assert_eq!(document["info"]["title"], "Blog Posts API");
		assert_eq!(document["servers"][0]["url"], "http://localhost:4001");
		assert!(document["paths"]["/posts/{post_id}"]["put"].is_object());
		assert!(document["paths"]
			.as_object()
			.unwrap()
			.keys()
			.any(|path| path.starts_with("/profiles")));
	}

	#[tokio::test]
	async fn test_reference_page() {
		let response = app(lazy_pool()).get("/docs").await;

		assert_eq!(response.status_code(), 200);
		assert!(response.text().contains("/docs/api.json"));
	}
}
