use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod query;
pub mod route;
mod validate;

/// The store operation a handler was performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
	Create,
	Read,
	Update,
	Delete,
}

impl Operation {
	fn verb(self) -> &'static str {
		match self {
			Self::Create => "create",
			Self::Read => "read",
			Self::Update => "update",
			Self::Delete => "delete",
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {id} ({operation:?})")]
	UnknownPost { id: i64, operation: Operation },
	#[error("could not {} post: {source}", .operation.verb())]
	Store {
		operation: Operation,
		source: sqlx::Error,
	},
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

/// Attaches the failed [`Operation`] to a database result.
pub trait StoreContext<T> {
	fn during(self, operation: Operation) -> Result<T, Error>;
}

impl<T> StoreContext<T> for Result<T, sqlx::Error> {
	fn during(self, operation: Operation) -> Result<T, Error> {
		self.map_err(|source| Error::Store { operation, source })
	}
}

impl model::PostPath {
	/// The stored id addressed by the path. Ids outside the column's range
	/// cannot exist, so they are unknown posts.
	pub fn id(&self, operation: Operation) -> Result<i32, Error> {
		i32::try_from(self.post_id).map_err(|_| Error::UnknownPost {
			id: self.post_id,
			operation,
		})
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:post_id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost { .. } => StatusCode::NOT_FOUND,
			Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn into_message(self) -> error::Message {
		match self {
			Self::UnknownPost { id, operation } => {
				let message = match operation {
					Operation::Update => "Server could not find a requested post to update",
					Operation::Delete => "Server could not find a requested post to delete",
					Operation::Create | Operation::Read => "Server could not find a requested post",
				};

				error::Message::new(message).detail("post", id)
			}
			Self::Store { operation, .. } => error::Message::new(format!(
				"Server could not {} post because database connection",
				operation.verb()
			)),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::error::ErrorShape;

	use super::*;

	#[test]
	fn test_not_found_messages() {
		let message = |operation| Error::UnknownPost { id: 7, operation }.into_message();

		assert_eq!(
			message(Operation::Read).message,
			"Server could not find a requested post"
		);
		assert_eq!(
			message(Operation::Update).message,
			"Server could not find a requested post to update"
		);
		assert_eq!(
			message(Operation::Delete).message,
			"Server could not find a requested post to delete"
		);
		assert_eq!(
			message(Operation::Read).details.unwrap()["post"],
			serde_json::json!(7)
		);
	}

	#[test]
	fn test_out_of_range_ids_are_unknown() {
		let path = |post_id| model::PostPath { post_id };

		assert_eq!(path(42).id(Operation::Read).unwrap(), 42);
		assert_eq!(
			path(i64::from(i32::MAX)).id(Operation::Read).unwrap(),
			i32::MAX
		);

		let error = path(3_000_000_000).id(Operation::Delete).unwrap_err();

		assert_eq!(error.status(), StatusCode::NOT_FOUND);
		assert_eq!(
			error.into_message().details.unwrap()["post"],
			serde_json::json!(3_000_000_000_i64)
		);
		assert!(path(i64::MIN).id(Operation::Update).is_err());
	}

	#[test]
	fn test_store_failures_name_the_operation() {
		let error = Err::<(), _>(sqlx::Error::PoolTimedOut)
			.during(Operation::Create)
			.unwrap_err();

		assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			error.into_message().message,
			"Server could not create post because database connection"
		);
	}
}
