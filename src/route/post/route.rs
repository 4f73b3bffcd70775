use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	error,
	extract::{Json, Path, Query},
	openapi::tag,
	Database,
};

use super::{model, query, Error, Operation, RouteError, StoreContext};

/// Get all posts
/// Returns a paginated list of posts, newest first. Posts can be filtered by
/// a category name and by a keyword matched against the title, description
/// and content; both matches are case-insensitive.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
	Query(params): Query<model::ListParams>,
) -> Result<Json<model::PostPage>, RouteError> {
	let list = model::ListQuery::from(params);
	let statement = query::ListStatement::build(&list);

	let posts = statement
		.fetch_rows(&database)
		.await
		.during(Operation::Read)?;
	let total = statement
		.fetch_count(&database)
		.await
		.during(Operation::Read)?;

	Ok(Json(model::PostPage::new(total, &list.paginate, posts)))
}

/// Get single post
/// Returns a single post by its unique id, with its category and status labels.
#[route(
	tag = tag::POST,
	response(status = 404, description = "Post not found", shape = "Json<error::Message>")
)]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
) -> Result<Json<model::Post>, RouteError> {
	let id = path.id(Operation::Read)?;
	let sql = query::post_by_id();
	let post = sqlx::query_as::<_, model::Post>(&sql)
		.bind(id)
		.fetch_optional(&database)
		.await
		.during(Operation::Read)?;

	Ok(Json(post.ok_or(Error::UnknownPost {
		id: path.post_id,
		operation: Operation::Read,
	})?))
}

/// Create post
/// Creates a new post. The server assigns its id and creation time.
#[route(
	tag = tag::POST,
	response(status = 201, description = "Created post successfully", shape = "Json<model::Acknowledgement>"),
	response(status = 400, description = "A field is missing or has the wrong type", shape = "Json<error::Message>")
)]
pub async fn create_post(
	State(database): State<Database>,
	Json(input): Json<model::PostInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let id = sqlx::query_scalar::<_, i32>(
		r#"
			INSERT INTO posts (title, image, category_id, description, content, status_id, date)
			VALUES ($1, $2, $3, $4, $5, $6, now())
			RETURNING id
		"#,
	)
	.bind(&input.title)
	.bind(&input.image)
	.bind(input.category_id)
	.bind(&input.description)
	.bind(&input.content)
	.bind(input.status_id)
	.fetch_one(&database)
	.await
	.during(Operation::Create)?;

	tracing::info!(post_id = id, "created post");

	Ok((
		StatusCode::CREATED,
		Json(model::Acknowledgement::new("Created post successfully")),
	)
		.into_response())
}

/// Update post
/// Replaces every writable field of an existing post and refreshes its timestamp.
#[route(
	tag = tag::POST,
	response(status = 400, description = "A field is missing or has the wrong type", shape = "Json<error::Message>"),
	response(status = 404, description = "Post not found", shape = "Json<error::Message>")
)]
pub async fn update_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
	Json(input): Json<model::PostInput>,
) -> Result<Json<model::Acknowledgement>, RouteError> {
	let id = path.id(Operation::Update)?;
	let status = sqlx::query(
		r#"
			UPDATE posts
			SET title = $2, image = $3, category_id = $4, description = $5,
				content = $6, status_id = $7, date = now()
			WHERE id = $1
		"#,
	)
	.bind(id)
	.bind(&input.title)
	.bind(&input.image)
	.bind(input.category_id)
	.bind(&input.description)
	.bind(&input.content)
	.bind(input.status_id)
	.execute(&database)
	.await
	.during(Operation::Update)?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownPost {
			id: path.post_id,
			operation: Operation::Update,
		}
		.into());
	}

	tracing::info!(post_id = id, "updated post");

	Ok(Json(model::Acknowledgement::new("Updated post successfully")))
}

/// Delete post
/// Deletes an existing post by its unique id.
#[route(
	tag = tag::POST,
	response(status = 404, description = "Post not found", shape = "Json<error::Message>")
)]
pub async fn delete_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
) -> Result<Json<model::Acknowledgement>, RouteError> {
	let id = path.id(Operation::Delete)?;
	let status = sqlx::query(
		r#"
			DELETE FROM posts
			WHERE id = $1
		"#,
	)
	.bind(id)
	.execute(&database)
	.await
	.during(Operation::Delete)?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownPost {
			id: path.post_id,
			operation: Operation::Delete,
		}
		.into());
	}

	tracing::info!(post_id = id, "deleted post");

	Ok(Json(model::Acknowledgement::new("Deleted post successfully")))
}
