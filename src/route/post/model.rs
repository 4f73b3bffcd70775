pub use crate::route::model::{Acknowledgement, PageMeta, Paginate};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single blog post, with its category and status resolved to their labels.
#[derive(Debug, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	pub id: i32,
	/// The URL of the post's cover image.
	pub image: String,
	/// The name of the post's category.
	pub category: String,
	/// The title of the post.
	pub title: String,
	/// A short summary of the post.
	pub description: String,
	/// The time the post was created or last updated.
	pub date: chrono::DateTime<chrono::Utc>,
	/// The body of the post.
	pub content: String,
	/// The label of the post's publication status.
	pub status: String,
	/// The number of likes the post has received.
	pub likes_count: i32,
}

/// Path parameters of the single-post routes.
///
/// Any integer is accepted here; ids that no post can have are reported as
/// unknown posts by the handlers.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PostPath {
	/// The unique identifier of the post.
	pub post_id: i64,
}

/// The writable fields of a post.
///
/// This is only ever produced by admitting a [`PostPayload`].
#[derive(Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct PostInput {
	/// The title of the post.
	pub title: String,
	/// The URL of the post's cover image.
	pub image: String,
	/// The id of the post's category.
	pub category_id: i32,
	/// A short summary of the post.
	pub description: String,
	/// The body of the post.
	pub content: String,
	/// The id of the post's publication status.
	pub status_id: i32,
}

/// A write request body before any field has been checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostPayload {
	pub title: Option<serde_json::Value>,
	pub image: Option<serde_json::Value>,
	pub category_id: Option<serde_json::Value>,
	pub description: Option<serde_json::Value>,
	pub content: Option<serde_json::Value>,
	pub status_id: Option<serde_json::Value>,
}

/// Raw query parameters accepted by the post listing.
///
/// Every value is kept as text so that malformed numbers fall back to their
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListParams {
	/// Only include posts whose category name contains this text (case-insensitive).
	pub category: Option<String>,
	/// Only include posts whose title, description or content contains this text (case-insensitive).
	pub keyword: Option<String>,
	/// The page number to return (1-indexed, defaults to 1).
	#[schemars(with = "Option<i64>")]
	pub page: Option<String>,
	/// The number of posts per page (1 to 100, defaults to 6).
	#[schemars(with = "Option<i64>")]
	pub limit: Option<String>,
}

/// A normalized post listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
	pub category: Option<String>,
	pub keyword: Option<String>,
	pub paginate: Paginate,
}

impl From<ListParams> for ListQuery {
	fn from(params: ListParams) -> Self {
		let paginate = Paginate::parse(params.page.as_deref(), params.limit.as_deref());

		Self {
			category: params.category.filter(|category| !category.is_empty()),
			keyword: params.keyword.filter(|keyword| !keyword.is_empty()),
			paginate,
		}
	}
}

/// A page of posts together with the pagination metadata.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
	/// The number of posts matching the filters, across all pages.
	pub total_posts: i64,
	#[serde(flatten)]
	pub meta: PageMeta,
	/// The posts on this page, newest first.
	pub posts: Vec<Post>,
}

impl PostPage {
	pub fn new(total_posts: i64, paginate: &Paginate, posts: Vec<Post>) -> Self {
		Self {
			total_posts,
			meta: PageMeta::of(total_posts, paginate),
			posts,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_list_query_drops_empty_filters() {
		let query = ListQuery::from(ListParams {
			category: Some(String::new()),
			keyword: Some("rust".into()),
			page: Some("2".into()),
			limit: None,
		});

		assert_eq!(query.category, None);
		assert_eq!(query.keyword.as_deref(), Some("rust"));
		assert_eq!(query.paginate, Paginate::new(2, 6));
	}

	#[test]
	fn test_page_serialization() {
		let page = PostPage::new(13, &Paginate::new(3, 6), Vec::new());

		assert_eq!(
			serde_json::to_value(&page).unwrap(),
			serde_json::json!({
				"totalPosts": 13,
				"totalPages": 3,
				"currentPage": 3,
				"limit": 6,
				"posts": [],
				"previousPage": 2,
			})
		);
	}
}
