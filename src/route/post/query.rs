//! Construction of the post listing queries.
//!
//! The row query and the count query are rendered from the same list of
//! [`Filter`]s, so they always agree on which posts match.

use sqlx::{postgres::PgArguments, query::QueryAs, query::QueryScalar, Postgres};

use crate::Database;

use super::model::{ListQuery, Paginate, Post};

const POST_COLUMNS: &str = "posts.id, posts.image, categories.name AS category, posts.title, \
	posts.description, posts.date, posts.content, statuses.status, posts.likes_count";

const POST_JOINS: &str = "FROM posts\n\
	INNER JOIN categories ON posts.category_id = categories.id\n\
	INNER JOIN statuses ON posts.status_id = statuses.id";

/// Selects a single post by id, bound as `$1`.
pub fn post_by_id() -> String {
	format!("SELECT {POST_COLUMNS}\n{POST_JOINS}\nWHERE posts.id = $1")
}

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
	Text(String),
	Int(i64),
}

/// A single predicate fragment of the listing's `WHERE` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
	/// The category name contains the value.
	Category(String),
	/// The title, description or content contains the value.
	Keyword(String),
}

impl Filter {
	/// The fragment's only parameter: the value wrapped in `%` wildcards.
	///
	/// Wildcards already present in the value are not escaped.
	fn param(&self) -> Param {
		let (Self::Category(value) | Self::Keyword(value)) = self;

		Param::Text(format!("%{value}%"))
	}

	/// Renders the fragment against placeholder `$slot`.
	fn render(&self, slot: usize) -> String {
		match self {
			Self::Category(..) => format!("categories.name ILIKE ${slot}"),
			Self::Keyword(..) => format!(
				"(posts.title ILIKE ${slot} OR posts.description ILIKE ${slot} OR posts.content ILIKE ${slot})"
			),
		}
	}
}

/// The filters of a listing, joined with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
	filters: Vec<Filter>,
}

impl Predicate {
	pub fn new(query: &ListQuery) -> Self {
		let category = query.category.clone().map(Filter::Category);
		let keyword = query.keyword.clone().map(Filter::Keyword);

		Self {
			filters: category.into_iter().chain(keyword).collect(),
		}
	}

	pub fn filters(&self) -> &[Filter] {
		&self.filters
	}

	/// Renders the `WHERE` clause (empty without filters) and its parameters,
	/// numbering placeholders from `$1`.
	fn render(&self) -> (String, Vec<Param>) {
		let mut clause = String::new();
		let mut params = Vec::with_capacity(self.filters.len());

		for filter in &self.filters {
			clause.push_str(if params.is_empty() { "\nWHERE " } else { "\nAND " });
			params.push(filter.param());
			clause.push_str(&filter.render(params.len()));
		}

		(clause, params)
	}
}

/// The pair of statements behind one page of the post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStatement {
	pub row_sql: String,
	pub row_params: Vec<Param>,
	pub count_sql: String,
	pub count_params: Vec<Param>,
	pub limit: i64,
	pub offset: i64,
}

impl ListStatement {
	pub fn build(query: &ListQuery) -> Self {
		Self::from_parts(&Predicate::new(query), &query.paginate)
	}

	pub fn from_parts(predicate: &Predicate, paginate: &Paginate) -> Self {
		let (clause, params) = predicate.render();
		let limit = paginate.limit();
		let offset = paginate.offset();

		let row_sql = format!(
			"SELECT {POST_COLUMNS}\n{POST_JOINS}{clause}\nORDER BY posts.date DESC\nLIMIT ${} OFFSET ${}",
			params.len() + 1,
			params.len() + 2,
		);

		let mut row_params = params.clone();
		row_params.extend([Param::Int(limit), Param::Int(offset)]);

		Self {
			row_sql,
			row_params,
			count_sql: format!("SELECT COUNT(*)\n{POST_JOINS}{clause}"),
			count_params: params,
			limit,
			offset,
		}
	}

	/// Fetches the posts on the requested page, newest first.
	pub async fn fetch_rows(&self, database: &Database) -> Result<Vec<Post>, sqlx::Error> {
		let query = sqlx::query_as::<_, Post>(&self.row_sql);

		bind_rows(query, &self.row_params)
			.fetch_all(database)
			.await
	}

	/// Counts every post matching the filters, ignoring the page bounds.
	pub async fn fetch_count(&self, database: &Database) -> Result<i64, sqlx::Error> {
		let query = sqlx::query_scalar::<_, i64>(&self.count_sql);

		bind_scalar(query, &self.count_params)
			.fetch_one(database)
			.await
	}
}

fn bind_rows<'q>(
	mut query: QueryAs<'q, Postgres, Post, PgArguments>,
	params: &'q [Param],
) -> QueryAs<'q, Postgres, Post, PgArguments> {
	for param in params {
		query = match param {
			Param::Text(value) => query.bind(value.as_str()),
			Param::Int(value) => query.bind(*value),
		};
	}

	query
}

fn bind_scalar<'q>(
	mut query: QueryScalar<'q, Postgres, i64, PgArguments>,
	params: &'q [Param],
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
	for param in params {
		query = match param {
			Param::Text(value) => query.bind(value.as_str()),
			Param::Int(value) => query.bind(*value),
		};
	}

	query
}

#[cfg(test)]
mod test {
	use super::*;

	fn query(category: Option<&str>, keyword: Option<&str>, page: i64, limit: i64) -> ListQuery {
		ListQuery {
			category: category.map(str::to_owned),
			keyword: keyword.map(str::to_owned),
			paginate: Paginate::new(page, limit),
		}
	}

	/// Everything after the projection, up to the row query's ordering.
	fn row_filter_part(statement: &ListStatement) -> &str {
		let start = statement.row_sql.find("FROM").unwrap();
		let end = statement.row_sql.find("\nORDER BY").unwrap();

		&statement.row_sql[start..end]
	}

	fn count_filter_part(statement: &ListStatement) -> &str {
		let start = statement.count_sql.find("FROM").unwrap();

		&statement.count_sql[start..]
	}

	#[test]
	fn test_no_filters() {
		let statement = ListStatement::build(&query(None, None, 1, 6));

		assert!(!statement.row_sql.contains("WHERE"));
		assert!(!statement.count_sql.contains("WHERE"));
		assert!(statement
			.row_sql
			.ends_with("ORDER BY posts.date DESC\nLIMIT $1 OFFSET $2"));
		assert_eq!(statement.row_params, vec![Param::Int(6), Param::Int(0)]);
		assert!(statement.count_params.is_empty());
	}

	#[test]
	fn test_category_only() {
		let statement = ListStatement::build(&query(Some("Tech"), None, 1, 6));

		assert!(statement
			.count_sql
			.ends_with("\nWHERE categories.name ILIKE $1"));
		assert!(!statement.count_sql.contains("posts.title ILIKE"));
		assert_eq!(statement.count_params, vec![Param::Text("%Tech%".into())]);
		assert!(statement.row_sql.ends_with("LIMIT $2 OFFSET $3"));
	}

	#[test]
	fn test_keyword_only() {
		let statement = ListStatement::build(&query(None, Some("api"), 2, 10));

		assert!(statement.count_sql.ends_with(
			"\nWHERE (posts.title ILIKE $1 OR posts.description ILIKE $1 OR posts.content ILIKE $1)"
		));
		assert!(!statement.count_sql.contains("categories.name ILIKE"));
		assert_eq!(
			statement.row_params,
			vec![Param::Text("%api%".into()), Param::Int(10), Param::Int(10)]
		);
	}

	#[test]
	fn test_category_and_keyword() {
		let statement = ListStatement::build(&query(Some("tech"), Some("api"), 3, 6));

		assert!(statement.count_sql.ends_with(
			"\nWHERE categories.name ILIKE $1\nAND (posts.title ILIKE $2 OR posts.description ILIKE $2 OR posts.content ILIKE $2)"
		));
		assert_eq!(
			statement.count_params,
			vec![Param::Text("%tech%".into()), Param::Text("%api%".into())]
		);
		assert_eq!(
			statement.row_params,
			vec![
				Param::Text("%tech%".into()),
				Param::Text("%api%".into()),
				Param::Int(6),
				Param::Int(12),
			]
		);
		assert!(statement.row_sql.ends_with("LIMIT $3 OFFSET $4"));
	}

	#[test]
	fn test_row_and_count_share_predicate() {
		let cases = [
			(None, None),
			(Some("tech"), None),
			(None, Some("api")),
			(Some("tech"), Some("api")),
		];

		for (category, keyword) in cases {
			let statement = ListStatement::build(&query(category, keyword, 4, 25));

			assert_eq!(row_filter_part(&statement), count_filter_part(&statement));
			assert_eq!(
				&statement.row_params[..statement.row_params.len() - 2],
				statement.count_params.as_slice()
			);
			assert!(statement.count_sql.starts_with("SELECT COUNT(*)\nFROM posts"));
			assert!(!statement.count_sql.contains("LIMIT"));
			assert!(!statement.count_sql.contains("ORDER BY"));
		}
	}

	#[test]
	fn test_rows_are_joined_and_ordered() {
		let statement = ListStatement::build(&ListQuery::default());

		assert!(statement.row_sql.starts_with(
			"SELECT posts.id, posts.image, categories.name AS category, posts.title, posts.description, posts.date, posts.content, statuses.status, posts.likes_count\nFROM posts"
		));
		assert!(statement
			.row_sql
			.contains("INNER JOIN categories ON posts.category_id = categories.id"));
		assert!(statement
			.row_sql
			.contains("INNER JOIN statuses ON posts.status_id = statuses.id"));
	}

	#[test]
	fn test_limit_and_offset_are_clamped() {
		let statement = ListStatement::build(&query(None, None, -2, 1000));

		assert_eq!(statement.limit, 100);
		assert_eq!(statement.offset, 0);

		let statement = ListStatement::build(&query(None, None, 3, 0));

		assert_eq!(statement.limit, 1);
		assert_eq!(statement.offset, 2);
		assert_eq!(statement.row_params, vec![Param::Int(1), Param::Int(2)]);
	}

	#[test]
	fn test_wildcards_pass_through() {
		let statement = ListStatement::build(&query(Some("50%_off"), None, 1, 6));

		assert_eq!(
			statement.count_params,
			vec![Param::Text("%50%_off%".into())]
		);
	}

	#[test]
	fn test_post_by_id_uses_listing_joins() {
		let sql = post_by_id();

		assert!(sql.contains(POST_JOINS));
		assert!(sql.ends_with("\nWHERE posts.id = $1"));
	}

	#[test]
	fn test_predicate_order() {
		let predicate = Predicate::new(&query(Some("a"), Some("b"), 1, 6));

		assert_eq!(
			predicate.filters(),
			&[Filter::Category("a".into()), Filter::Keyword("b".into())]
		);
		assert!(Predicate::new(&ListQuery::default()).filters().is_empty());
	}
}
