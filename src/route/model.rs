use schemars::JsonSchema;
use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 6;
pub const MAX_LIMIT: i64 = 100;

/// A page request, clamped so that `page >= 1` and `1 <= limit <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginate {
	page: i64,
	limit: i64,
}

impl Default for Paginate {
	fn default() -> Self {
		Self {
			page: DEFAULT_PAGE,
			limit: DEFAULT_LIMIT,
		}
	}
}

impl Paginate {
	pub fn new(page: i64, limit: i64) -> Self {
		Self {
			page: page.max(1),
			limit: limit.clamp(1, MAX_LIMIT),
		}
	}

	/// Builds a page request from raw query values.
	///
	/// Values that are missing, not an integer, or zero fall back to the
	/// defaults before clamping.
	pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
		fn lenient(value: Option<&str>, default: i64) -> i64 {
			value
				.and_then(|value| value.trim().parse::<i64>().ok())
				.filter(|value| *value != 0)
				.unwrap_or(default)
		}

		Self::new(lenient(page, DEFAULT_PAGE), lenient(limit, DEFAULT_LIMIT))
	}

	pub fn page(&self) -> i64 {
		self.page
	}

	pub fn limit(&self) -> i64 {
		self.limit
	}

	pub fn offset(&self) -> i64 {
		(self.page - 1).saturating_mul(self.limit)
	}
}

/// Pagination metadata derived from the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
	/// The number of pages needed to show every matching item.
	pub total_pages: i64,
	/// The page that was returned (1-indexed).
	pub current_page: i64,
	/// The maximum number of items per page.
	pub limit: i64,
	/// The next page, present when more items follow this page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next_page: Option<i64>,
	/// The previous page, present when this page does not start at the first item.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub previous_page: Option<i64>,
}

impl PageMeta {
	/// Derives the metadata for `page` given `total` matching items.
	///
	/// Neither neighbour is clamped against the page count, so a page past the
	/// end still reports a previous page. Arithmetic saturates, so any page
	/// number accepted by [`Paginate`] yields metadata.
	pub fn derive(total: i64, page: i64, limit: i64, offset: i64) -> Self {
		Self {
			total_pages: total / limit + i64::from(total % limit != 0),
			current_page: page,
			limit,
			next_page: (offset.saturating_add(limit) < total)
				.then(|| page.checked_add(1))
				.flatten(),
			previous_page: (offset > 0).then(|| page.saturating_sub(1)),
		}
	}

	pub fn of(total: i64, paginate: &Paginate) -> Self {
		Self::derive(total, paginate.page(), paginate.limit(), paginate.offset())
	}
}

/// A short confirmation returned by write operations.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Acknowledgement {
	pub message: &'static str,
}

impl Acknowledgement {
	pub fn new(message: &'static str) -> Self {
		Self { message }
	}
}
