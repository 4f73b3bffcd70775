use macros::route;

use crate::{extract::Json, openapi::tag};

use super::model;

/// Get profile
/// Returns the profile of the blog's author.
#[route(tag = tag::PROFILE)]
pub async fn get_profile() -> Json<model::ProfileBody> {
	Json(model::ProfileBody {
		data: model::Profile {
			name: "john",
			age: 20,
		},
	})
}
