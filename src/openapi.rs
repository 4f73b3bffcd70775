use aide::{
	openapi::{Server, Tag},
	transform::TransformOpenApi,
};

use crate::{config::Config, error, extract::Json};

pub mod tag {
	pub const POST: &str = "Post";
	pub const PROFILE: &str = "Profile";
}

pub fn docs<'a>(api: TransformOpenApi<'a>, config: &Config) -> TransformOpenApi<'a> {
	api.title("Blog Posts API")
		.summary("A blog post management API")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::PROFILE.into(),
			description: Some("Author profile".into()),
			..Default::default()
		})
		.server(Server {
			url: config.docs_server_url(),
			description: Some(config.environment.to_string()),
			..Default::default()
		})
		.default_response_with::<Json<error::Message>, _>(|res| {
			res.example(
				error::Message::new("Title is required")
					.field("title")
					.detail("key", "value"),
			)
		})
}
