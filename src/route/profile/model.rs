use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Serialize, JsonSchema)]
pub struct Profile {
	pub name: &'static str,
	pub age: u32,
}

/// The envelope around the profile.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ProfileBody {
	pub data: Profile,
}
