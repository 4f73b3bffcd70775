use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use crate::extract::Admit;

use super::model::{PostInput, PostPayload};

/// A checked payload field: its name, its display label and its raw value.
struct Field<'a> {
	name: &'static str,
	label: &'static str,
	value: &'a Option<Value>,
}

/// Whether a value counts as provided.
///
/// `null`, `false`, `0` and the empty string are treated the same as an
/// absent field.
fn is_present(value: &Option<Value>) -> bool {
	match value {
		None | Some(Value::Null) => false,
		Some(Value::Bool(value)) => *value,
		Some(Value::Number(number)) => number.as_f64().map_or(true, |n| n != 0.0),
		Some(Value::String(value)) => !value.is_empty(),
		Some(Value::Array(..) | Value::Object(..)) => true,
	}
}

fn reject(field: &'static str, code: &'static str, message: String) -> ValidationErrors {
	let mut error = ValidationError::new(code);
	error.message = Some(message.into());

	let mut errors = ValidationErrors::new();
	errors.add(field, error);
	errors
}

fn text(field: &Field, message: &str) -> Result<String, ValidationErrors> {
	match field.value {
		Some(Value::String(value)) => Ok(value.clone()),
		_ => Err(reject(field.name, "type", format!("{} {message}", field.label))),
	}
}

fn id(field: &Field) -> Result<i32, ValidationErrors> {
	match field.value {
		Some(Value::Number(number)) => number
			.as_i64()
			.and_then(|number| i32::try_from(number).ok())
			.ok_or_else(|| {
				reject(
					field.name,
					"type",
					format!("{} must be a number", field.label),
				)
			}),
		_ => Err(reject(
			field.name,
			"type",
			format!("{} must be a number", field.label),
		)),
	}
}

impl Admit for PostInput {
	type Payload = PostPayload;

	/// Checks that every field is present, then that every field has the
	/// right type. The first failing check is reported.
	fn admit(payload: PostPayload) -> Result<Self, ValidationErrors> {
		let title = Field {
			name: "title",
			label: "Title",
			value: &payload.title,
		};
		let image = Field {
			name: "image",
			label: "Image",
			value: &payload.image,
		};
		let description = Field {
			name: "description",
			label: "Description",
			value: &payload.description,
		};
		let content = Field {
			name: "content",
			label: "Content",
			value: &payload.content,
		};
		let category_id = Field {
			name: "category_id",
			label: "Category ID",
			value: &payload.category_id,
		};
		let status_id = Field {
			name: "status_id",
			label: "Status ID",
			value: &payload.status_id,
		};

		for field in [
			&title,
			&image,
			&description,
			&content,
			&category_id,
			&status_id,
		] {
			if !is_present(field.value) {
				return Err(reject(
					field.name,
					"required",
					format!("{} is required", field.label),
				));
			}
		}

		Ok(Self {
			title: text(&title, "must be a string")?,
			image: text(&image, "must be a string URL")?,
			description: text(&description, "must be a string")?,
			content: text(&content, "must be a string")?,
			category_id: id(&category_id)?,
			status_id: id(&status_id)?,
		})
	}
}
