use super::*;

// Shared fixtures

fn users_json() -> &'static str {
    r#"{
      "user": {"name": "Alice", "roles": ["Admin", "Editor"]},
      "friends": [
        {"first": "Dale", "last": "Murphy", "age": 44, "nets": ["ig", "fb", "tw"]},
        {"first": "Roger", "last": "Craig", "age": 68, "nets": ["fb", "tw"]},
        {"first": "Jane", "last": "Murphy", "age": 47, "nets": ["ig", "tw"]}
      ],
      "version": "1.0"
    }"#
}

fn items_json() -> &'static str {
    r#"{"items":[{"p":1.2,"n":"a"},{"p":0.8,"n":"b"},{"p":3.5,"n":"c"}]}"#
}

mod context_api;
mod helpers_api;
mod path_reconstruct;
mod transform_data;
mod transform_text;
