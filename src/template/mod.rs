//! Placeholder substitution for fragment markup.
//!
//! Syntax understood by [`render`]:
//!
//! - `{{key}}` is replaced by the scalar bound to `key`. A missing key is left
//!   in place untouched, so unresolved placeholders stay visible in output.
//! - `{{#key}}body{{/key}}` repeats `body` once per item of the list bound to
//!   `key`. Inside the body `{{field}}` resolves against the item first, then
//!   against the enclosing record, and is otherwise dropped. Blocks do not
//!   nest.
//!
//! Output of an expanded block is never scanned again, so text produced by a
//! substitution cannot itself be substituted.

mod record;

pub use record::{DataRecord, Value};

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `{{key}}`, `{{#key}}` or `{{/key}}`. Keys may contain dots for flattened
/// nested objects.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([#/]?)([A-Za-z0-9_.\-]+)\}\}").unwrap());

/// Substitute `data` into `markup`.
pub fn render(markup: &str, data: &DataRecord) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut cursor = 0;

    while let Some(caps) = TOKEN.captures_at(markup, cursor) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(2)) else {
            break;
        };
        let sigil = caps.get(1).map_or("", |m| m.as_str());
        let key = key.as_str();

        out.push_str(&markup[cursor..whole.start()]);
        cursor = whole.end();

        match (sigil, data.get(key)) {
            ("#", Some(Value::List(items))) => {
                let close = format!("{{{{/{key}}}}}");
                match markup[whole.end()..].find(&close) {
                    Some(offset) => {
                        let body = &markup[whole.end()..whole.end() + offset];
                        for item in items {
                            out.push_str(&render_item(body, item, data));
                        }
                        cursor = whole.end() + offset + close.len();
                    }
                    // Unterminated block stays literal
                    None => out.push_str(whole.as_str()),
                }
            }
            ("", Some(value)) => match value.as_scalar() {
                Some(text) => out.push_str(text),
                None => out.push_str(whole.as_str()),
            },
            _ => out.push_str(whole.as_str()),
        }
    }

    out.push_str(&markup[cursor..]);
    out
}

/// Render one repetition of a block body.
fn render_item(body: &str, item: &DataRecord, parent: &DataRecord) -> String {
    TOKEN
        .replace_all(body, |caps: &Captures| {
            let whole = &caps[0];
            if !caps[1].is_empty() {
                return whole.to_owned();
            }
            let key = &caps[2];
            item.scalar(key)
                .or_else(|| parent.scalar(key))
                .unwrap_or_default()
                .to_owned()
        })
        .into_owned()
}

/// Placeholders still present in rendered output, e.g. `{{title}}`.
pub fn unresolved(markup: &str) -> Vec<&str> {
    TOKEN.find_iter(markup).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> DataRecord {
        DataRecord::try_from(value).unwrap()
    }

    #[test]
    fn test_scalar_substitution() {
        let data = record(json!({ "siteName": "Acme", "title": "Hello" }));
        assert_eq!(
            render("<h1>{{title}}</h1><p>{{siteName}}</p>", &data),
            "<h1>Hello</h1><p>Acme</p>"
        );
    }

    #[test]
    fn test_repeated_scalar() {
        let data = record(json!({ "a": "x" }));
        assert_eq!(render("{{a}}-{{a}}", &data), "x-x");
    }

    #[test]
    fn test_missing_key_is_left_untouched() {
        let data = record(json!({ "title": "Hi" }));
        assert_eq!(render("{{title}} {{subtitle}}", &data), "Hi {{subtitle}}");
    }

    #[test]
    fn test_null_renders_empty() {
        let data = record(json!({ "subtitle": null }));
        assert_eq!(render("<p>{{subtitle}}</p>", &data), "<p></p>");
    }

    #[test]
    fn test_dotted_key() {
        let data = record(json!({ "contact": { "email": "a@b.c" } }));
        assert_eq!(render("mailto:{{contact.email}}", &data), "mailto:a@b.c");
    }

    #[test]
    fn test_block_expansion() {
        let data = record(json!({ "items": [{ "v": "a" }, { "v": "b" }] }));
        assert_eq!(render("{{#items}}[{{v}}]{{/items}}", &data), "[a][b]");
    }

    #[test]
    fn test_empty_list_removes_block() {
        let data = record(json!({ "items": [] }));
        assert_eq!(render("<ul>{{#items}}<li>{{v}}</li>{{/items}}</ul>", &data), "<ul></ul>");
    }

    #[test]
    fn test_unterminated_block_is_literal() {
        let data = record(json!({ "items": [{ "v": "a" }] }));
        assert_eq!(render("{{#items}}[{{v}}]", &data), "{{#items}}[{{v}}]");
    }

    #[test]
    fn test_block_without_list_is_literal() {
        let data = record(json!({ "title": "x" }));
        assert_eq!(
            render("{{#items}}[{{v}}]{{/items}}", &data),
            "{{#items}}[{{v}}]{{/items}}"
        );
        assert_eq!(
            render("{{#title}}[{{v}}]{{/title}}", &data),
            "{{#title}}[{{v}}]{{/title}}"
        );
    }

    #[test]
    fn test_item_missing_key_renders_empty() {
        let data = record(json!({ "items": [{ "v": "a" }, {}] }));
        assert_eq!(render("{{#items}}[{{v}}]{{/items}}", &data), "[a][]");
    }

    #[test]
    fn test_item_falls_back_to_parent_scope() {
        let data = record(json!({ "siteName": "Acme", "items": [{ "v": "a" }] }));
        assert_eq!(
            render("{{#items}}{{v}}@{{siteName}}{{/items}}", &data),
            "a@Acme"
        );
    }

    #[test]
    fn test_item_shadows_parent() {
        let data = record(json!({
            "title": "Page",
            "items": [{ "title": "First" }, { "title": "Second" }]
        }));
        assert_eq!(
            render("<h1>{{title}}</h1>{{#items}}<h3>{{title}}</h3>{{/items}}", &data),
            "<h1>Page</h1><h3>First</h3><h3>Second</h3>"
        );
    }

    #[test]
    fn test_no_double_expansion() {
        let data = record(json!({
            "title": "{{secret}}",
            "secret": "leaked",
            "items": [{ "v": "{{secret}}" }]
        }));
        assert_eq!(
            render("{{title}}|{{#items}}{{v}}{{/items}}", &data),
            "{{secret}}|{{secret}}"
        );
    }

    #[test]
    fn test_list_as_scalar_is_literal() {
        let data = record(json!({ "items": [{ "v": "a" }] }));
        assert_eq!(render("{{items}}", &data), "{{items}}");
    }

    #[test]
    fn test_stray_close_tag_is_literal() {
        let data = record(json!({ "a": "x" }));
        assert_eq!(render("{{a}}{{/a}}", &data), "x{{/a}}");
    }

    #[test]
    fn test_several_blocks_same_key() {
        let data = record(json!({ "links": [{ "t": "1" }, { "t": "2" }] }));
        assert_eq!(
            render("{{#links}}{{t}}{{/links}}|{{#links}}<{{t}}>{{/links}}", &data),
            "12|<1><2>"
        );
    }

    #[test]
    fn test_literal_text_and_braces_pass_through() {
        let data = DataRecord::new();
        let css = ".a { color: red; } {{ not a token }} {single}";
        assert_eq!(render(css, &data), css);
    }

    #[test]
    fn test_render_is_stable_on_placeholder_free_output() {
        let data = record(json!({ "title": "T", "items": [{ "v": "a" }] }));
        let once = render("<h1>{{title}}</h1>{{#items}}<i>{{v}}</i>{{/items}}", &data);
        assert_eq!(render(&once, &data), once);
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(
            unresolved("<p>{{a}}</p>{{#b}}x{{/b}}"),
            vec!["{{a}}", "{{#b}}", "{{/b}}"]
        );
        assert!(unresolved("<p>done</p>").is_empty());
    }
}
