use minijinja::{Environment, context};

use crate::config::Features;
use crate::resolve::Representations;

const TEMPLATES: &[(&str, &str)] = &[
    ("_header.go.j2", include_str!("../templates/_header.go.j2")),
    ("_core.go.j2", include_str!("../templates/_core.go.j2")),
    ("_text.go.j2", include_str!("../templates/_text.go.j2")),
    ("_sql.go.j2", include_str!("../templates/_sql.go.j2")),
    ("enum.go.j2", include_str!("../templates/enum.go.j2")),
    ("enum_text.go.j2", include_str!("../templates/enum_text.go.j2")),
    ("enum_sql.go.j2", include_str!("../templates/enum_sql.go.j2")),
    ("enum_text_sql.go.j2", include_str!("../templates/enum_text_sql.go.j2")),
];

/// The four output shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// String conversions only.
    Plain,
    /// Plus `MarshalText` / `UnmarshalText`.
    Text,
    /// Plus `Value` / `Scan`.
    Sql,
    /// Both extras.
    TextSql,
}

impl TemplateKind {
    pub fn select(features: Features) -> Self {
        match (features.text, features.sql) {
            (false, false) => Self::Plain,
            (true, false) => Self::Text,
            (false, true) => Self::Sql,
            (true, true) => Self::TextSql,
        }
    }

    pub fn template_name(self) -> &'static str {
        match self {
            Self::Plain => "enum.go.j2",
            Self::Text => "enum_text.go.j2",
            Self::Sql => "enum_sql.go.j2",
            Self::TextSql => "enum_text_sql.go.j2",
        }
    }
}

/// Inputs to a single render call.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub package: &'a str,
    pub type_name: &'a str,
    pub representations: &'a Representations,
}

/// Render the Go source for `ctx` using the template picked by `kind`.
pub fn render(kind: TemplateKind, ctx: &RenderContext<'_>) -> String {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    for &(name, body) in TEMPLATES {
        env.add_template(name, body)
            .expect("template should be valid");
    }
    let tmpl = env.get_template(kind.template_name()).unwrap();

    tmpl.render(context! {
        package => ctx.package,
        type_name => ctx.type_name,
        values => values_to_ctx(ctx.representations),
    })
    .expect("render should succeed")
}

/// Per-value context with pre-quoted literals and the padding `gofmt`
/// would use to align key/value pairs.
fn values_to_ctx(representations: &Representations) -> Vec<minijinja::Value> {
    let quoted: Vec<String> = representations.values().map(|r| go_quote(r)).collect();
    let quoted_width = quoted.iter().map(|q| q.chars().count()).max().unwrap_or(0);
    let name_width = representations
        .keys()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0);

    representations
        .keys()
        .zip(quoted)
        .map(|(name, quoted)| {
            let quoted_pad = " ".repeat(quoted_width - quoted.chars().count());
            let name_pad = " ".repeat(name_width - name.chars().count());
            context! {
                name => name,
                quoted => quoted,
                quoted_pad => quoted_pad,
                name_pad => name_pad,
            }
        })
        .collect()
}

/// Quote `value` as a Go interpreted string literal.
pub fn go_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() && (c as u32) < 0x80 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
