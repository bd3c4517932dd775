//! HTML form markup emission
//!
//! Every accepted schema renders to a fixed-template HTML document: one
//! `<div class="form-row">` per layout row, one labelled control per
//! field. Dependent selects render empty with a `data-depends-on`
//! attribute; their option lists only exist at runtime.

use dynaform_core::{CodeGenContext, CodeGenerable, FieldType, FormResult, OptionItem};
use dynaform_schema::{FieldSchema, group_rows};
use heck::ToKebabCase;

/// A whole schema rendered as one `<form>` document
#[derive(Debug, Clone, Copy)]
pub struct FormDocument<'a> {
    fields: &'a [FieldSchema],
}

impl<'a> FormDocument<'a> {
    /// Wrap a schema for rendering
    pub fn new(fields: &'a [FieldSchema]) -> Self {
        Self { fields }
    }
}

impl CodeGenerable for FormDocument<'_> {
    fn generate(&self, ctx: &CodeGenContext) -> FormResult<String> {
        render_form(self.fields, ctx)
    }
}

/// Render a schema as an HTML form, grouped by layout rows
pub fn render_form(fields: &[FieldSchema], ctx: &CodeGenContext) -> FormResult<String> {
    let mut out = String::new();
    out.push_str(&format!("{}<form class=\"dynaform\">\n", ctx.indent()));

    let row_ctx = ctx.indented();
    for (number, row) in group_rows(fields).iter().enumerate() {
        if ctx.include_comments {
            out.push_str(&format!("{}<!-- row {} -->\n", row_ctx.indent(), number + 1));
        }
        out.push_str(&format!("{}<div class=\"form-row\">\n", row_ctx.indent()));
        let field_ctx = row_ctx.indented();
        for &index in &row.fields {
            out.push_str(&render_field(&fields[index], &field_ctx)?);
        }
        out.push_str(&format!("{}</div>\n", row_ctx.indent()));
    }

    out.push_str(&format!("{}</form>\n", ctx.indent()));
    Ok(out)
}

/// Render one field as a labelled control inside its span wrapper
pub fn render_field(field: &FieldSchema, ctx: &CodeGenContext) -> FormResult<String> {
    let id = element_id(&field.name);
    let mut out = String::new();

    out.push_str(&format!(
        "{}<div class=\"form-field span-{}\">\n",
        ctx.indent(),
        field.effective_span()
    ));

    let inner = ctx.indented();
    out.push_str(&format!(
        "{}<label for=\"{}\">{}</label>\n",
        inner.indent(),
        id,
        escape(&field.label)
    ));

    match field.field_type {
        FieldType::String => out.push_str(&input_line(&inner, "text", &id, field)),
        FieldType::Number => out.push_str(&input_line(&inner, "number", &id, field)),
        FieldType::Date => out.push_str(&input_line(&inner, "date", &id, field)),
        FieldType::Boolean => {
            out.push_str(&format!(
                "{}<input type=\"checkbox\" id=\"{}\" name=\"{}\" class=\"switch\"{}>\n",
                inner.indent(),
                id,
                escape(&field.name),
                required_attr(field)
            ));
        }
        FieldType::Select => out.push_str(&select_block(&inner, &id, field)),
    }

    out.push_str(&format!("{}</div>\n", ctx.indent()));
    Ok(out)
}

fn input_line(ctx: &CodeGenContext, input_type: &str, id: &str, field: &FieldSchema) -> String {
    format!(
        "{}<input type=\"{}\" id=\"{}\" name=\"{}\"{}{}>\n",
        ctx.indent(),
        input_type,
        id,
        escape(&field.name),
        placeholder_attr(field),
        required_attr(field)
    )
}

fn select_block(ctx: &CodeGenContext, id: &str, field: &FieldSchema) -> String {
    let depends = field
        .controlling_field()
        .map(|c| format!(" data-depends-on=\"{}\"", escape(c)))
        .unwrap_or_default();

    let mut out = format!(
        "{}<select id=\"{}\" name=\"{}\"{}{}>\n",
        ctx.indent(),
        id,
        escape(&field.name),
        depends,
        required_attr(field)
    );

    let option_ctx = ctx.indented();
    if let Some(hint) = field.placeholder_text() {
        out.push_str(&format!(
            "{}<option value=\"\" disabled selected>{}</option>\n",
            option_ctx.indent(),
            escape(&hint)
        ));
    }
    for option in field.static_options() {
        out.push_str(&option_line(&option_ctx, option));
    }

    out.push_str(&format!("{}</select>\n", ctx.indent()));
    out
}

fn option_line(ctx: &CodeGenContext, option: &OptionItem) -> String {
    format!(
        "{}<option value=\"{}\">{}</option>\n",
        ctx.indent(),
        escape(&option.value.key()),
        escape(&option.label)
    )
}

fn placeholder_attr(field: &FieldSchema) -> String {
    field
        .placeholder_text()
        .map(|p| format!(" placeholder=\"{}\"", escape(&p)))
        .unwrap_or_default()
}

fn required_attr(field: &FieldSchema) -> &'static str {
    if field.required { " required" } else { "" }
}

/// Element id derived from the field name (`firstName` -> `first-name`)
pub fn element_id(name: &str) -> String {
    name.to_kebab_case()
}

/// Minimal HTML attribute/text escaping
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
