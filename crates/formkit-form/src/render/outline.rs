//! Plain-text renderer.
//!
//! Produces an indented outline of the form, one line per label, widget,
//! error and button. Used by the `formkit render` command and by tests
//! that assert on what a user would see.

use serde_json::Value;

use formkit_schema::LocalizedError;

use super::{
    ArrayItemOutput, ArrayProps, FieldTemplateProps, ObjectProps, Renderer, SubmitProps,
    WidgetProps,
};
use crate::widget::BuiltinWidget;

const INDENT: &str = "  ";

/// Renders a form as an indented text outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineRenderer;

impl OutlineRenderer {
    /// A new outline renderer.
    pub fn new() -> Self {
        Self
    }
}

fn indent(block: &str) -> String {
    block
        .lines()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join(lines: Vec<String>) -> String {
    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "(vuoto)".to_string(),
        Some(Value::String(s)) => format!("\"{s}\""),
        Some(other) => other.to_string(),
    }
}

/// Static add/remove label for an array titled `title`.
pub fn array_button_label(verb: &str, title: Option<&str>) -> String {
    format!("{verb} {}", title.unwrap_or("elemento"))
}

impl Renderer for OutlineRenderer {
    type Output = String;

    fn widget(&mut self, widget: BuiltinWidget, props: &WidgetProps<'_>) -> String {
        let mut line = match widget {
            BuiltinWidget::Checkbox => {
                let mark = if props.value == Some(&Value::Bool(true)) { "x" } else { " " };
                let star = if props.required { " *" } else { "" };
                format!("[{mark}] {}{star}", props.label)
            }
            BuiltinWidget::Select => {
                let options = props
                    .options
                    .unwrap_or_default()
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join("|");
                format!("<{}> {} ({options})", widget.name(), display_value(props.value))
            }
            BuiltinWidget::TextInput | BuiltinWidget::NumericInput => {
                let shown = match (props.value, props.placeholder) {
                    (None, Some(placeholder)) => format!("({placeholder})"),
                    (value, _) => display_value(value),
                };
                format!("<{}> {shown}", widget.name())
            }
        };
        if props.disabled {
            line.push_str(" [disabilitato]");
        } else if props.readonly {
            line.push_str(" [sola lettura]");
        }
        line
    }

    fn field(&mut self, props: &FieldTemplateProps<'_>, content: String) -> String {
        if props.hidden {
            return String::new();
        }
        let mut lines = Vec::new();
        if props.display_label && !props.label.is_empty() {
            let star = if props.required { " *" } else { "" };
            lines.push(format!("{}{star}", props.label));
        }
        if let Some(description) = props.description {
            lines.push(format!("({description})"));
        }
        lines.push(content);
        lines.extend(props.errors.iter().map(|e| format!("! {}", e.message)));
        if let Some(help) = props.help {
            lines.push(format!("? {help}"));
        }
        join(lines)
    }

    fn object(&mut self, props: &ObjectProps<'_>, children: Vec<String>) -> String {
        let body = join(children);
        match props.title {
            Some(title) => join(vec![format!("{title}:"), indent(&body)]),
            None => body,
        }
    }

    fn array(&mut self, props: &ArrayProps<'_>, items: Vec<ArrayItemOutput<String>>) -> String {
        let mut lines = Vec::new();
        let header = match props.class_names {
            Some(classes) => format!("{}: [{classes}]", props.title.unwrap_or("")),
            None => format!("{}:", props.title.unwrap_or("")),
        };
        lines.push(header);
        for item in items {
            let mut block = vec![format!("- #{} ({})", item.index, item.key), indent(&item.content)];
            if item.removable {
                block.push(format!(
                    "{INDENT}[{}]",
                    array_button_label("Rimuovi", props.title)
                ));
            }
            lines.push(indent(&join(block)));
        }
        if props.can_add {
            lines.push(format!(
                "{INDENT}[{}]",
                array_button_label("Aggiungi", props.title)
            ));
        }
        join(lines)
    }

    fn error_list(&mut self, errors: &[LocalizedError]) -> String {
        let mut lines = vec!["Errori:".to_string()];
        lines.extend(errors.iter().map(|e| format!("- {e}")));
        join(lines)
    }

    fn submit(&mut self, props: &SubmitProps<'_>) -> String {
        if props.disabled {
            format!("[{}] [disabilitato]", props.label)
        } else {
            format!("[{}]", props.label)
        }
    }

    fn form(&mut self, body: String, error_list: Option<String>, submit: String) -> String {
        let mut lines = vec![body];
        lines.extend(error_list);
        lines.push(submit);
        join(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_button_label_fallback() {
        assert_eq!(array_button_label("Aggiungi", Some("Lotto")), "Aggiungi Lotto");
        assert_eq!(array_button_label("Rimuovi", None), "Rimuovi elemento");
    }

    #[test]
    fn test_indent_every_line() {
        assert_eq!(indent("a\nb"), "  a\n  b");
    }

    #[test]
    fn test_submit_disabled_marker() {
        let mut renderer = OutlineRenderer::new();
        let out = renderer.submit(&SubmitProps {
            disabled: true,
            label: "Salva",
        });
        assert_eq!(out, "[Salva] [disabilitato]");
    }
}
