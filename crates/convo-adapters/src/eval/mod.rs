//! `SimpleEvaluator`: evaluador mínimo para templates `@ruta.a.valor` y
//! tests de casos de router.
//!
//! Una referencia `@x.y` se resuelve contra el contexto de evaluación; si
//! `x` no es una variable conocida el texto se deja tal cual (así un email
//! como `a@b.com` no se toca). `@@` produce una `@` literal.

mod cases;

use convo_core::errors::EvalError;
use convo_core::Evaluator;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

pub use cases::evaluate_case;

static NULL: Value = Value::Null;

static REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@@|@([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)").unwrap());

#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleEvaluator;

/// Representación textual de un valor del contexto. Los objetos con
/// `value` (resultados) o `name` (contacto, flows) se muestran por ese campo.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        Value::Object(map) => match map.get("value").or_else(|| map.get("name")) {
            Some(inner) => stringify(inner),
            None => value.to_string(),
        },
    }
}

fn lookup<'v>(context: &'v Value, path: &str) -> Option<&'v Value> {
    let mut parts = path.split('.');
    let mut current = context.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            other => other.get(part),
        }
        .unwrap_or(&NULL);
    }
    Some(current)
}

impl Evaluator for SimpleEvaluator {
    fn evaluate_template(&self, template: &str, context: &Value) -> Result<String, EvalError> {
        let out = REFERENCE.replace_all(template, |caps: &Captures| {
                               let Some(path) = caps.get(1) else {
                                   return "@".to_string();
                               };
                               match lookup(context, path.as_str()) {
                                   Some(value) => stringify(value),
                                   None => caps[0].to_string(),
                               }
                           });
        Ok(out.into_owned())
    }

    fn evaluate_test(&self,
                     test: &str,
                     operand: &str,
                     arguments: &[String],
                     _context: &Value)
                     -> Result<Option<String>, EvalError> {
        evaluate_case(test, operand, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> Value {
        json!({
            "contact": {"name": "Ryan Lewis", "first_name": "Ryan", "fields": {"age": "23"}},
            "results": {"color": {"value": "red", "category": "Red"}},
            "input": {"text": "hi there", "attachments": ["image:a.jpg"]},
            "child": null
        })
    }

    #[test]
    fn resolves_paths_inside_text() {
        let out = SimpleEvaluator.evaluate_template("Hi @contact.first_name, you said @input.text", &context())
                                 .unwrap();
        assert_eq!(out, "Hi Ryan, you said hi there");
    }

    #[test]
    fn objects_render_by_value_or_name() {
        let ev = SimpleEvaluator;
        assert_eq!(ev.evaluate_template("@results.color", &context()).unwrap(), "red");
        assert_eq!(ev.evaluate_template("@contact", &context()).unwrap(), "Ryan Lewis");
        assert_eq!(ev.evaluate_template("@input.attachments.0", &context()).unwrap(), "image:a.jpg");
    }

    #[test]
    fn unknown_roots_and_escapes_are_literal() {
        let ev = SimpleEvaluator;
        assert_eq!(ev.evaluate_template("mail bob@example.com", &context()).unwrap(), "mail bob@example.com");
        assert_eq!(ev.evaluate_template("@@contact", &context()).unwrap(), "@contact");
        assert_eq!(ev.evaluate_template("@contact.missing|@child.status|", &context()).unwrap(), "||");
    }
}
