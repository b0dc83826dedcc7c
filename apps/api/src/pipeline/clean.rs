//! Output normalisation.
//!
//! Models like to answer "Resultado: **Ore rombyai kuri**" followed by a
//! paragraph of explanation. Transformation answers are reduced to the bare
//! first line; question answers keep every line and only lose a leading
//! answer label.
//!
//! Both cleaners iterate a single shrinking step to a fixpoint, which makes
//! them idempotent: `clean(clean(x)) == clean(x)`.

use crate::prompting::TaskDescriptor;

/// Labels stripped from transformation output (compared lower-cased, followed by ':').
const TRANSFORM_LABELS: &[&str] = &[
    "oración transformada",
    "oración afirmativa",
    "oración negativa",
    "oración",
    "resultado",
    "respuesta",
    "salida",
    "afirmativa",
    "negativa",
    "pasado",
    "futuro",
    "transformación",
    "output",
    "answer",
    "result",
];

/// Labels stripped from the start of question answers.
const QUESTION_LABELS: &[&str] = &["respuesta", "r", "answer"];

const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('“', '”'), ('«', '»'), ('`', '`')];

pub fn clean_output(task: &TaskDescriptor, raw: &str) -> String {
    match task {
        TaskDescriptor::Transform(_) => clean_transformation(raw),
        TaskDescriptor::Question => clean_answer(raw),
    }
}

/// Single-sentence output: first non-empty line, no labels, no wrapping quotes.
pub fn clean_transformation(raw: &str) -> String {
    to_fixpoint(raw, |s| {
        let s = s.trim();
        let s = strip_label(s, TRANSFORM_LABELS).unwrap_or(s);
        let s = first_line(s);
        let s = strip_emphasis(s);
        strip_quotes(s)
    })
}

/// Multi-line answer: trimmed, leading answer label removed.
pub fn clean_answer(raw: &str) -> String {
    to_fixpoint(raw, |s| {
        let s = s.trim();
        strip_label(s, QUESTION_LABELS).unwrap_or(s)
    })
}

/// Applies `step` until the output stops changing. Every step returns a
/// substring of its input, so this terminates.
fn to_fixpoint<F>(raw: &str, step: F) -> String
where
    F: Fn(&str) -> &str,
{
    let mut current = raw;
    loop {
        let next = step(current);
        if next == current {
            return current.to_string();
        }
        current = next;
    }
}

fn first_line(s: &str) -> &str {
    s.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
}

/// `label:` / `**label:**` / `**label**:` prefix removal, case-insensitive.
fn strip_label<'a>(s: &'a str, labels: &[&str]) -> Option<&'a str> {
    let body = s.strip_prefix("**").unwrap_or(s);
    for label in labels {
        let n = label.chars().count();
        let head_len: usize = body.chars().take(n).map(char::len_utf8).sum();
        let head = &body[..head_len];
        if head.to_lowercase() != *label {
            continue;
        }
        let rest = body[head_len..].trim_start();
        let rest = rest.strip_prefix("**").unwrap_or(rest);
        if let Some(after) = rest.strip_prefix(':') {
            let after = after.strip_prefix("**").unwrap_or(after);
            return Some(after.trim_start());
        }
    }
    None
}

fn strip_emphasis(s: &str) -> &str {
    match s.strip_prefix("**").and_then(|t| t.strip_suffix("**")) {
        Some(inner) => inner.trim(),
        None => s,
    }
}

fn strip_quotes(s: &str) -> &str {
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = s.strip_prefix(*open).and_then(|t| t.strip_suffix(*close)) {
            return inner.trim();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "Ore rombyai kuri",
        "Resultado: Ore rombyai kuri",
        "**Resultado:** Ore rombyai kuri\n\nExplicación: se elimina nd- y -i.",
        "ORACIÓN AFIRMATIVA: \"Ore rombyai kuri\"",
        "  \n\nSalida: Respuesta: Ore rombyai kuri  \nmás texto",
        "Resultado:\nOre rombyai kuri",
        "“Che ajapo”",
        "Output: **Ha'e oho**",
        "",
        "   ",
        "Resultado:",
    ];

    #[test]
    fn test_strips_labels_and_keeps_first_line() {
        assert_eq!(clean_transformation("Resultado: Ore rombyai kuri"), "Ore rombyai kuri");
        assert_eq!(
            clean_transformation("**Resultado:** Ore rombyai kuri\n\nExplicación: ..."),
            "Ore rombyai kuri"
        );
        assert_eq!(
            clean_transformation("ORACIÓN AFIRMATIVA: \"Ore rombyai kuri\""),
            "Ore rombyai kuri"
        );
        assert_eq!(clean_transformation("Resultado:\nOre rombyai kuri"), "Ore rombyai kuri");
        assert_eq!(
            clean_transformation("Salida: Respuesta: Ore rombyai kuri\nmás"),
            "Ore rombyai kuri"
        );
        assert_eq!(clean_transformation("Output: **Ha'e oho**"), "Ha'e oho");
        assert_eq!(clean_transformation("“Che ajapo”"), "Che ajapo");
    }

    #[test]
    fn test_does_not_strip_words_that_merely_start_like_labels() {
        assert_eq!(clean_transformation("Salidas oho"), "Salidas oho");
        assert_eq!(clean_transformation("Respuestaite: x"), "Respuestaite: x");
    }

    #[test]
    fn test_transformation_clean_is_idempotent() {
        for raw in SAMPLES {
            let once = clean_transformation(raw);
            assert_eq!(clean_transformation(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_answer_keeps_multiple_lines() {
        let raw = "RESPUESTA: Los pronombres son:\n- che (yo)\n- nde (tú)\n";
        assert_eq!(clean_answer(raw), "Los pronombres son:\n- che (yo)\n- nde (tú)");
    }

    #[test]
    fn test_answer_clean_is_idempotent() {
        for raw in SAMPLES {
            let once = clean_answer(raw);
            assert_eq!(clean_answer(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_empty_label_only_yields_empty() {
        assert_eq!(clean_transformation("Resultado:"), "");
    }
}
