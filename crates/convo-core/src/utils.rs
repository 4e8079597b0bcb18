//! Utilidades de texto usadas al guardar resultados.

/// Normaliza un nombre a clave: minúsculas, separadores a `_`, sin `_`
/// repetidos ni en los extremos. `"Favorite Color"` -> `"favorite_color"`.
pub fn snakify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Trunca a `max` caracteres añadiendo `...` cuando corta.
pub fn truncate_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Favorite Color", "favorite_color")]
    #[case("  Age (years) ", "age_years")]
    #[case("already_snake", "already_snake")]
    #[case("Año--Nuevo", "año_nuevo")]
    #[case("", "")]
    fn snakify_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snakify(input), expected);
    }

    #[test]
    fn truncate_only_when_needed() {
        assert_eq!(truncate_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_ellipsis("hello world", 8), "hello...");
        assert_eq!(truncate_ellipsis("hello", 2), "he");
    }
}
