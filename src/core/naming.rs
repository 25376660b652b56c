//! MW-002: Identifier case normalization and type namespacing.
//!
//! Type names are CamelCase, member names are lowerCamelCase. Namespacing
//! prefixes a module-local type with the module's final name so two modules
//! can both declare a `Config` without colliding in the merged schema.

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.' | ' ' | '/')
}

/// Split an identifier into words on separators and lower→upper boundaries.
///
/// A run of capitals stays one word (`HTTPServer` → `HTTP`, `Server`).
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.collect();
            let rest = if rest.chars().all(|c| !c.is_ascii_lowercase()) {
                rest.to_ascii_lowercase()
            } else {
                rest
            };
            format!("{}{}", first.to_ascii_uppercase(), rest)
        }
        None => String::new(),
    }
}

/// Convert to CamelCase: `my_module` → `MyModule`, `ID` → `Id`.
///
/// Already-CamelCase input is returned unchanged.
pub fn to_camel(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert to lowerCamelCase: `Hello` → `hello`, `ID` → `id`, `with_name` → `withName`.
pub fn to_lower_camel(s: &str) -> String {
    let camel = to_camel(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => String::new(),
    }
}

/// The schema-visible name of a field or function.
pub fn field_name(name: &str) -> String {
    to_lower_camel(name)
}

/// Compute the namespaced name of a module-local object, interface, or enum.
///
/// If the type's original name already starts with the module's original
/// name, the remainder is attached to the final module name; a type named
/// exactly like its module becomes the module's main type.
pub fn namespace_object(
    obj_original_name: &str,
    mod_final_name: &str,
    mod_original_name: &str,
) -> String {
    let obj = to_camel(obj_original_name);
    let mod_original = to_camel(mod_original_name);
    let mod_final = to_camel(mod_final_name);

    if let Some(rest) = obj.strip_prefix(mod_original.as_str()) {
        if rest.is_empty() {
            return mod_final;
        }
        return format!("{}{}", mod_final, rest);
    }
    format!("{}{}", mod_final, obj)
}
