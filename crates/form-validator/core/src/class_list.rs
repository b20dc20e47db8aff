//! Class list helpers
//!
//! Treat an element's class attribute as a list of tokens split on single
//! spaces. Writes join the non-empty tokens, each followed by one space.

use crate::dom::Element;

/// Returns the class tokens of `element`, empty if the attribute is unset
pub fn get_class_list<E: Element>(element: &E) -> Vec<String> {
    match element.class_name() {
        Some(class_name) => class_name.split(' ').map(str::to_string).collect(),
        None => Vec::new(),
    }
}

/// Rewrites the class attribute of `element` from `classes`
pub fn set_class_list<E: Element, S: AsRef<str>>(element: &E, classes: &[S]) {
    let class_name: String = classes
        .iter()
        .map(|class| class.as_ref())
        .filter(|class| !class.is_empty())
        .map(|class| format!("{} ", class))
        .collect();

    element.set_class_name(&class_name);
}

pub fn has_class<E: Element>(element: &E, name: &str) -> bool {
    get_class_list(element).iter().any(|class| class == name)
}

/// Removes every occurrence of `name` and commits the result
pub fn remove_class<E: Element>(element: &E, name: &str) {
    let mut classes = get_class_list(element);

    for i in (0..classes.len()).rev() {
        if classes[i] == name {
            classes.remove(i);
        }
    }

    set_class_list(element, &classes);
}

/// Appends `name` unless it is already present
pub fn add_class<E: Element>(element: &E, name: &str) {
    let mut classes = get_class_list(element);
    if classes.iter().any(|class| class == name) {
        return;
    }

    classes.push(name.to_string());
    set_class_list(element, &classes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryElement;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_class_list() {
        let element = MemoryElement::new("input");
        assert!(get_class_list(&element).is_empty());

        element.set_class_name("wide primary");
        assert_eq!(get_class_list(&element), vec!["wide", "primary"]);
    }

    #[test]
    fn test_set_class_list_skips_empty_tokens() {
        let element = MemoryElement::new("input");
        set_class_list(&element, &["wide", "", "primary", ""]);
        assert_eq!(element.class_name().as_deref(), Some("wide primary "));
    }

    #[test]
    fn test_has_class_is_exact() {
        let element = MemoryElement::new("input");
        element.set_class_name("invalid wide");
        assert!(has_class(&element, "invalid"));
        assert!(!has_class(&element, "valid"));
    }

    #[test]
    fn test_remove_class_removes_all_occurrences() {
        let element = MemoryElement::new("input");
        element.set_class_name("valid wide valid valid");
        remove_class(&element, "valid");
        assert_eq!(get_class_list(&element), vec!["wide", ""]);
        assert!(!has_class(&element, "valid"));
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let element = MemoryElement::new("input");
        add_class(&element, "valid");
        add_class(&element, "valid");
        assert_eq!(element.class_name().as_deref(), Some("valid "));
    }

    #[test]
    fn test_add_then_remove_restores_order() {
        let element = MemoryElement::new("input");
        element.set_class_name("a b c");
        add_class(&element, "valid");
        remove_class(&element, "valid");

        let classes: Vec<String> = get_class_list(&element)
            .into_iter()
            .filter(|class| !class.is_empty())
            .collect();
        assert_eq!(classes, vec!["a", "b", "c"]);
    }
}
