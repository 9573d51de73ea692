//! Lightweight scanning of declared-type text.
//!
//! No language grammar is involved: the scanner extracts bare type names from
//! text such as `Map<string, Order[]>` or `List[Customer]` and records
//! whether each name sits inside a collection wrapper or carries an array
//! suffix.

/// Outer types whose arguments are collections of the wrapped type.
const COLLECTION_WRAPPERS: &[&str] = &[
    "Array",
    "ArrayList",
    "BTreeMap",
    "BTreeSet",
    "Collection",
    "Deque",
    "Dictionary",
    "HashMap",
    "HashSet",
    "ICollection",
    "IEnumerable",
    "IList",
    "Iterable",
    "Iterator",
    "LinkedList",
    "List",
    "Map",
    "Queue",
    "ReadonlyArray",
    "ReadonlyMap",
    "ReadonlySet",
    "Record",
    "Seq",
    "Sequence",
    "Set",
    "SortedSet",
    "Stack",
    "TreeMap",
    "TreeSet",
    "Vec",
    "VecDeque",
    "dict",
    "frozenset",
    "list",
    "set",
    "tuple",
];

/// A bare type name found in declared-type text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TypeName<'t> {
    pub(super) name: &'t str,
    pub(super) in_collection: bool,
}

/// Returns true if `name` is a known collection wrapper type.
pub(super) fn is_collection_wrapper(name: &str) -> bool {
    COLLECTION_WRAPPERS.contains(&name)
}

/// Extracts every bare type name from `text`, outermost first.
///
/// Qualified paths (`models.Order`, `crate::Order`) collapse to their last
/// segment. A collection wrapper directly followed by type arguments is not
/// reported itself.
///
/// ```text
/// "Order"                  -> Order
/// "Order[]"                -> Order (collection)
/// "Map<string, Order>"     -> string (collection), Order (collection)
/// "Promise<Order>"         -> Promise, Order
/// "Optional[List[Item]]"   -> Optional, Item (collection)
/// ```
pub(super) fn type_names(text: &str) -> Vec<TypeName<'_>> {
    let bytes = text.as_bytes();
    let mut names: Vec<TypeName<'_>> = Vec::new();
    // One entry per open `<`/`[`: whether the arguments are collection elements.
    let mut contexts: Vec<bool> = Vec::new();
    let mut last_ident: Option<&str> = None;
    let mut qualified = false;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if is_ident_start(c) {
            let start = i;
            while i < bytes.len() && is_ident_continue(bytes[i]) {
                i += 1;
            }
            let ident = &text[start..i];
            if is_label(bytes, i) {
                // Parameter name or object-literal key, not a type.
                qualified = false;
                last_ident = None;
                continue;
            }
            let in_context = contexts.last().copied().unwrap_or(false);
            let array_suffix = has_array_suffix(bytes, i);

            if qualified && !names.is_empty() {
                // `a.b` or `a::b`: the new segment replaces the qualifier.
                if let Some(previous) = names.last_mut() {
                    previous.name = ident;
                    previous.in_collection |= array_suffix;
                }
            } else {
                names.push(TypeName {
                    name: ident,
                    in_collection: in_context || array_suffix,
                });
            }
            last_ident = Some(ident);
            qualified = false;
            continue;
        }

        match c {
            b'.' => qualified = true,
            b':' if bytes.get(i + 1) == Some(&b':') => {
                qualified = true;
                i += 1;
            }
            b'<' | b'[' => {
                if c == b'[' && next_non_space(bytes, i + 1) == Some(b']') {
                    // Array suffix, already accounted for by the preceding name.
                    i = skip_to_close(bytes, i + 1);
                } else {
                    let wrapper = last_ident.is_some_and(is_collection_wrapper);
                    if wrapper && names.last().map(|n| Some(n.name)) == Some(last_ident) {
                        names.pop();
                    }
                    let outer = contexts.last().copied().unwrap_or(false);
                    contexts.push(outer || wrapper);
                }
                qualified = false;
                last_ident = None;
            }
            b'>' | b']' => {
                // `=>` and `->` belong to function types, not type arguments.
                let arrow = c == b'>' && i > 0 && matches!(bytes[i - 1], b'=' | b'-');
                if !arrow {
                    contexts.pop();
                }
                qualified = false;
                last_ident = None;
            }
            _ => {
                if !c.is_ascii_whitespace() {
                    qualified = false;
                    last_ident = None;
                }
            }
        }
        i += 1;
    }

    names
}

/// Returns the bare name of a supertype reference such as `ns.Base<T>`.
pub(super) fn base_name(text: &str) -> Option<&str> {
    type_names(text).first().map(|type_name| type_name.name)
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$' || !c.is_ascii()
}

fn is_ident_continue(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn next_non_space(bytes: &[u8], from: usize) -> Option<u8> {
    bytes[from.min(bytes.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_ascii_whitespace())
}

/// Checks whether the identifier ending at `end` is followed by `:` or `?:`,
/// as parameter names and object keys are. A `::` path separator is not a
/// label marker.
fn is_label(bytes: &[u8], end: usize) -> bool {
    let mut i = end;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) == Some(&b'?') {
        i += 1;
    }
    bytes.get(i) == Some(&b':') && bytes.get(i + 1) != Some(&b':')
}

/// Returns the index of the `]` that closes an empty `[ ]` pair starting at `from`.
fn skip_to_close(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && bytes[i] != b']' {
        i += 1;
    }
    i
}

/// Checks for one or more `[]` right after an identifier ending at `end`.
fn has_array_suffix(bytes: &[u8], end: usize) -> bool {
    let mut i = end;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    bytes.get(i) == Some(&b'[') && next_non_space(bytes, i + 1) == Some(b']')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<(&str, bool)> {
        type_names(text)
            .into_iter()
            .map(|t| (t.name, t.in_collection))
            .collect()
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(names("Order"), [("Order", false)]);
        assert_eq!(names("  Order  "), [("Order", false)]);
    }

    #[test]
    fn test_array_suffix() {
        assert_eq!(names("Order[]"), [("Order", true)]);
        assert_eq!(names("Order[][]"), [("Order", true)]);
        assert_eq!(names("Order [ ]"), [("Order", true)]);
    }

    #[test]
    fn test_collection_wrappers() {
        assert_eq!(names("Array<Order>"), [("Order", true)]);
        assert_eq!(names("List[Order]"), [("Order", true)]);
        assert_eq!(
            names("Map<string, Customer>"),
            [("string", true), ("Customer", true)]
        );
    }

    #[test]
    fn test_non_collection_generic() {
        assert_eq!(names("Promise<Order>"), [("Promise", false), ("Order", false)]);
        assert_eq!(
            names("Optional[List[Item]]"),
            [("Optional", false), ("Item", true)]
        );
        assert_eq!(names("Promise<Order[]>"), [("Promise", false), ("Order", true)]);
    }

    #[test]
    fn test_qualified_paths() {
        assert_eq!(names("models.Order"), [("Order", false)]);
        assert_eq!(names("crate::model::Order"), [("Order", false)]);
        assert_eq!(names("Vec<crate::Order>"), [("Order", true)]);
    }

    #[test]
    fn test_unions_and_function_types() {
        assert_eq!(names("Order | null"), [("Order", false), ("null", false)]);
        assert_eq!(
            names("(o: Order) => Invoice"),
            [("Order", false), ("Invoice", false)]
        );
    }

    #[test]
    fn test_labels_are_not_types() {
        assert_eq!(
            names("{ customer: Customer; lines?: OrderLine[] }"),
            [("Customer", false), ("OrderLine", true)]
        );
        assert_eq!(
            names("(order : Order, note?: string) => void"),
            [("Order", false), ("string", false), ("void", false)]
        );
        assert_eq!(names("crate::Order"), [("Order", false)]);
    }

    #[test]
    fn test_empty_and_symbols() {
        assert!(names("").is_empty());
        assert!(names("[]").is_empty());
        assert!(names("() => void").len() == 1);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("Base<T>"), Some("Base"));
        assert_eq!(base_name("ns.Base"), Some("Base"));
        assert_eq!(base_name(""), None);
    }
}
