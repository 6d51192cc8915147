// Tue Jan 13 2026 - Alex

use cpp_demangle::{DemangleOptions, Symbol};

/// Demangles an Itanium C++ ABI symbol, `None` when it does not parse.
pub fn demangle(name: &str) -> Option<String> {
    if !is_mangled(name) {
        return None;
    }
    let mangled = name.strip_prefix('_').filter(|rest| rest.starts_with("_Z")).unwrap_or(name);
    let symbol = Symbol::new(mangled).ok()?;
    symbol
        .demangle(&DemangleOptions::default())
        .ok()
        .filter(|text| !text.is_empty())
}

pub fn is_mangled(name: &str) -> bool {
    name.starts_with("_Z") || name.starts_with("__Z")
}

pub fn try_demangle(name: &str) -> String {
    demangle(name).unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demangle_class_names() {
        assert_eq!(demangle("_ZN3app5ErrorE").as_deref(), Some("app::Error"));
        assert_eq!(demangle("_ZSt9exception").as_deref(), Some("std::exception"));
        assert_eq!(demangle("_Z1A").as_deref(), Some("A"));
    }

    #[test]
    fn test_demangle_vtable_and_double_underscore() {
        let vtable = demangle("_ZTV1A").unwrap();
        assert!(vtable.contains('A'));
        assert_eq!(demangle("__ZTV1A"), Some(vtable));
        assert!(demangle("_ZTVN3app5ErrorE").is_some());
    }

    #[test]
    fn test_demangle_rejects_garbage() {
        assert_eq!(demangle("main"), None);
        assert_eq!(demangle("_Z!!not a symbol"), None);
        assert_eq!(try_demangle("plain"), "plain");
    }
}
