//! Compile-time queries over explicitly registered method signatures.
//!
//! A type lists the methods it offers through [`DeclaredMethods`]. Each
//! declaration names the method, the [`MethodForm`] its leading parameters
//! match, and how many parameters follow that fixed prefix. The two `const fn`
//! predicates can then be evaluated in `const` contexts to select an
//! implementation at compile time.
//!
//! Names spelled with explicit type arguments, such as `"fit<Matrix>"`, are
//! distinct from the bare name and denote that instantiation only.

use std::marker::PhantomData;

/// Marker for a family of signatures sharing a fixed parameter prefix.
pub trait MethodForm {
    const NAME: &'static str;
}

/// One registered method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: &'static str,
    pub form: &'static str,
    /// Parameters following the form's fixed prefix.
    pub additional_args: usize,
}

impl MethodDecl {
    pub const fn new<F: MethodForm>(name: &'static str, additional_args: usize) -> Self {
        Self {
            name,
            form: F::NAME,
            additional_args,
        }
    }
}

/// Registration interface: the methods a type declares.
pub trait DeclaredMethods {
    const METHODS: &'static [MethodDecl];
}

const fn str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn find<C: DeclaredMethods, F: MethodForm>(name: &str, additional_args: Option<usize>) -> bool {
    let methods = C::METHODS;
    let mut i = 0;
    while i < methods.len() {
        let m = &methods[i];
        if str_eq(m.name, name) && str_eq(m.form, F::NAME) {
            match additional_args {
                None => return true,
                Some(n) if n == m.additional_args => return true,
                _ => {}
            }
        }
        i += 1;
    }
    false
}

/// Whether `C` declares a method `name` of form `F` with any number of additional arguments.
pub const fn has_method_form<C: DeclaredMethods, F: MethodForm>(name: &str) -> bool {
    find::<C, F>(name, None)
}

/// Whether `C` declares a method `name` of form `F` with exactly `n` additional arguments.
pub const fn has_method_form_with_n_additional_args<C: DeclaredMethods, F: MethodForm>(
    name: &str,
    n: usize,
) -> bool {
    find::<C, F>(name, Some(n))
}

/// Type-level handle for a (type, form) pair, for use in generic code.
pub struct HasMethodForm<C, F>(PhantomData<fn() -> (C, F)>);

impl<C: DeclaredMethods, F: MethodForm> HasMethodForm<C, F> {
    pub const fn value(name: &str) -> bool {
        has_method_form::<C, F>(name)
    }

    pub const fn with_n_additional_args(name: &str, n: usize) -> bool {
        has_method_form_with_n_additional_args::<C, F>(name, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Build;
    impl MethodForm for Build {
        const NAME: &'static str = "(&Table, usize, ..)";
    }

    struct Other;
    impl MethodForm for Other {
        const NAME: &'static str = "(&[f64], ..)";
    }

    struct Indexer;
    impl DeclaredMethods for Indexer {
        const METHODS: &'static [MethodDecl] = &[
            MethodDecl::new::<Build>("index", 0),
            MethodDecl::new::<Build>("index<Kd>", 1),
        ];
    }

    const _: () = assert!(has_method_form::<Indexer, Build>("index"));
    const _: () = assert!(!has_method_form::<Indexer, Other>("index"));

    #[test]
    fn test_registered_forms() {
        assert!(HasMethodForm::<Indexer, Build>::value("index<Kd>"));
        assert!(HasMethodForm::<Indexer, Build>::with_n_additional_args("index", 0));
        assert!(!HasMethodForm::<Indexer, Build>::with_n_additional_args("index", 1));
        assert!(!HasMethodForm::<Indexer, Build>::value("ind"));
    }
}
