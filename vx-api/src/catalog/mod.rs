//! Static registry of every operation, grouped by protocol namespace

pub mod book;
pub mod cc;
pub mod line;
pub mod log;
pub mod studio;

use crate::model::OperationSpec;

/// The protocol namespaces that carry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Cc,
    Studio,
    StudioLine,
    StudioBook,
    StudioLog,
}

impl Namespace {
    pub const ALL: [Namespace; 5] = [
        Namespace::Cc,
        Namespace::Studio,
        Namespace::StudioLine,
        Namespace::StudioBook,
        Namespace::StudioLog,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Namespace::Cc => "cc",
            Namespace::Studio => "studio",
            Namespace::StudioLine => "studio.line",
            Namespace::StudioBook => "studio.book",
            Namespace::StudioLog => "studio.log",
        }
    }

    pub fn operations(&self) -> &'static [&'static OperationSpec] {
        match self {
            Namespace::Cc => cc::OPERATIONS,
            Namespace::Studio => studio::OPERATIONS,
            Namespace::StudioLine => line::OPERATIONS,
            Namespace::StudioBook => book::OPERATIONS,
            Namespace::StudioLog => log::OPERATIONS,
        }
    }
}

/// Every operation in namespace order
pub fn all() -> impl Iterator<Item = &'static OperationSpec> {
    Namespace::ALL.into_iter().flat_map(|ns| ns.operations().iter().copied())
}

/// Find an operation by method name
pub fn lookup(method: &str) -> Option<&'static OperationSpec> {
    all().find(|spec| spec.method == method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_entry_is_well_formed() {
        for spec in all() {
            assert_eq!(spec.validate(), Ok(()), "{}", spec.method);
        }
    }

    #[test]
    fn test_method_names_are_unique() {
        let names: Vec<&str> = all().map(|spec| spec.method).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), 36);
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_entries_live_in_their_namespace() {
        for ns in Namespace::ALL {
            for spec in ns.operations() {
                assert_eq!(spec.namespace, ns.name(), "{}", spec.method);
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("get_line").map(|s| s.verb), Some("get"));
        assert_eq!(lookup("delete_record").map(|s| s.verb), Some("del"));
        assert!(lookup("getLine").is_none());
    }
}
