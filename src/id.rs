//! Code for handling IDs
use anyhow::{Result, ensure};
use indexmap::IndexSet;

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(
            Clone, std::hash::Hash, PartialEq, Eq, serde::Deserialize, Debug, serde::Serialize,
        )]
        /// An ID type (e.g. `ProjectID`)
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }
        }
    };
}
pub(crate) use define_id_type;

/// Indicates that the struct has an ID field
pub trait HasID<ID> {
    /// Get the struct's ID
    fn get_id(&self) -> &ID;
}

/// Implement the `HasID` trait for the given type, assuming it has a field called `id`
macro_rules! define_id_getter {
    ($t:ty, $id_ty:ty) => {
        impl crate::id::HasID<$id_ty> for $t {
            fn get_id(&self) -> &$id_ty {
                &self.id
            }
        }
    };
}
pub(crate) use define_id_getter;

/// Find the item with the given ID in a slice
pub fn find_by_id<'a, T, ID>(items: &'a [T], id: &ID) -> Option<&'a T>
where
    T: HasID<ID>,
    ID: PartialEq,
{
    items.iter().find(|item| item.get_id() == id)
}

/// Check that no two items in the slice share an ID
pub fn check_ids_unique<T, ID>(items: &[T]) -> Result<()>
where
    T: HasID<ID>,
    ID: Eq + std::hash::Hash + std::fmt::Display,
{
    let mut seen = IndexSet::new();
    for item in items {
        let id = item.get_id();
        ensure!(seen.insert(id), "Duplicate ID found: {id}");
    }

    Ok(())
}
