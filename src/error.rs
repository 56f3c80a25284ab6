/// Errors returned by the library's fallible operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A type-erased value did not fit the slot it was meant for.
    /// The value is dropped and the slot keeps its previous contents.
    #[error("type-erased value does not fit a slot of type `{expected}`")]
    SlotType { expected: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
