#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UnownedError {
    #[error("unowned reference to {type_name} read after it was deallocated")]
    Deallocated { type_name: &'static str },
}
