use thiserror::Error ;



/// Errors that occur when reading the resource behind a [`Handle`]( crate::Handle ).
///
/// Reading is only meaningful once [`Handle::good`]( crate::Handle::good ) reports
/// `true`. These errors describe why it did not.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum AccessError {
    /// The handle was default-constructed and is not bound to any resource.
    #[error( "Empty Handle" )] EmptyHandle,
    /// The named resource is not loaded, either because its load request has not
    /// completed yet or because it has since been unloaded.
    #[error( "Resource Not Loaded: {0}" )] NotLoaded( String ),
}
