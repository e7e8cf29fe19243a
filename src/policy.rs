//! Registry behavior switches, set through [`RegistryBuilder`]( crate::RegistryBuilder ).

/// Decides when [`Registry::get`]( crate::Registry::get ) issues a load request.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum RequestPolicy {
    /// Every lookup that finds the resource unloaded issues a request.
    ///
    /// Concurrent lookups of the same unloaded name each issue one, and a loader
    /// that never registers the resource is asked again on every lookup. The
    /// request callback must tolerate duplicate and concurrent requests.
    /// [`Status::WaitingLoad`]( crate::Status::WaitingLoad ) is never assigned.
    #[default] Always,
    /// Only the first lookup of an unloaded name issues a request.
    ///
    /// The slot moves to [`Status::WaitingLoad`]( crate::Status::WaitingLoad ) until
    /// the resource is registered. Lookups in the meantime attach without asking the
    /// loader again. A loader that gives up must call
    /// [`Registry::cancel_request`]( crate::Registry::cancel_request ), otherwise the
    /// name stays pending forever.
    Deduplicate,
}

/// Decides what happens to a loaded resource when the same name is registered again.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum OverwritePolicy {
    /// The replaced resource is handed to the unload callback.
    #[default] Unload,
    /// The replaced resource is dropped without the unload callback seeing it.
    ///
    /// Resources whose unload callback releases something beyond their own memory
    /// leak that something.
    Discard,
}

impl std::fmt::Display for RequestPolicy {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

impl std::fmt::Display for OverwritePolicy {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}
