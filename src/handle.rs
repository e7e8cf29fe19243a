//! Reference-counted handles to cached resources.
//!
//! A [`Handle`] keeps its resource alive: while at least one handle to a name
//! exists, the resource stays loaded (unless a bulk operation unloads it). When
//! the last handle is dropped the resource is handed to the registry's unload
//! callback.

use std::ops::Deref ;
use std::sync::Arc ;
use parking_lot::MappedRwLockReadGuard ;

use crate::{ AccessError, Status };
use crate::slot::Slot ;



/// A reference to a named resource in a [`Registry`]( crate::Registry ).
///
/// Handles are obtained from [`Registry::get`]( crate::Registry::get ). Cloning a
/// handle adds a reference; dropping one removes it. Moving a handle transfers its
/// reference without touching the count.
///
/// A handle may be bound to a resource that is not loaded yet (its load request is
/// still in flight, or the loader never delivered it). Check [`Handle::good`] or use
/// [`Handle::read`], which fails instead of exposing a missing resource.
///
/// A default-constructed handle is empty: it refers to nothing and is never good.
pub struct Handle<T: ?Sized> {
    slot: Option<Arc<Slot<T>>>,
}

impl<T: ?Sized> Handle<T> {

    /// Binds a new handle to `slot`, returning the status observed while attaching.
    pub(crate) fn attach( slot: Arc<Slot<T>> ) -> ( Self, Status ) {
        let status = slot.attach();
        ( Self { slot: Some( slot )}, status )
    }

    /// Returns whether the resource under this handle is loaded and ready to read.
    #[inline] pub fn good( &self ) -> bool { self.status() == Status::Loaded }

    /// Current status of the resource, [`Status::Unloaded`] for an empty handle.
    #[inline] pub fn status( &self ) -> Status {
        self.slot.as_ref().map_or( Status::Unloaded, | slot | slot.status() )
    }

    /// Name of the resource this handle refers to.
    #[inline] pub fn name( &self ) -> Option<&str> { self.slot.as_deref().map( Slot::name )}

    /// Whether this handle was default-constructed.
    #[inline] pub fn is_empty( &self ) -> bool { self.slot.is_none() }

    /// Number of live handles referring to the same resource, this one included.
    ///
    /// Zero for an empty handle.
    #[inline] pub fn ref_count( &self ) -> usize { self.slot.as_ref().map_or( 0, | slot | slot.ref_count() )}

    /// Whether both handles refer to the same resource slot.
    ///
    /// Two empty handles are considered equal.
    pub fn ptr_eq( &self, other: &Self ) -> bool {
        match ( &self.slot, &other.slot ) {
            ( Some( this ), Some( other )) => Arc::ptr_eq( this, other ),
            ( None, None ) => true,
            _ => false,
        }
    }

    /// Reads the resource.
    ///
    /// The returned guard keeps the resource in place: while it is alive, bulk
    /// operations and [`Registry::register`]( crate::Registry::register ) on the
    /// same name block. Do not call either from the thread holding the guard.
    ///
    /// # Errors
    /// Returns [`AccessError::EmptyHandle`] for a default-constructed handle and
    /// [`AccessError::NotLoaded`] if the resource is not currently loaded.
    pub fn read( &self ) -> Result<ResourceRef<'_, T>, AccessError> {
        let slot = self.slot.as_deref().ok_or( AccessError::EmptyHandle )?;
        slot.read()
            .map( ResourceRef )
            .ok_or_else(|| AccessError::NotLoaded( slot.name().to_string() ))
    }

}

impl<T: ?Sized> Default for Handle<T> {
    fn default() -> Self { Self { slot: None }}
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone( &self ) -> Self {
        match &self.slot {
            Some( slot ) => Self::attach( Arc::clone( slot )).0,
            None => Self::default(),
        }
    }
}

impl<T: ?Sized> Drop for Handle<T> {
    fn drop( &mut self ) {
        if let Some( slot ) = self.slot.take() { slot.detach() }
    }
}

impl<T: ?Sized> PartialEq for Handle<T> {
    fn eq( &self, other: &Self ) -> bool { self.ptr_eq( other )}
}
impl<T: ?Sized> Eq for Handle<T> {}

impl<T: ?Sized> std::fmt::Debug for Handle<T> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "Handle" )
            .field( "name", &self.name() )
            .field( "status", &self.status() )
            .field( "ref_count", &self.ref_count() )
            .finish()
    }
}

/// Read access to a loaded resource, obtained from [`Handle::read`].
pub struct ResourceRef<'a, T: ?Sized>( MappedRwLockReadGuard<'a, T> );

impl<T: ?Sized> Deref for ResourceRef<'_, T> {
    type Target = T ;
    #[inline] fn deref( &self ) -> &T { &self.0 }
}

impl<T: ?Sized + std::fmt::Debug> std::fmt::Debug for ResourceRef<'_, T> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        std::fmt::Debug::fmt( &**self, f )
    }
}

impl<T: ?Sized + std::fmt::Display> std::fmt::Display for ResourceRef<'_, T> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        std::fmt::Display::fmt( &**self, f )
    }
}
