use std::sync::Arc ;
use parking_lot::{ MappedRwLockReadGuard, ReentrantMutex, RwLock, RwLockReadGuard };
use tracing::debug ;

use crate::state::{ SlotState, Status };



pub(crate) type UnloadFn<T> = dyn Fn( Box<T> ) + Send + Sync ;

/// Per-name shared record: status, live-handle count and the owned resource.
///
/// A slot is created on first use of its name and lives as long as its
/// registry or any handle bound to it. Transitions into and out of
/// [`Status::Loaded`] only happen while `object` is write-locked, which keeps
/// `object.is_some()` equivalent to the loaded status.
///
/// Unload callbacks for one slot never overlap: `unloading` is held for the
/// duration of each call. It is reentrant so a callback may drop a handle to
/// the same slot and trigger a nested unload on its own thread.
pub(crate) struct Slot<T: ?Sized> {
    name: Arc<str>,
    state: SlotState,
    object: RwLock<Option<Box<T>>>,
    unloading: ReentrantMutex<()>,
    unload: Arc<UnloadFn<T>>,
}

impl<T: ?Sized> Slot<T> {

    pub fn new( name: Arc<str>, unload: Arc<UnloadFn<T>> ) -> Self {
        Self { name, state: SlotState::default(), object: RwLock::new( None ), unloading: ReentrantMutex::new(()), unload }
    }

    #[inline] pub fn name( &self ) -> &str { &self.name }
    #[inline] pub fn status( &self ) -> Status { self.state.load().status() }
    #[inline] pub fn ref_count( &self ) -> usize { self.state.load().refs() }

    /// Adds a live handle and reports the status it was attached under.
    #[inline] pub fn attach( &self ) -> Status { self.state.acquire().status() }

    /// Removes a live handle, unloading the resource if it was the last one.
    pub fn detach( &self ) {

        // Most releases cannot unload and never touch the object lock.
        if self.state.update(| word | ( !word.releases_load() ).then(|| word.released() )).is_ok() { return }

        let mut object = self.object.write();
        let previous = self.state
            .update(| word | Some( word.released() ))
            .unwrap_or_else(| word | word );
        if !previous.releases_load() { return }

        let resource = object.take();
        drop( object );
        if let Some( resource ) = resource { self.hand_to_unload( resource ) }

    }

    /// Stores `resource` and marks the slot loaded, returning whatever it held before.
    pub fn install( &self, resource: Box<T> ) -> Option<Box<T>> {
        let mut object = self.object.write();
        let previous = object.replace( resource );
        self.state.set_status( Status::Loaded );
        previous
    }

    /// Unloads a loaded resource regardless of live handles.
    ///
    /// Returns `false` if the slot was not loaded.
    pub fn unload( &self ) -> bool {
        let mut object = self.object.write();
        if !self.state.transition( Status::Loaded, Status::Unloaded ) { return false }
        let resource = object.take();
        drop( object );
        if let Some( resource ) = resource { self.hand_to_unload( resource ) }
        true
    }

    /// Claims the right to issue a load request for this slot.
    #[inline] pub fn begin_request( &self ) -> bool { self.state.transition( Status::Unloaded, Status::WaitingLoad )}

    /// Abandons an in-flight load request so the next lookup issues a new one.
    #[inline] pub fn cancel_request( &self ) -> bool { self.state.transition( Status::WaitingLoad, Status::Unloaded )}

    /// Read access to the loaded resource, or `None` if nothing is loaded.
    ///
    /// Uses a recursive read lock so a thread may hold several guards on the
    /// same slot while a writer is queued.
    pub fn read( &self ) -> Option<MappedRwLockReadGuard<'_, T>> {
        RwLockReadGuard::try_map( self.object.read_recursive(), | object | object.as_deref() ).ok()
    }

    /// Passes `resource` to the unload callback, one call at a time per slot.
    pub fn hand_to_unload( &self, resource: Box<T> ) {
        let _unloading = self.unloading.lock();
        debug!( resource = %self.name, "unloading resource" );
        ( self.unload )( resource );
    }

    #[cfg( test )]
    pub(crate) fn word( &self ) -> crate::state::Word { self.state.load() }

}

impl<T: ?Sized> Drop for Slot<T> {
    fn drop( &mut self ) {
        if let Some( resource ) = self.object.get_mut().take() { self.hand_to_unload( resource ) }
    }
}

impl<T: ?Sized> std::fmt::Debug for Slot<T> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        let word = self.state.load();
        f.debug_struct( "Slot" )
            .field( "name", &self.name )
            .field( "status", &word.status() )
            .field( "refs", &word.refs() )
            .field( "unload", &"<closure>" )
            .finish_non_exhaustive()
    }
}

#[cfg( test )]
mod tests {
    use std::sync::atomic::{ AtomicUsize, Ordering };
    use crate::state::Word ;
    use super::*;

    fn counted_slot( unloads: &Arc<AtomicUsize> ) -> Slot<u32> {
        let unloads = Arc::clone( unloads );
        Slot::new( "slot".into(), Arc::new( move | _: Box<u32> | { unloads.fetch_add( 1, Ordering::SeqCst ); }))
    }

    #[test]
    fn install_then_last_detach_unloads_once() {
        let unloads = Arc::new( AtomicUsize::new( 0 ));
        let slot = counted_slot( &unloads );
        assert_eq!( slot.attach(), Status::Unloaded );
        assert!( slot.install( Box::new( 7 )).is_none() );
        assert_eq!( slot.attach(), Status::Loaded );
        slot.detach();
        assert_eq!( unloads.load( Ordering::SeqCst ), 0 );
        slot.detach();
        assert_eq!( unloads.load( Ordering::SeqCst ), 1 );
        assert_eq!( slot.word(), Word::new( Status::Unloaded, 0 ));
        assert!( slot.read().is_none() );
    }

    #[test]
    fn unload_keeps_refcount() {
        let unloads = Arc::new( AtomicUsize::new( 0 ));
        let slot = counted_slot( &unloads );
        slot.attach();
        slot.install( Box::new( 1 ));
        assert!( slot.unload() );
        assert!( !slot.unload() );
        assert_eq!( slot.word(), Word::new( Status::Unloaded, 1 ));
        slot.detach();
        assert_eq!( unloads.load( Ordering::SeqCst ), 1 );
    }

    #[test]
    fn dropping_a_loaded_slot_unloads_it() {
        let unloads = Arc::new( AtomicUsize::new( 0 ));
        let slot = counted_slot( &unloads );
        slot.install( Box::new( 1 ));
        drop( slot );
        assert_eq!( unloads.load( Ordering::SeqCst ), 1 );
    }
}
