//! The name-keyed registry and its load/unload orchestration.
//!
//! A [`Registry`] maps names to slots. Slots are created on first use and are
//! never removed, so a handle's slot stays valid for as long as the handle does.
//! The registry's mutex only guards the map itself: it is held while a slot is
//! found or created and released before any callback runs, except during the
//! unload phase of the bulk operations.

use std::collections::HashMap ;
use std::sync::Arc ;
use itertools::Itertools ;
use parking_lot::Mutex ;
use pipe_trait::Pipe ;
use tracing::{ debug, trace };

use crate::{ Handle, OverwritePolicy, RequestPolicy, Status };
use crate::slot::{ Slot, UnloadFn };



type RequestFn<T> = dyn Fn( &str, &Registry<T> ) + Send + Sync ;
type SlotMap<T> = HashMap<Arc<str>, Arc<Slot<T>>> ;

/// A thread-safe cache of named resources of type `T`.
///
/// Loading and unloading are delegated to two callbacks fixed at construction:
///
/// - the **request callback** `( name, registry )` is invoked when a resource is
/// 	looked up but not loaded. It is expected to eventually call
/// 	[`Registry::register`], synchronously or later from any thread. It may
/// 	call back into the registry.
/// - the **unload callback** `( resource )` receives ownership of a resource
/// 	once it is no longer loaded: when its last handle drops, when a bulk
/// 	operation unloads it, or when it is replaced (see [`OverwritePolicy`]).
/// 	Under the default [`OverwritePolicy::Unload`] it is invoked exactly once per
/// 	registered resource. Calls for the same name never overlap.
///
/// `Registry` is a handle type: cloning it creates another reference to the same
/// underlying registry rather than duplicating it.
///
/// # Example
///
/// ```
/// use rescache::Registry ;
///
/// let registry = Registry::<String>::new(
/// 	| name, registry | registry.register( name, format!( "contents of {}", name )),
/// 	| resource | drop( resource ),
/// );
///
/// let handle = registry.get( "readme" );
/// assert!( handle.good() );
/// assert_eq!( *handle.read()?, "contents of readme" );
/// # Ok::<(), rescache::AccessError>(())
/// ```
pub struct Registry<T: ?Sized> {
    inner: Arc<Shared<T>>,
}

struct Shared<T: ?Sized> {
    slots: Mutex<SlotMap<T>>,
    request: Box<RequestFn<T>>,
    unload: Arc<UnloadFn<T>>,
    request_policy: RequestPolicy,
    overwrite_policy: OverwritePolicy,
}

impl<T: ?Sized> Registry<T> {

    /// Creates a registry with the default [`RequestPolicy`] and [`OverwritePolicy`].
    pub fn new(
        request: impl Fn( &str, &Registry<T> ) + Send + Sync + 'static,
        unload: impl Fn( Box<T> ) + Send + Sync + 'static,
    ) -> Self {
        Self::builder( request, unload ).build()
    }

    /// Starts configuring a registry.
    ///
    /// ```
    /// use rescache::{ Registry, RequestPolicy, OverwritePolicy, Status };
    ///
    /// let registry = Registry::<u32>::builder(| _name, _registry | { /* load asynchronously */ }, drop )
    /// 	.with_request_policy( RequestPolicy::Deduplicate )
    /// 	.with_overwrite_policy( OverwritePolicy::Discard )
    /// 	.build();
    ///
    /// let handle = registry.get( "pending" );
    /// assert_eq!( handle.status(), Status::WaitingLoad );
    /// ```
    pub fn builder(
        request: impl Fn( &str, &Registry<T> ) + Send + Sync + 'static,
        unload: impl Fn( Box<T> ) + Send + Sync + 'static,
    ) -> RegistryBuilder<T> {
        RegistryBuilder {
            request: Box::new( request ),
            unload: Arc::new( unload ),
            request_policy: RequestPolicy::default(),
            overwrite_policy: OverwritePolicy::default(),
            capacity: 0,
        }
    }

    /// Returns a handle to the named resource, requesting a load if it is not loaded.
    ///
    /// The request callback runs on the calling thread, after the registry lock is
    /// released, and before the handle is returned. The handle is returned whether or
    /// not the resource became ready; check [`Handle::good`].
    pub fn get( &self, name: &str ) -> Handle<T> {
        let slot = self.find_or_create( name );
        let ( handle, status ) = Handle::attach( Arc::clone( &slot ));
        match status {
            Status::Unloaded => self.request( &slot ),
            Status::WaitingLoad => { trace!( resource = name, "load already in flight" ) }
            Status::Loaded => {}
        }
        handle
    }

    /// Installs `object` as the loaded resource under `name`.
    ///
    /// The registry takes ownership and later passes the object to the unload
    /// callback. If a resource is already loaded under `name`, it is replaced and
    /// dealt with according to the registry's [`OverwritePolicy`].
    ///
    /// A name may be registered before it was ever looked up. It then stays loaded
    /// with no handles until the first handle to it is dropped or a bulk operation
    /// unloads it.
    ///
    /// # Deadlocks
    /// Blocks while any [`ResourceRef`]( crate::ResourceRef ) to the same name is
    /// alive. Never call it from a thread holding one.
    pub fn register( &self, name: &str, object: impl Into<Box<T>> ) {
        let slot = self.find_or_create( name );
        debug!( resource = name, "registering resource" );
        let Some( previous ) = slot.install( object.into() ) else { return };
        match self.inner.overwrite_policy {
            OverwritePolicy::Unload => slot.hand_to_unload( previous ),
            OverwritePolicy::Discard => {
                debug!( resource = name, "discarding replaced resource" );
                drop( previous );
            }
        }
    }

    /// Unloads every loaded resource, then requests each of them again.
    ///
    /// Resources that were not loaded are left untouched. The unload phase runs
    /// with the registry lock held; the request phase runs after it is released.
    ///
    /// # Preconditions
    /// No thread may read any resource of this registry while this runs, and no
    /// thread may assume a resource stays loaded. Handles remain valid but may
    /// observe their resource unloaded.
    ///
    /// # Deadlocks
    /// The unload callback must not call into this registry while this runs.
    pub fn reload_all( &self ) {
        let mut unloaded = Vec::new();
        {
            let slots = self.inner.slots.lock();
            for slot in slots.values() {
                if slot.unload() { unloaded.push( Arc::clone( slot )) }
            }
        }
        debug!( count = unloaded.len(), "reloading resources" );
        unloaded.iter().for_each(| slot | self.request( slot ));
    }

    /// Unloads every loaded resource.
    ///
    /// # Preconditions
    /// Same as [`Registry::reload_all`].
    ///
    /// # Deadlocks
    /// The unload callback must not call into this registry while this runs.
    pub fn unload_all( &self ) {
        let slots = self.inner.slots.lock();
        let mut count = 0usize ;
        for slot in slots.values() {
            if slot.unload() { count += 1 }
        }
        debug!( count, "unloaded resources" );
    }

    /// Gives up on an in-flight load request under [`RequestPolicy::Deduplicate`].
    ///
    /// Moves the named resource from [`Status::WaitingLoad`] back to
    /// [`Status::Unloaded`] so that the next [`Registry::get`] asks the loader again.
    /// Returns `false` if no request was in flight.
    pub fn cancel_request( &self, name: &str ) -> bool {
        let cancelled = self.find( name ).is_some_and(| slot | slot.cancel_request() );
        if cancelled { debug!( resource = name, "load request cancelled" ) }
        cancelled
    }

    /// Status of the named resource, or `None` if the name was never used.
    pub fn status( &self, name: &str ) -> Option<Status> { self.find( name ).map(| slot | slot.status() )}

    /// Number of live handles to the named resource, or `None` if the name was never used.
    pub fn ref_count( &self, name: &str ) -> Option<usize> { self.find( name ).map(| slot | slot.ref_count() )}

    /// Whether the name was ever looked up or registered.
    pub fn contains( &self, name: &str ) -> bool { self.inner.slots.lock().contains_key( name )}

    /// Number of distinct names known to the registry.
    pub fn len( &self ) -> usize { self.inner.slots.lock().len() }

    /// Whether no name was ever looked up or registered.
    pub fn is_empty( &self ) -> bool { self.inner.slots.lock().is_empty() }

    /// All names known to the registry, sorted.
    pub fn names( &self ) -> Vec<String> {
        self.inner.slots.lock()
            .keys()
            .map(| name | name.to_string() )
            .sorted()
            .collect()
    }

    /// The request policy this registry was built with.
    #[inline] pub fn request_policy( &self ) -> RequestPolicy { self.inner.request_policy }

    /// The overwrite policy this registry was built with.
    #[inline] pub fn overwrite_policy( &self ) -> OverwritePolicy { self.inner.overwrite_policy }

    fn find( &self, name: &str ) -> Option<Arc<Slot<T>>> {
        self.inner.slots.lock().get( name ).cloned()
    }

    fn find_or_create( &self, name: &str ) -> Arc<Slot<T>> {
        let mut slots = self.inner.slots.lock();
        if let Some( slot ) = slots.get( name ) { return Arc::clone( slot ) }

        debug!( resource = name, "creating slot" );
        let name: Arc<str> = Arc::from( name );
        let slot = Arc::new( Slot::new( Arc::clone( &name ), Arc::clone( &self.inner.unload )));
        slots.insert( name, Arc::clone( &slot ));
        slot
    }

    fn request( &self, slot: &Slot<T> ) {
        if self.inner.request_policy == RequestPolicy::Deduplicate && !slot.begin_request() {
            trace!( resource = slot.name(), "load already in flight" );
            return
        }
        debug!( resource = slot.name(), "requesting load" );
        ( self.inner.request )( slot.name(), self );
    }

}

impl<T: ?Sized> Clone for Registry<T> {
    fn clone( &self ) -> Self { Self { inner: Arc::clone( &self.inner )}}
}

impl<T: ?Sized> std::fmt::Debug for Registry<T> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "Registry" )
            .field( "slots", &self.len() )
            .field( "request", &"<closure>" )
            .field( "unload", &"<closure>" )
            .field( "request_policy", &self.inner.request_policy )
            .field( "overwrite_policy", &self.inner.overwrite_policy )
            .finish()
    }
}

/// Configures and creates a [`Registry`].
///
/// Obtained from [`Registry::builder`].
#[must_use = "call .build() to create the Registry"]
pub struct RegistryBuilder<T: ?Sized> {
    request: Box<RequestFn<T>>,
    unload: Arc<UnloadFn<T>>,
    request_policy: RequestPolicy,
    overwrite_policy: OverwritePolicy,
    capacity: usize,
}

impl<T: ?Sized> RegistryBuilder<T> {

    /// Sets when lookups issue load requests. Defaults to [`RequestPolicy::Always`].
    pub fn with_request_policy( mut self, policy: RequestPolicy ) -> Self {
        self.request_policy = policy ;
        self
    }

    /// Sets how re-registering a loaded name treats the replaced resource.
    /// Defaults to [`OverwritePolicy::Unload`].
    pub fn with_overwrite_policy( mut self, policy: OverwritePolicy ) -> Self {
        self.overwrite_policy = policy ;
        self
    }

    /// Pre-sizes the name map for `capacity` distinct names.
    pub fn with_capacity( mut self, capacity: usize ) -> Self {
        self.capacity = capacity ;
        self
    }

    /// Creates the registry.
    pub fn build( self ) -> Registry<T> {
        Registry { inner: Arc::new( Shared {
            slots: HashMap::with_capacity( self.capacity ).pipe( Mutex::new ),
            request: self.request,
            unload: self.unload,
            request_policy: self.request_policy,
            overwrite_policy: self.overwrite_policy,
        })}
    }

}

impl<T: ?Sized> std::fmt::Debug for RegistryBuilder<T> {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "RegistryBuilder" )
            .field( "request", &"<closure>" )
            .field( "unload", &"<closure>" )
            .field( "request_policy", &self.request_policy )
            .field( "overwrite_policy", &self.overwrite_policy )
            .field( "capacity", &self.capacity )
            .finish()
    }
}
