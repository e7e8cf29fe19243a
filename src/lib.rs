//! A thread-safe, name-keyed resource cache.
//!
//! Callers look resources up by name and receive a [`Handle`] that keeps the
//! resource alive while referenced. When the last handle to a resource is dropped,
//! the resource is unloaded. How resources are fetched and freed is up to two
//! callbacks supplied when the [`Registry`] is created.
//!
//! # Core Concepts
//!
//! - [`Registry`]: Owns the name→slot map and the two callbacks. Slots are created
//! 	on first use and never removed for the registry's lifetime.
//!
//! - [`Handle`]: A reference-counted capability for one named resource. Cloning
//! 	adds a reference, dropping removes one. A handle may exist before its resource
//! 	is loaded; [`Handle::good`] tells whether it is ready.
//!
//! - **Request callback**: `Fn( &str, &Registry<T> )`, invoked when a resource is
//! 	looked up but not loaded. It supplies the resource by calling
//! 	[`Registry::register`], synchronously or later from any thread.
//!
//! - **Unload callback**: `Fn( Box<T> )`, handed each resource when it stops being
//! 	loaded. Under the default [`OverwritePolicy::Unload`] every registered
//! 	resource reaches it exactly once.
//!
//! - [`Status`]: `Unloaded`, `WaitingLoad` or `Loaded`. Status and refcount share
//! 	one atomic word, so "last handle dropped while loaded" unloads atomically with
//! 	respect to concurrent lookups.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc ;
//! use std::sync::atomic::{ AtomicUsize, Ordering };
//! use rescache::Registry ;
//!
//! let unloaded = Arc::new( AtomicUsize::new( 0 ));
//! let counter = Arc::clone( &unloaded );
//!
//! // The loader registers synchronously; the unloader counts what it frees.
//! let registry = Registry::<u32>::new(
//! 	| name, registry | registry.register( name, name.len() as u32 ),
//! 	move | _resource | { counter.fetch_add( 1, Ordering::SeqCst ); },
//! );
//!
//! let handle = registry.get( "four" );
//! assert!( handle.good() );
//! assert_eq!( *handle.read()?, 4 );
//!
//! // Cloning shares the same resource.
//! let other = handle.clone();
//! assert_eq!( other.ref_count(), 2 );
//!
//! drop( handle );
//! assert_eq!( unloaded.load( Ordering::SeqCst ), 0 );
//! drop( other );
//! assert_eq!( unloaded.load( Ordering::SeqCst ), 1 );
//! # Ok::<(), rescache::AccessError>(())
//! ```
//!
//! # Deferred Loading
//!
//! The request callback does not have to register right away. A handle obtained
//! before the resource arrives becomes good as soon as it is registered.
//!
//! ```
//! use std::sync::{ Arc, Mutex };
//! use rescache::Registry ;
//!
//! let pending = Arc::new( Mutex::new( Vec::new() ));
//! let queue = Arc::clone( &pending );
//!
//! let registry = Registry::<String>::new(
//! 	move | name, _registry | queue.lock().unwrap().push( name.to_string() ),
//! 	drop,
//! );
//!
//! let handle = registry.get( "shader" );
//! assert!( !handle.good() );
//! assert!( handle.read().is_err() );
//!
//! // Later, possibly on another thread:
//! for name in pending.lock().unwrap().drain( .. ) {
//! 	registry.register( &name, format!( "compiled {}", name ));
//! }
//! assert!( handle.good() );
//! ```
//!
//! # Bulk Operations
//!
//! [`Registry::unload_all`] unloads every loaded resource and
//! [`Registry::reload_all`] additionally requests each of them again. Both require
//! that no thread reads resources while they run, and both invoke the unload
//! callback with the registry lock held: the unload callback must not call back
//! into the registry during a bulk operation.
//!
//! # Logging
//!
//! Lifecycle events (slot creation, requests, registration, unloads) are emitted
//! through [`tracing`](https://docs.rs/tracing) at `debug` and `trace` level. The
//! crate never installs a subscriber.

mod error ;
mod handle ;
mod policy ;
mod registry ;
mod slot ;
mod state ;

pub use error::AccessError ;
pub use handle::{ Handle, ResourceRef };
pub use policy::{ OverwritePolicy, RequestPolicy };
pub use registry::{ Registry, RegistryBuilder };
pub use state::Status ;
