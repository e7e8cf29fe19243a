use rescache::Status ;
use crate::loaders::{ self, Tally, LOADED };

#[test]
fn unload_all_unloads_every_loaded_resource_once() {

	let tally = Tally::new();
	let registry = loaders::deferred( &tally );

	let first = registry.get( "first" );
	let second = registry.get( "second" );
	let pending = registry.get( "pending" );
	registry.register( "first", 1 );
	registry.register( "second", 2 );
	registry.register( "unreferenced", 3 );

	registry.unload_all();

	let mut unloaded = tally.unloaded();
	unloaded.sort_unstable();
	assert_eq!( unloaded, vec![ 1, 2, 3 ]);
	assert!( registry.names().iter().all(| name | registry.status( name ) == Some( Status::Unloaded )));
	assert!( !first.good() && !second.good() && !pending.good() );

	// Handles stay bound; releasing them must not unload a second time.
	assert_eq!( first.ref_count(), 1 );
	drop(( first, second, pending ));
	assert_eq!( tally.unload_count(), 3 );
	assert_eq!( tally.request_count(), 3 );

}

#[test]
fn unload_all_on_an_unloaded_registry_does_nothing() {

	let tally = Tally::new();
	let registry = loaders::deferred( &tally );

	registry.unload_all();
	let _handle = registry.get( "pending" );
	registry.unload_all();

	assert_eq!( tally.unload_count(), 0 );
	assert_eq!( registry.status( "pending" ), Some( Status::Unloaded ));

}

#[test]
fn handles_reacquired_after_unload_all_load_again() {

	let tally = Tally::new();
	let registry = loaders::eager( &tally );

	let stale = registry.get( "x" );
	registry.unload_all();
	assert_eq!( tally.unloaded(), vec![ LOADED ]);

	let fresh = registry.get( "x" );
	assert!( fresh.good() && stale.good() );
	assert_eq!( tally.requests_for( "x" ), 2 );

	drop( stale );
	drop( fresh );
	assert_eq!( tally.unloaded(), vec![ LOADED, LOADED ]);

}
