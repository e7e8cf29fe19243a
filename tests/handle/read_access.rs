use rescache::AccessError ;
use crate::loaders::{ self, Tally, LOADED };

#[test]
fn read_dereferences_a_loaded_resource() {

	let tally = Tally::new();
	let registry = loaders::eager( &tally );

	let handle = registry.get( "x" );
	let resource = handle.read().expect( "resource should be loaded" );
	assert_eq!( *resource, LOADED );
	assert_eq!( resource.to_string(), "42" );
	assert_eq!( format!( "{:?}", resource ), "42" );

}

#[test]
fn read_of_a_pending_resource_fails() {

	let tally = Tally::new();
	let registry = loaders::deferred( &tally );

	let handle = registry.get( "pending" );
	assert_eq!( handle.read().unwrap_err(), AccessError::NotLoaded( "pending".to_string() ));
	assert_eq!( handle.read().unwrap_err().to_string(), "Resource Not Loaded: pending" );

}

#[test]
fn several_reads_may_be_held_at_once() {

	let tally = Tally::new();
	let registry = loaders::eager( &tally );

	let handle = registry.get( "shared" );
	let clone = handle.clone();
	let first = handle.read().unwrap();
	let second = clone.read().unwrap();
	assert_eq!( *first + *second, 2 * LOADED );

}

#[test]
fn read_follows_the_latest_registration() {

	let tally = Tally::new();
	let registry = loaders::eager( &tally );

	let handle = registry.get( "config" );
	registry.register( "config", 7 );
	assert_eq!( *handle.read().unwrap(), 7 );
	assert_eq!( tally.unloaded(), vec![ LOADED ]);

}
