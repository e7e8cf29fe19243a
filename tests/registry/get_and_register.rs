use rescache::Status ;
use crate::loaders::{ self, Tally, LOADED };

#[test]
fn unregistered_name_is_not_good_right_after_get() {

	let tally = Tally::new();
	let registry = loaders::deferred( &tally );

	let handle = registry.get( "never" );
	assert!( !handle.good() );
	assert_eq!( handle.status(), Status::Unloaded );
	assert_eq!( handle.name(), Some( "never" ));
	assert_eq!( tally.requests(), vec![ "never".to_string() ]);

}

#[test]
fn registration_makes_existing_handles_good() {

	let tally = Tally::new();
	let registry = loaders::deferred( &tally );

	let handle = registry.get( "later" );
	registry.register( "later", 5 );

	assert!( handle.good() );
	assert_eq!( *handle.read().unwrap(), 5 );

	let another = registry.get( "later" );
	assert!( another.good() );
	assert_eq!( *another.read().unwrap(), 5 );
	assert_eq!( tally.request_count(), 1 );

}

#[test]
fn synchronous_loader_round_trip() {

	let tally = Tally::new();
	let registry = loaders::eager( &tally );

	let handle = registry.get( "x" );
	assert!( handle.good() );
	assert_eq!( *handle.read().unwrap(), LOADED );

	drop( handle );
	assert_eq!( tally.unloaded(), vec![ LOADED ]);
	assert_eq!( registry.status( "x" ), Some( Status::Unloaded ));

	let handle = registry.get( "x" );
	assert!( handle.good() );
	assert_eq!( tally.requests_for( "x" ), 2 );
	assert_eq!( registry.len(), 1 );

}

#[test]
fn loaded_resource_is_not_requested_again() {

	let tally = Tally::new();
	let registry = loaders::eager( &tally );

	let _first = registry.get( "font" );
	let _second = registry.get( "font" );
	let _third = registry.get( "font" );
	assert_eq!( tally.request_count(), 1 );
	assert_eq!( registry.ref_count( "font" ), Some( 3 ));

}
