use rescache::{ RequestPolicy, Status };
use crate::loaders::{ self, Tally };

#[test]
fn always_policy_never_enters_waiting_load() {

	let tally = Tally::new();
	let registry = loaders::deferred( &tally );
	assert_eq!( registry.request_policy(), RequestPolicy::Always );

	let _first = registry.get( "asset" );
	let _second = registry.get( "asset" );

	assert_eq!( registry.status( "asset" ), Some( Status::Unloaded ));
	assert_eq!( tally.requests_for( "asset" ), 2 );
	assert!( !registry.cancel_request( "asset" ));

}

#[test]
fn deduplicate_policy_requests_once_while_pending() {

	let tally = Tally::new();
	let registry = loaders::deferred_with( &tally, RequestPolicy::Deduplicate );

	let first = registry.get( "asset" );
	let second = registry.get( "asset" );

	assert_eq!( first.status(), Status::WaitingLoad );
	assert_eq!( tally.requests_for( "asset" ), 1 );
	assert_eq!( second.ref_count(), 2 );

	registry.register( "asset", 3 );
	assert!( first.good() && second.good() );

}

#[test]
fn pending_request_survives_its_handles() {

	let tally = Tally::new();
	let registry = loaders::deferred_with( &tally, RequestPolicy::Deduplicate );

	drop( registry.get( "asset" ));
	assert_eq!( registry.status( "asset" ), Some( Status::WaitingLoad ));

	drop( registry.get( "asset" ));
	assert_eq!( tally.request_count(), 1 );

	registry.register( "asset", 3 );
	assert_eq!( registry.status( "asset" ), Some( Status::Loaded ));
	assert_eq!( tally.unload_count(), 0 );

}

#[test]
fn cancelled_request_is_issued_again() {

	let tally = Tally::new();
	let registry = loaders::deferred_with( &tally, RequestPolicy::Deduplicate );

	let _handle = registry.get( "asset" );
	assert!( registry.cancel_request( "asset" ));
	assert!( !registry.cancel_request( "asset" ));
	assert_eq!( registry.status( "asset" ), Some( Status::Unloaded ));

	let _retry = registry.get( "asset" );
	assert_eq!( tally.requests_for( "asset" ), 2 );
	assert_eq!( registry.status( "asset" ), Some( Status::WaitingLoad ));

}

#[test]
fn cancel_of_unknown_name_is_a_no_op() {

	let tally = Tally::new();
	let registry = loaders::deferred_with( &tally, RequestPolicy::Deduplicate );

	assert!( !registry.cancel_request( "unknown" ));
	assert!( !registry.contains( "unknown" ));

}

#[test]
fn deduplicated_synchronous_load_behaves_like_always() {

	let tally = Tally::new();
	let registry = loaders::eager_with( &tally, RequestPolicy::Deduplicate, rescache::OverwritePolicy::Unload );

	let handle = registry.get( "x" );
	assert!( handle.good() );
	drop( handle );

	assert!( registry.get( "x" ).good() );
	assert_eq!( tally.requests_for( "x" ), 2 );
	assert_eq!( tally.unload_count(), 2 );

}
