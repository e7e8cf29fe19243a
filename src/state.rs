//! Lifecycle status of a cached resource and the packed word it lives in.
//!
//! A slot keeps its [`Status`] and its live-handle count in a single atomic
//! word. Every transition that depends on both (most importantly "last handle
//! dropped while loaded") is therefore one compare-and-swap rather than a
//! decrement followed by a separate status check.

use std::sync::atomic::{ AtomicUsize, Ordering };



/// Lifecycle status of a named resource.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum Status {
    /// No resource is held. The next [`Registry::get`]( crate::Registry::get )
    /// issues a load request.
    #[default] Unloaded,
    /// A load request is in flight and further requests are suppressed.
    ///
    /// Only ever assigned under [`RequestPolicy::Deduplicate`]( crate::RequestPolicy::Deduplicate ).
    WaitingLoad,
    /// The resource is held by the registry and readable through handles.
    Loaded,
}

impl std::fmt::Display for Status {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
        match self {
            Self::Unloaded => write!( f, "unloaded" ),
            Self::WaitingLoad => write!( f, "waiting for load" ),
            Self::Loaded => write!( f, "loaded" ),
        }
    }
}

impl Status {
    const fn bits( self ) -> usize { match self {
        Self::Unloaded => 0,
        Self::WaitingLoad => 1,
        Self::Loaded => 2,
    }}

    const fn from_bits( bits: usize ) -> Self { match bits & STATUS_MASK {
        1 => Self::WaitingLoad,
        2 => Self::Loaded,
        _ => Self::Unloaded,
    }}
}

const STATUS_BITS: u32 = 2 ;
const STATUS_MASK: usize = ( 1 << STATUS_BITS ) - 1 ;
const ONE_REF: usize = 1 << STATUS_BITS ;

/// Status and refcount of a slot packed into one atomic word.
#[derive( Debug, Default )]
pub(crate) struct SlotState( AtomicUsize );

/// A snapshot of a [`SlotState`] word.
#[derive( Copy, Clone, Eq, PartialEq, Debug )]
pub(crate) struct Word( usize );

impl Word {
    #[inline] pub const fn new( status: Status, refs: usize ) -> Self { Self(( refs << STATUS_BITS ) | status.bits() )}
    #[inline] pub const fn status( self ) -> Status { Status::from_bits( self.0 )}
    #[inline] pub const fn refs( self ) -> usize { self.0 >> STATUS_BITS }
    #[inline] pub const fn with_status( self, status: Status ) -> Self { Self(( self.0 & !STATUS_MASK ) | status.bits() )}

    /// Whether releasing one reference from this word must unload the resource.
    #[inline] pub fn releases_load( self ) -> bool { self.refs() == 1 && self.status() == Status::Loaded }

    /// The word after one reference is released.
    ///
    /// Releasing the last reference of a loaded slot also flips it to `Unloaded`.
    #[inline] pub fn released( self ) -> Self {
        debug_assert!( self.refs() > 0, "released a reference that was never acquired" );
        match self.releases_load() {
            true => Self::new( Status::Unloaded, 0 ),
            false => Self( self.0 - ONE_REF ),
        }
    }
}

impl SlotState {

    #[inline] pub fn load( &self ) -> Word { Word( self.0.load( Ordering::Acquire ))}

    /// Adds one reference and returns the word as it was before.
    #[inline] pub fn acquire( &self ) -> Word { Word( self.0.fetch_add( ONE_REF, Ordering::AcqRel ))}

    /// Atomically replaces the current word with `f( current )`, retrying on contention.
    ///
    /// Returns the word `f` was successfully applied to. When `f` returns `None`
    /// the word is left untouched and `Err` carries the observed value.
    pub fn update( &self, mut f: impl FnMut( Word ) -> Option<Word> ) -> Result<Word, Word> {
        self.0
            .fetch_update( Ordering::AcqRel, Ordering::Acquire, | word | f( Word( word )).map(| next | next.0 ))
            .map( Word )
            .map_err( Word )
    }

    /// Sets the status unconditionally, keeping the refcount.
    #[inline] pub fn set_status( &self, status: Status ) {
        let word = self.0.fetch_update( Ordering::AcqRel, Ordering::Acquire, | word | Some( Word( word ).with_status( status ).0 ));
        debug_assert!( word.is_ok() );
    }

    /// Moves the status from `from` to `to` without touching the refcount.
    #[inline] pub fn transition( &self, from: Status, to: Status ) -> bool {
        self.update(| word | ( word.status() == from ).then(|| word.with_status( to ))).is_ok()
    }

}

#[cfg( test )]
mod tests {
    use super::*;

    #[test]
    fn word_packs_status_and_refs() {
        let word = Word::new( Status::Loaded, 3 );
        assert_eq!( word.status(), Status::Loaded );
        assert_eq!( word.refs(), 3 );
        assert_eq!( word.with_status( Status::WaitingLoad ).refs(), 3 );
    }

    #[test]
    fn releasing_last_loaded_reference_unloads() {
        let word = Word::new( Status::Loaded, 1 );
        assert!( word.releases_load() );
        assert_eq!( word.released(), Word::new( Status::Unloaded, 0 ));
    }

    #[test]
    fn releasing_last_reference_keeps_pending_status() {
        let word = Word::new( Status::WaitingLoad, 1 );
        assert!( !word.releases_load() );
        assert_eq!( word.released(), Word::new( Status::WaitingLoad, 0 ));
    }

    #[test]
    fn set_status_keeps_refs() {
        let state = SlotState::default();
        state.acquire();
        state.acquire();
        state.set_status( Status::Loaded );
        assert_eq!( state.load(), Word::new( Status::Loaded, 2 ));
    }

    #[test]
    fn transition_requires_expected_status() {
        let state = SlotState::default();
        assert!( !state.transition( Status::WaitingLoad, Status::Unloaded ));
        assert!( state.transition( Status::Unloaded, Status::WaitingLoad ));
        assert_eq!( state.load().status(), Status::WaitingLoad );
    }
}
