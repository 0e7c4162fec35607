//! Session identifiers
//!
//! `SessionId` names one row of the rotation chain, `FamilyId` names the
//! whole chain started by a single sign-in.

use kernel::id::Id;

pub struct SessionMarker;
pub type SessionId = Id<SessionMarker>;

pub struct FamilyMarker;
pub type FamilyId = Id<FamilyMarker>;
