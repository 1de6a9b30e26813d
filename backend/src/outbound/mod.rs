//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Only one concern lives here today: **persistence**, MongoDB-backed
//! repositories for users and quests.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod persistence;
