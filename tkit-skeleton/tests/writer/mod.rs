//! Skeleton writer tests
//!
//! Whole event streams written through a fresh [`tkit_skeleton::SkeletonWriter`].

mod documents;
mod groups;
mod multilingual;
mod referents;
mod segments;
mod subfilter;
