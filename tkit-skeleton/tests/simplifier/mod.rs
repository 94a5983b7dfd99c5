//! Skeleton simplifier tests
//!
//! The simplified stream must carry no cross references and write the same document as the
//! original one.

mod bilingual;
mod flatten;
mod roundtrip;
