//! Data layer: core types, JCAMP decoding and the per-spectrum stages.
//!
//! Architecture:
//! ```text
//!  .zip / folder / .jdx
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  collect (name, bytes) pairs, skip unreadable entries
//!   └──────────┘
//!        │  one payload
//!        ▼
//!   ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌──────────┐
//!   │  jcamp    │ → │  filter   │ → │ normalize │ → │  smooth   │ → │ resample │
//!   └──────────┘   └──────────┘   └───────────┘   └──────────┘   └──────────┘
//!   RawSpectrum     finite only     min-max [0,1]   Savitzky–Golay  CommonAxis row
//! ```

pub mod filter;
pub mod jcamp;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod resample;
pub mod smooth;
