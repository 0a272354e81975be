//! Jurisdiction bootstrap.
//!
//! Turns the generic OpenFisca country template into a named jurisdiction
//! package: rewrites placeholder identifiers, resets package metadata,
//! renames the package directory and installs the result.
//!
//! The library never reads the process environment; [`config`] resolves
//! settings for the CLI and hands them to [`transform::Transform`].

pub mod config;
pub mod error;
pub mod identifier;
pub mod install;
pub mod journal;
pub mod plan;
pub mod preflight;
pub mod process;
pub mod rules;
pub mod timing;
pub mod transform;

pub use error::{Step, TransformError};
pub use identifier::JurisdictionName;
pub use install::{Installer, NoInstall, PipInstaller};
pub use plan::Plan;
pub use transform::{Transform, TransformReport};
