//! IGS SP3 precise ephemeris parsing, time-system conversion and ECEF
//! interpolation.
#![doc(html_logo_url = "https://raw.githubusercontent.com/rtk-rs/.github/master/logos/logo2.jpg")]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * sp3-ephem is part of the nav-solutions framework.
 * This framework is shipped under Mozilla Public V2 license.
 */

pub mod errors;
pub mod evaluator;
pub mod header;
pub mod identifiers;
pub mod loader;
mod parsing;
pub mod polynomial;
pub mod product;
pub mod record;
pub mod satellite;
pub mod time_system;

pub mod prelude {
    pub use crate::errors::{BuildError, CatalogError, Error, EvalError, ParsingError, Side};
    pub use crate::evaluator::{evaluate, evaluate_many, State};
    pub use crate::header::version::Version;
    pub use crate::header::{DataType, FileType, Header, OrbitType};
    pub use crate::identifiers::{CatalogEntry, Id, IlrsId, NoradId, Sp3Id};
    pub use crate::loader::{load, ChainProvider, LocalDirectoryProvider, Provider};
    pub use crate::polynomial::{Interval, PiecewisePolynomial};
    pub use crate::product::Product;
    pub use crate::record::{Correlations, Record};
    pub use crate::satellite::Satellite;
    pub use crate::time_system::TimeSystem;

    pub use hifitime::{Duration, Epoch};
}
