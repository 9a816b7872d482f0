//! NEO orbit viewer application: window, input mapping and record sources
//! around the [`neo_orbit::OrbitView`].

pub mod input;
pub mod platform;
pub mod settings;
pub mod source;
pub mod window;
