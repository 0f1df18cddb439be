pub mod convert;
pub mod scaffold;
pub mod show;
pub mod submit;
pub mod validate;
