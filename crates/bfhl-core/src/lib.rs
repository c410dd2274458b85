#![doc = include_str!("../README.md")]

mod common;
pub use common::*;

pub mod dispatch;
pub mod ops;
pub mod request;

pub use dispatch::{Dispatcher, TextGenerator};
pub use request::Operation;
