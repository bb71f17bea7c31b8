#![cfg_attr(doc, warn(missing_docs))]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod console;
pub mod emu;
pub mod plat;
pub mod supervisor;
