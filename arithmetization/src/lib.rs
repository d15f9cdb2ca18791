#![doc = include_str!("../README.md")]

pub mod circuits;
pub mod component;
pub mod connectedness;
pub mod constants;
pub mod error;
pub mod lookup;
pub mod math;
pub mod union_find;

#[cfg(test)]
mod tests;
