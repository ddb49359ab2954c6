#![doc = include_str!("../README.md")]
#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(rust_2024_compatibility)]
#![allow(edition_2024_expr_fragment_specifier)]

extern crate alloc;
#[cfg(test)]
extern crate std;

// Lets `#[derive(Registry)]` name `::tagmatch` from inside this crate.
#[allow(unused_extern_crates)]
extern crate self as tagmatch;

pub mod branch;
pub mod dynamic;
mod error;
pub mod guard;
mod macros;
pub mod registry;
pub mod table;
pub mod tag;

pub use tagmatch_macros::Registry;

pub use self::{
    branch::{
        else_branch, else_if, else_if_let, guarded_else_if_let, guarded_if_let, if_branch, if_let,
        Else, ElseIf, Tail,
    },
    error::Error,
    guard::{guards, GuardChain, Guards, PartialChain},
    registry::{of, Matchable, Pattern, Registry, Variant},
    table::{exhaustive_match, partial_match, PartialTable, Table},
    tag::Tag,
};
