#![allow(dead_code)]

pub mod identity_provider;
