#![allow(dead_code)]

pub mod architecture;
pub mod assertions;
pub mod config;
pub mod detector;
pub mod http;
