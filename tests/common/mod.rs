#![allow(dead_code)]

pub mod contract;
pub mod test_util;
