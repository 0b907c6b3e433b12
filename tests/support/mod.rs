#![allow(dead_code)]

pub mod lrsgd_env;
pub mod records;
