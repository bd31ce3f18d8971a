#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// terminal logger initialization and saving results to text/csv files
pub mod logger;
