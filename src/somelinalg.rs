//! some linear algebra functions used throughout the code
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// dense linear system solver: closed-form formula for 2x2 systems,
/// LU decomposition for everything larger; detects near-singular matrices
pub mod linear_solver;
