///  Example#1
/// ```
///
/// //use the shortest way to solve a system of equations
///    // first define the system of equations and the initial guess
///  use RustedNumMethods::numerical::Nonlinear_systems::NR::NR;
///  use nalgebra::DVector;
///
///    let mut NR_instanse = NR::new();
///    let fun = Box::new(|x: &DVector<f64>| {
///        DVector::from_vec(vec![x[0] * x[0] + x[1] * x[1] - 10.0, x[0] - x[1] - 4.0])
///    });
///    let initial_guess = vec![1.0, 1.0];
///    // solve with a central-difference jacobian
///    NR_instanse.set_system(fun, None, initial_guess, 1e-6, 100);
///    NR_instanse.main_loop().unwrap();
///    println!("result = {:?} \n", NR_instanse.get_result().unwrap());
///  ```
pub mod NR;
/// damped Newton-Raphson iterations: the full step is halved until the
/// residual norm decreases
pub mod NR_damped;
/// central-difference jacobians, partial derivatives and linearization
pub mod jacobian;
