pub mod overlay;
pub mod rng;
pub mod sim;
pub mod workload;

#[cfg(test)]
mod test;
