mod engine;
mod equivalence;
mod sim_time;
mod simulator;
mod support;
