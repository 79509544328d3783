mod equivalence;
mod programs;
mod search;
