pub mod packages;
pub mod repository;
pub mod roster;
pub mod scheduling;
pub mod transactions;
pub mod waiting_list;
